//! # Newsreel
//!
//! A news-to-video pipeline that fetches an article for a topic, summarizes
//! it into a short narration script with a language model, synthesizes the
//! narration to audio, and composites narration plus captions over a looping
//! background video.
//!
//! ## Usage
//!
//! ```sh
//! newsreel -t "space exploration" -b background.mp4 -o ./out
//! ```
//!
//! ## Architecture
//!
//! The application is a linear pipeline of four stages, each a wrapper over
//! one external call, run once in fixed order:
//! 1. **Fetch**: look up the most relevant article for the topic (NewsAPI)
//! 2. **Summarize**: turn the article into a 3-4 sentence script (Gemini)
//! 3. **Narrate**: synthesize the script to MP3 (Google Translate TTS)
//! 4. **Render**: loop the background, overlay captions, mux audio (ffmpeg)
//!
//! A stage producing an empty result ends the run; there is no retry and no
//! state beyond the values passed from one stage to the next.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod models;
mod stages;
mod utils;

use cli::Cli;
use stages::script::ScriptGenerator;
use stages::{news, tts, video};
use utils::{ensure_writable_dir, sanitize_title, truncate_for_log};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newsreel starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.topic, ?args.background, ?args.output_dir, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // Early check: the background clip must exist before we spend API calls
    let background = Path::new(&args.background);
    if !tokio::fs::try_exists(background).await.unwrap_or(false) {
        error!(path = %args.background, "Background video not found");
        return Err(format!("background video not found: {}", args.background).into());
    }

    let client = reqwest::Client::new();

    // ---- Stage 1: article fetch ----
    info!(topic = %args.topic, "Stage 1: fetching article");
    let Some(article) = news::fetch_top_article(&client, &args.topic, &args.news_api_key).await?
    else {
        error!(topic = %args.topic, "No articles found; try a different topic");
        return Err(format!("no articles found for topic '{}'", args.topic).into());
    };
    debug!(
        title = %article.title,
        content_preview = %truncate_for_log(&article.content, 200),
        "Article fetched"
    );

    // ---- Stage 2: script generation ----
    info!("Stage 2: generating video script");
    let generator = ScriptGenerator::new(client.clone(), &args.google_api_key);
    let Some(script) = generator.generate(&article).await? else {
        error!("Model produced an empty script; stopping");
        return Err("script generation produced an empty script".into());
    };

    // ---- Stage 3: narration synthesis ----
    info!("Stage 3: synthesizing narration");
    let audio_path = Path::new(&args.output_dir).join(&args.audio_filename);
    tts::synthesize(&client, &script, &args.voice_lang, &audio_path).await?;

    // ---- Stage 4: video assembly ----
    info!("Stage 4: assembling video");
    let mut stem = sanitize_title(&article.title);
    if stem.is_empty() {
        stem = format!("newsreel_{}", Local::now().format("%Y-%m-%d_%H%M%S"));
    }
    let out_path = Path::new(&args.output_dir).join(format!("{stem}.mp4"));
    let caption_path = video::caption_scratch_path(Path::new(&args.output_dir));
    video::render(background, &audio_path, &script, &caption_path, &out_path).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        video = %out_path.display(),
        "Execution complete"
    );

    Ok(())
}
