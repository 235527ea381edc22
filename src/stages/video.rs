//! Video assembly stage built on ffmpeg and ffprobe subprocesses.
//!
//! The background clip is looped to cover the narration (plus a second of
//! padding), the script is drawn as a centered caption, and the narration
//! track is muxed in. Argument lists are built by pure functions so the
//! subprocess plumbing stays out of the way of the tests.

use crate::utils::wrap_caption;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{info, instrument, warn};

const FPS: u32 = 24;
const VIDEO_CODEC: &str = "libx264";
const AUDIO_CODEC: &str = "aac";

/// Seconds of background video kept past the end of the narration.
const AUDIO_PAD_SECS: f64 = 1.0;

const CAPTION_FONT_SIZE: u32 = 28;

/// Wrap width chosen to keep captions near 80% of the frame width.
const CAPTION_WRAP_COLS: usize = 48;

/// Probe a media file for its duration in seconds.
///
/// # Errors
///
/// Returns an error if ffprobe is missing, exits non-zero, or prints
/// something that isn't a duration.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn probe_duration_seconds(path: &Path) -> Result<f64, Box<dyn Error>> {
    let args = probe_args(path);
    let output = Command::new("ffprobe").args(&args).output().await?;
    if !output.status.success() {
        return Err(format!("ffprobe exited with {} for {}", output.status, path.display()).into());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let duration: f64 = stdout.trim().parse()?;
    Ok(duration)
}

/// Render the final video: looped background, caption overlay, narration.
///
/// Writes the wrapped caption to `caption_path` for the duration of the
/// encode (drawtext reads it from disk) and removes it afterwards.
///
/// # Errors
///
/// Returns an error if the audio cannot be probed, the caption file cannot
/// be written, or ffmpeg exits non-zero.
#[instrument(level = "info", skip_all, fields(out = %out_path.display()))]
pub async fn render(
    background: &Path,
    audio_path: &Path,
    script: &str,
    caption_path: &Path,
    out_path: &Path,
) -> Result<(), Box<dyn Error>> {
    let audio_secs = probe_duration_seconds(audio_path).await?;
    let target_secs = audio_secs + AUDIO_PAD_SECS;
    info!(audio_secs, target_secs, "Probed narration duration");

    fs::write(caption_path, wrap_caption(script, CAPTION_WRAP_COLS)).await?;

    let args = render_args(background, audio_path, caption_path, target_secs, out_path);
    let status = Command::new("ffmpeg").args(&args).status().await?;

    if let Err(e) = fs::remove_file(caption_path).await {
        warn!(path = %caption_path.display(), error = %e, "Failed to remove caption file");
    }

    if !status.success() {
        return Err(format!("ffmpeg exited with {status}").into());
    }
    info!(path = %out_path.display(), "Video written");
    Ok(())
}

fn probe_args(path: &Path) -> Vec<String> {
    vec![
        "-v".into(),
        "error".into(),
        "-show_entries".into(),
        "format=duration".into(),
        "-of".into(),
        "default=noprint_wrappers=1:nokey=1".into(),
        path.display().to_string(),
    ]
}

/// Build the ffmpeg argument list for the final encode.
///
/// `-stream_loop -1` repeats the background indefinitely and `-t` trims the
/// output to the target duration; mapping only `0:v:0` discards the
/// background's own audio track.
fn render_args(
    background: &Path,
    audio: &Path,
    caption_file: &Path,
    duration_secs: f64,
    out_path: &Path,
) -> Vec<String> {
    vec![
        "-y".into(),
        "-stream_loop".into(),
        "-1".into(),
        "-i".into(),
        background.display().to_string(),
        "-i".into(),
        audio.display().to_string(),
        "-t".into(),
        format!("{duration_secs:.3}"),
        "-vf".into(),
        caption_filter(caption_file),
        "-map".into(),
        "0:v:0".into(),
        "-map".into(),
        "1:a:0".into(),
        "-c:v".into(),
        VIDEO_CODEC.into(),
        "-c:a".into(),
        AUDIO_CODEC.into(),
        "-r".into(),
        FPS.to_string(),
        out_path.display().to_string(),
    ]
}

/// Scratch path for the caption text file, unique to this process so a
/// pre-existing file in the output directory is never clobbered.
pub fn caption_scratch_path(dir: &Path) -> PathBuf {
    dir.join(format!(".newsreel_caption_{}.txt", std::process::id()))
}

fn caption_filter(caption_file: &Path) -> String {
    format!(
        "drawtext=textfile={}:fontcolor=white:fontsize={}:borderw=2:bordercolor=white:\
         x=(w-text_w)/2:y=(h-text_h)/2:expansion=none",
        escape_filter_value(&caption_file.display().to_string()),
        CAPTION_FONT_SIZE
    )
}

/// Backslash-escape the characters ffmpeg's filter parser treats as
/// delimiters, so paths containing them survive option splitting.
fn escape_filter_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ':' | ',' | '\'' | '\\' | '[' | ']' | ';' | '=') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
