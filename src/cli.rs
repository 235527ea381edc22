//! Command-line interface definitions for Newsreel.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! API keys can be provided via command-line flags or environment variables.

use clap::Parser;

/// Command-line arguments for the Newsreel application.
///
/// This struct defines all configuration options that can be passed to the
/// application at runtime. Options include the news topic, media paths,
/// and API credentials.
///
/// # Examples
///
/// ```sh
/// # Basic usage with required arguments (keys from the environment)
/// newsreel -t "space exploration"
///
/// # Custom background clip and output directory
/// newsreel -t climate -b ./clips/loop.mp4 -o ./out
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// News topic to search for
    #[arg(short, long)]
    pub topic: String,

    /// Path to the background video clip that gets looped under the captions
    #[arg(short, long, default_value = "background.mp4")]
    pub background: String,

    /// Directory for the rendered video and narration audio
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// File name for the narration audio inside the output directory
    #[arg(long, default_value = "audio.mp3")]
    pub audio_filename: String,

    /// Language code for narration synthesis
    #[arg(long, default_value = "en")]
    pub voice_lang: String,

    /// NewsAPI key used for the article search
    #[arg(long, env = "NEWS_API_KEY")]
    pub news_api_key: String,

    /// Google API key used for script generation
    #[arg(long, env = "GOOGLE_API_KEY")]
    pub google_api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "newsreel",
            "--topic",
            "space",
            "--news-api-key",
            "news-key",
            "--google-api-key",
            "google-key",
        ]
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(base_args());

        assert_eq!(cli.topic, "space");
        assert_eq!(cli.background, "background.mp4");
        assert_eq!(cli.output_dir, ".");
        assert_eq!(cli.audio_filename, "audio.mp3");
        assert_eq!(cli.voice_lang, "en");
        assert_eq!(cli.news_api_key, "news-key");
        assert_eq!(cli.google_api_key, "google-key");
    }

    #[test]
    fn test_cli_short_flags() {
        let mut args = base_args();
        args.extend(["-b", "/tmp/loop.mp4", "-o", "/tmp/out"]);
        let cli = Cli::parse_from(args);

        assert_eq!(cli.background, "/tmp/loop.mp4");
        assert_eq!(cli.output_dir, "/tmp/out");
    }

    #[test]
    fn test_cli_voice_lang_override() {
        let mut args = base_args();
        args.extend(["--voice-lang", "fr"]);
        let cli = Cli::parse_from(args);

        assert_eq!(cli.voice_lang, "fr");
    }
}
