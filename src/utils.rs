//! Utility functions for string cleanup and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Title sanitization for output file names
//! - Caption wrapping for the drawtext overlay
//! - String truncation for logging
//! - File system validation for the output directory

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Reduce an article title to a safe output file name stem.
///
/// Keeps alphanumerics, spaces, `_` and `-`; drops everything else and trims
/// trailing whitespace. May return an empty string when the title has no
/// safe characters at all, so callers need a fallback name.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize_title("Rocket: Launch!"), "Rocket Launch");
/// ```
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_' || *c == '-')
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Wrap caption text to at most `width` columns per line.
///
/// Greedy word wrap; words longer than `width` get a line of their own.
/// Used to keep the drawtext overlay near 80% of the frame width, since
/// drawtext does not reflow text on its own.
pub fn wrap_caption(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to roughly `max` bytes with an ellipsis and
/// byte count indicator appended. The cut lands on the nearest char boundary
/// at or below `max`, so multibyte text never splits mid-character.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max)
        .last()
        .unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title_keeps_safe_chars() {
        assert_eq!(sanitize_title("Rocket Launch 2025"), "Rocket Launch 2025");
        assert_eq!(sanitize_title("up_and-down"), "up_and-down");
    }

    #[test]
    fn test_sanitize_title_strips_punctuation() {
        assert_eq!(sanitize_title("Breaking: Markets Fall!"), "Breaking Markets Fall");
        assert_eq!(sanitize_title("A/B \"test\"?"), "AB test");
    }

    #[test]
    fn test_sanitize_title_trims_trailing_space() {
        assert_eq!(sanitize_title("Headline... "), "Headline");
    }

    #[test]
    fn test_sanitize_title_can_be_empty() {
        assert_eq!(sanitize_title("!!!???"), "");
    }

    #[test]
    fn test_wrap_caption_basic() {
        let wrapped = wrap_caption("one two three four", 9);
        assert_eq!(wrapped, "one two\nthree\nfour");
    }

    #[test]
    fn test_wrap_caption_short_text_is_one_line() {
        assert_eq!(wrap_caption("short text", 40), "short text");
    }

    #[test]
    fn test_wrap_caption_long_word_gets_own_line() {
        let wrapped = wrap_caption("a supercalifragilistic b", 10);
        assert_eq!(wrapped, "a\nsupercalifragilistic\nb");
    }

    #[test]
    fn test_wrap_caption_collapses_whitespace() {
        assert_eq!(wrap_caption("a   b\n\nc", 40), "a b c");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        // 'é' is two bytes and straddles the cut point.
        let mut s = "a".repeat(199);
        s.push('é');
        s.push_str(&"b".repeat(50));
        let result = truncate_for_log(&s, 200);
        assert!(result.starts_with(&"a".repeat(199)));
        assert!(result.contains("…(+52 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_all_multibyte() {
        let s = "é".repeat(100);
        let result = truncate_for_log(&s, 25);
        assert!(result.starts_with(&"é".repeat(12)));
        assert!(result.contains("…(+176 bytes)"));
    }
}
