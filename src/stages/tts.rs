//! Narration synthesis stage backed by the Google Translate TTS endpoint.
//!
//! The endpoint caps how much text one request may carry, so the script is
//! split into sentence-aligned chunks first. Each request returns a complete
//! MP3 stream; appending the streams in order yields one playable file.

use regex::Regex;
use reqwest::header::USER_AGENT;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

/// Sentence splitter: a run up to a terminator, or a trailing unterminated run.
static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)([^.!?]+[.!?]+)|([^.!?]+$)").unwrap());

const TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Per-request character cap enforced by the endpoint.
const MAX_CHUNK_CHARS: usize = 100;

/// The endpoint rejects requests without a browser user agent.
const BROWSER_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Synthesize a script to an MP3 file.
///
/// # Errors
///
/// Returns an error if any chunk request fails, the endpoint returns no
/// audio at all, or the file cannot be written.
#[instrument(level = "info", skip_all, fields(lang = %lang, out = %out_path.display()))]
pub async fn synthesize(
    client: &reqwest::Client,
    script: &str,
    lang: &str,
    out_path: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let chunks = split_chunks(script, MAX_CHUNK_CHARS);
    info!(chunks = chunks.len(), "Synthesizing narration");

    let mut audio: Vec<u8> = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        debug!(index = i, chars = chunk.len(), "Requesting TTS chunk");
        let part = fetch_chunk(client, chunk, lang).await?;
        audio.extend_from_slice(&part);
    }

    if audio.is_empty() {
        return Err("TTS endpoint returned no audio".into());
    }

    tokio::fs::write(out_path, &audio).await?;
    info!(bytes = audio.len(), "Narration audio written");
    Ok(out_path.to_path_buf())
}

async fn fetch_chunk(
    client: &reqwest::Client,
    chunk: &str,
    lang: &str,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let url = request_url(chunk, lang);
    let bytes = client
        .get(url)
        .header(USER_AGENT, BROWSER_UA)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    Ok(bytes.to_vec())
}

/// Build the TTS request URL for one chunk.
fn request_url(chunk: &str, lang: &str) -> String {
    format!(
        "{}?ie=UTF-8&q={}&tl={}&client=tw-ob&textlen={}",
        TTS_ENDPOINT,
        urlencoding::encode(chunk),
        lang,
        chunk.chars().count()
    )
}

/// Split a script into chunks of at most `max_chars` characters.
///
/// Splits on sentence boundaries first and packs consecutive sentences
/// together while they fit. Sentences longer than the cap fall back to a
/// word split, and a single oversized word is cut at character boundaries.
fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut sentences = Vec::new();
    for m in SENTENCE_RE.find_iter(text) {
        let s = m.as_str().trim();
        if !s.is_empty() {
            sentences.push(s.to_string());
        }
    }
    if sentences.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    for s in sentences {
        if s.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(split_words(&s, max_chars));
        } else if current.is_empty() {
            current = s;
        } else if current.len() + 1 + s.len() <= max_chars {
            current.push(' ');
            current.push_str(&s);
        } else {
            chunks.push(std::mem::replace(&mut current, s));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_words(sentence: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for word in sentence.split_whitespace() {
        if word.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            chunks.extend(split_chars(word, max_chars));
            continue;
        }
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_chars(word: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_encodes_text() {
        let url = request_url("hello world", "en");
        assert!(url.starts_with(TTS_ENDPOINT));
        assert!(url.contains("q=hello%20world"));
        assert!(url.contains("tl=en"));
        assert!(url.contains("client=tw-ob"));
        assert!(url.contains("textlen=11"));
    }

    #[test]
    fn test_request_url_counts_chars_not_bytes() {
        let url = request_url("héllo", "fr");
        assert!(url.contains("textlen=5"));
    }

    #[test]
    fn test_split_chunks_short_text_is_one_chunk() {
        let chunks = split_chunks("A short sentence.", 100);
        assert_eq!(chunks, vec!["A short sentence."]);
    }

    #[test]
    fn test_split_chunks_packs_sentences() {
        let chunks = split_chunks("One. Two. Three.", 100);
        assert_eq!(chunks, vec!["One. Two. Three."]);
    }

    #[test]
    fn test_split_chunks_respects_cap() {
        let text = "First sentence here. Second sentence here. Third sentence here.";
        let chunks = split_chunks(text, 25);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.len() <= 25, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn test_split_chunks_handles_no_terminator() {
        let chunks = split_chunks("no punctuation at all", 100);
        assert_eq!(chunks, vec!["no punctuation at all"]);
    }

    #[test]
    fn test_split_chunks_empty_text() {
        assert!(split_chunks("   ", 100).is_empty());
    }

    #[test]
    fn test_split_chunks_oversized_sentence_splits_on_words() {
        let text = "this single sentence runs much longer than the cap allows";
        let chunks = split_chunks(text, 20);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 20, "chunk too long: {chunk:?}");
        }
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_split_chars_cuts_oversized_word() {
        let chunks = split_chars("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }
}
