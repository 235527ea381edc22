//! Script generation stage backed by the Gemini `generateContent` API.
//!
//! Sends the fetched article through a fixed summarization prompt and cleans
//! the response into a short narration script. The wire types mirror the
//! Gemini REST schema and stay private to this module.

use crate::models::FetchedArticle;
use crate::utils::truncate_for_log;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Instant;
use tracing::{info, instrument, warn};
use url::Url;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Client for the Gemini generative-text API.
pub struct ScriptGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ScriptGenerator {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: GEMINI_MODEL.to_string(),
        }
    }

    fn endpoint(&self) -> Result<Url, url::ParseError> {
        let base = format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.model);
        Url::parse_with_params(&base, &[("key", self.api_key.as_str())])
    }

    /// Generate a narration script for an article.
    ///
    /// Returns `Ok(None)` when the model answers with nothing usable after
    /// cleanup, so the caller can stop the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-2xx response, or a response
    /// that doesn't match the Gemini schema.
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    pub async fn generate(
        &self,
        article: &FetchedArticle,
    ) -> Result<Option<String>, Box<dyn Error>> {
        let prompt = build_prompt(&article.title, &article.content);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let t0 = Instant::now();
        let response = self
            .client
            .post(self.endpoint()?)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let parsed: GenerateResponse = response.json().await?;
        let dt = t0.elapsed();

        let Some(raw) = extract_text(&parsed) else {
            warn!(
                elapsed_ms = dt.as_millis(),
                "Model response contained no candidates"
            );
            return Ok(None);
        };

        let script = clean_script(&raw);
        if script.is_empty() {
            warn!(
                elapsed_ms = dt.as_millis(),
                raw_preview = %truncate_for_log(&raw, 200),
                "Model response was empty after cleanup"
            );
            return Ok(None);
        }

        info!(
            elapsed_ms = dt.as_millis(),
            chars = script.len(),
            preview = %truncate_for_log(&script, 200),
            "Script generated"
        );
        Ok(Some(script))
    }
}

/// Build the summarization prompt for an article.
fn build_prompt(title: &str, content: &str) -> String {
    format!(
        "Based on the following news article, create a short, engaging video script \
         of about 3 to 4 sentences.\n\
         The script should be a simple, clear news summary.\n\
         Do not use complex words or markdown like asterisks.\n\
         Start the script directly, without any preamble like \"Here is the script:\".\n\
         \n\
         Article Title: {title}\n\
         Article Content Snippet: {content}"
    )
}

/// Strip markdown leftovers and surrounding whitespace from the model output.
fn clean_script(raw: &str) -> String {
    raw.trim().replace(['*', '`'], "")
}

/// Join the text parts of the first candidate, if any.
fn extract_text(response: &GenerateResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let text = candidate
        .content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("");
    if text.is_empty() { None } else { Some(text) }
}

// Gemini REST request/response structures

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_substitutes_article() {
        let prompt = build_prompt("Big Headline", "Some snippet.");
        assert!(prompt.contains("Article Title: Big Headline"));
        assert!(prompt.contains("Article Content Snippet: Some snippet."));
        assert!(prompt.contains("3 to 4 sentences"));
    }

    #[test]
    fn test_clean_script_strips_markdown() {
        assert_eq!(clean_script("  **Bold** and `code`  "), "Bold and code");
    }

    #[test]
    fn test_clean_script_plain_text_untouched() {
        assert_eq!(clean_script("Plain summary."), "Plain summary.");
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "First. "}, {"text": "Second."}]}}
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(&response).as_deref(), Some("First. Second."));
    }

    #[test]
    fn test_extract_text_handles_no_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(&response).is_none());
    }
}
