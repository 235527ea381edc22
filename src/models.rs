//! Data models for fetched articles and the NewsAPI wire format.
//!
//! This module defines the structures used by the fetch stage:
//! - [`FetchedArticle`]: the title/content pair handed to script generation
//! - [`NewsApiResponse`] / [`NewsApiArticle`]: the `/v2/everything` response
//!
//! NewsAPI leaves `title`, `description`, and `content` individually nullable,
//! so [`NewsApiArticle::resolve`] owns the fallback rules.

use serde::Deserialize;

/// Placeholder title used when the article carries none.
pub const NO_TITLE: &str = "No Title";

/// Placeholder content used when both description and content are missing.
pub const NO_CONTENT: &str = "No content available.";

/// An article as selected from the news search, ready for summarization.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedArticle {
    /// The article headline.
    pub title: String,
    /// The description or content snippet, whichever was available.
    pub content: String,
}

/// Top-level NewsAPI `/v2/everything` response.
#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    /// `"ok"` or `"error"`.
    pub status: String,
    /// Total matches reported by the API (not the page size).
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<u64>,
    /// The page of matching articles.
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
}

/// A single article entry in the NewsAPI response.
///
/// Every field is nullable on the wire.
#[derive(Debug, Deserialize)]
pub struct NewsApiArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl NewsApiArticle {
    /// Collapse the nullable wire fields into a usable article.
    ///
    /// The title falls back to [`NO_TITLE`]. The body prefers the description
    /// and falls back to the content snippet; empty strings count as missing.
    pub fn resolve(self) -> FetchedArticle {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());
        let content = self
            .description
            .filter(|d| !d.trim().is_empty())
            .or(self.content.filter(|c| !c.trim().is_empty()))
            .unwrap_or_else(|| NO_CONTENT.to_string());
        FetchedArticle { title, content }
    }
}
