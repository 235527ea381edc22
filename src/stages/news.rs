//! Article fetch stage backed by the NewsAPI search endpoint.
//!
//! Queries `/v2/everything` for the user's topic, sorted by relevancy and
//! limited to a single English article. Only the title and a content snippet
//! survive this stage; everything else in the response is ignored.

use crate::models::{FetchedArticle, NewsApiResponse};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

const SEARCH_ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// Build the NewsAPI search URL for a topic.
fn search_url(topic: &str, api_key: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        SEARCH_ENDPOINT,
        &[
            ("q", topic),
            ("sortBy", "relevancy"),
            ("language", "en"),
            ("pageSize", "1"),
            ("apiKey", api_key),
        ],
    )
}

/// Fetch the most relevant article for a topic.
///
/// Returns `Ok(None)` when the search succeeds but matches nothing, so the
/// caller can stop the pipeline without treating it as a failure.
///
/// # Errors
///
/// Returns an error on network failure, a non-2xx response, or a response
/// body that doesn't match the NewsAPI schema.
#[instrument(level = "info", skip_all, fields(%topic))]
pub async fn fetch_top_article(
    client: &reqwest::Client,
    topic: &str,
    api_key: &str,
) -> Result<Option<FetchedArticle>, Box<dyn Error>> {
    let url = search_url(topic, api_key)?;
    debug!(endpoint = SEARCH_ENDPOINT, "Requesting article search");

    let response: NewsApiResponse = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if response.status != "ok" {
        return Err(format!("NewsAPI returned status {:?}", response.status).into());
    }

    let total = response.total_results.unwrap_or(0);
    let Some(article) = response.articles.into_iter().next() else {
        warn!(total_results = total, "No articles found for topic");
        return Ok(None);
    };

    let article = article.resolve();
    info!(title = %article.title, total_results = total, "Found article");
    Ok(Some(article))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_query_params() {
        let url = search_url("space exploration", "secret").unwrap();
        assert_eq!(url.host_str(), Some("newsapi.org"));
        assert_eq!(url.path(), "/v2/everything");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "space exploration".to_string())));
        assert!(pairs.contains(&("sortBy".to_string(), "relevancy".to_string())));
        assert!(pairs.contains(&("language".to_string(), "en".to_string())));
        assert!(pairs.contains(&("pageSize".to_string(), "1".to_string())));
        assert!(pairs.contains(&("apiKey".to_string(), "secret".to_string())));
    }

    #[test]
    fn test_search_url_encodes_topic() {
        let url = search_url("bread & circuses", "k").unwrap();
        assert!(url.as_str().contains("bread+%26+circuses") || url.as_str().contains("bread%20%26%20circuses"));
    }
}
