//! Wikipedia lookup through the MediaWiki API.

use super::Tool;
use crate::error::{Result, ScoutError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{instrument, warn};

const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// The MediaWiki search API rejects longer queries.
const MAX_QUERY_CHARS: usize = 300;

const NO_RESULT: &str = "No good Wikipedia Search Result was found";

/// Look up page summaries on Wikipedia.
pub struct WikipediaTool {
    http: reqwest::Client,
    endpoint: String,
    top_k: usize,
    chars_max: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    extract: Option<String>,
}

impl WikipediaTool {
    pub fn new(http: reqwest::Client, top_k: usize, chars_max: usize) -> Self {
        Self::with_endpoint(http, WIKIPEDIA_API_URL, top_k, chars_max)
    }

    /// Use a different MediaWiki API endpoint.
    pub fn with_endpoint(
        http: reqwest::Client,
        endpoint: &str,
        top_k: usize,
        chars_max: usize,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
            top_k: top_k.max(1),
            chars_max,
        }
    }

    async fn lookup(&self, query: &str) -> Result<String> {
        let query: String = query.chars().take(MAX_QUERY_CHARS).collect();
        let limit = self.top_k.to_string();

        let search: SearchResponse = self
            .get_json(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query.as_str()),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .await?;

        let mut summaries = Vec::new();
        for hit in search.query.search.iter().take(self.top_k) {
            if let Some(summary) = self.page_summary(&hit.title).await? {
                summaries.push(summary);
            }
        }

        Ok(format_summaries(&summaries, self.chars_max))
    }

    async fn page_summary(&self, title: &str) -> Result<Option<String>> {
        let response: ExtractResponse = self
            .get_json(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .await?;

        Ok(response
            .query
            .pages
            .into_values()
            .find_map(|page| page.extract.map(|extract| format_page(&page.title, &extract))))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let url = url::Url::parse_with_params(&self.endpoint, params)
            .map_err(|e| ScoutError::InvalidInput(format!("Bad Wikipedia URL: {}", e)))?;
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "A wrapper around Wikipedia. Useful for when you need to answer general questions about \
         people, places, companies, facts, historical events, or other subjects. \
         Input should be a search query."
    }

    #[instrument(skip(self))]
    async fn invoke(&self, input: &str) -> String {
        match self.lookup(input).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Wikipedia lookup failed: {}", e);
                format!("Wikipedia lookup failed: {}", e)
            }
        }
    }
}

fn format_page(title: &str, extract: &str) -> String {
    format!("Page: {}\nSummary: {}", title, extract.trim())
}

/// Join page summaries and cap the result at `chars_max` characters.
fn format_summaries(summaries: &[String], chars_max: usize) -> String {
    if summaries.is_empty() {
        return NO_RESULT.to_string();
    }
    summaries.join("\n\n").chars().take(chars_max).collect()
}
