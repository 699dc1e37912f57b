//! Web search through the DuckDuckGo HTML endpoint.

use super::Tool;
use crate::error::{Result, ScoutError};
use async_trait::async_trait;
use tracing::{instrument, warn};

const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// Maximum number of results returned to the model.
const MAX_RESULTS: usize = 5;

/// Search the web for info.
pub struct SearchTool {
    http: reqwest::Client,
    endpoint: String,
}

impl SearchTool {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_endpoint(http, DUCKDUCKGO_HTML_URL)
    }

    /// Use a different search endpoint that serves DuckDuckGo-style HTML.
    pub fn with_endpoint(http: reqwest::Client, endpoint: &str) -> Self {
        Self {
            http,
            endpoint: endpoint.to_string(),
        }
    }

    async fn search(&self, query: &str) -> Result<String> {
        let url = url::Url::parse_with_params(&self.endpoint, &[("q", query)])
            .map_err(|e| ScoutError::InvalidInput(format!("Bad search URL: {}", e)))?;

        let response = self.http.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;

        if html.contains("anomaly-modal") || html.contains("Unfortunately, bots") {
            return Err(ScoutError::Agent(
                "DuckDuckGo blocked the request with a CAPTCHA".to_string(),
            ));
        }

        let results = extract_results(&html);
        if results.is_empty() {
            Ok(format!("No results found for: {}", query))
        } else {
            Ok(results.join("\n\n"))
        }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search the web for info."
    }

    #[instrument(skip(self))]
    async fn invoke(&self, input: &str) -> String {
        match self.search(input).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Search failed: {}", e);
                format!("Search failed: {}", e)
            }
        }
    }
}

/// Extract title, snippet and URL of each result from DuckDuckGo HTML.
fn extract_results(html: &str) -> Vec<String> {
    html.split("result__body")
        .skip(1)
        .filter_map(|chunk| {
            let title = inner_text(chunk, "class=\"result__a\"")?;
            let snippet = inner_text(chunk, "class=\"result__snippet\"").unwrap_or_default();
            let url = inner_text(chunk, "class=\"result__url\"").unwrap_or_default();
            Some(format!("{}\n{}\nURL: {}", title, snippet, url))
        })
        .take(MAX_RESULTS)
        .collect()
}

/// Text of the element opened at `marker`, up to its closing `</a>`, tags stripped.
fn inner_text(chunk: &str, marker: &str) -> Option<String> {
    let inner = chunk.split(marker).nth(1)?.split_once('>')?.1;
    let inner = inner.split("</a>").next()?;
    let text = html_decode(&strip_tags(inner));
    (!text.is_empty()).then_some(text)
}

/// Remove tags and collapse whitespace.
fn strip_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Basic HTML entity decoding. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
fn html_decode(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
<div class="results">
  <div class="result results_links">
    <div class="links_main links_deep result__body">
      <h2 class="result__title"><a rel="nofollow" class="result__a" href="https://www.rust-lang.org/">Rust Programming Language</a></h2>
      <a class="result__url" href="https://www.rust-lang.org/"> www.rust-lang.org </a>
      <a class="result__snippet" href="https://www.rust-lang.org/">A language empowering everyone to build reliable &amp; efficient software.</a>
    </div>
  </div>
  <div class="result results_links">
    <div class="links_main links_deep result__body">
      <h2 class="result__title"><a rel="nofollow" class="result__a" href="https://en.wikipedia.org/wiki/Rust">Rust (programming language) - Wikipedia</a></h2>
      <a class="result__url" href="https://en.wikipedia.org/wiki/Rust">en.wikipedia.org/wiki/Rust</a>
    </div>
  </div>
</div>"#;

    #[test]
    fn test_extract_results() {
        let results = extract_results(SAMPLE_HTML);
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            "Rust Programming Language\nA language empowering everyone to build reliable & efficient software.\nURL: www.rust-lang.org"
        );
        assert!(results[1].starts_with("Rust (programming language) - Wikipedia\n\nURL:"));
    }

    #[test]
    fn test_extract_results_without_matches() {
        assert!(extract_results("<html><body>nothing here</body></html>").is_empty());
    }

    #[test]
    fn test_extract_results_keeps_highlighted_terms() {
        let html = r#"
<div class="links_main links_deep result__body">
  <h2 class="result__title"><a rel="nofollow" class="result__a" href="https://www.rust-lang.org/"><b>Rust</b> Programming Language</a></h2>
  <a class="result__url" href="https://www.rust-lang.org/">www.rust-lang.org</a>
  <a class="result__snippet" href="https://www.rust-lang.org/">The <b>Rust</b> language empowers everyone to build <b>reliable</b> software.</a>
</div>"#;
        let results = extract_results(html);
        assert_eq!(
            results,
            vec![
                "Rust Programming Language\nThe Rust language empowers everyone to build reliable software.\nURL: www.rust-lang.org"
            ]
        );
    }

    #[test]
    fn test_html_decode() {
        assert_eq!(html_decode("a &lt;b&gt; &quot;c&quot; &#39;d&#39;"), "a <b> \"c\" 'd'");
        assert_eq!(html_decode("&amp;lt;"), "&lt;");
        assert_eq!(html_decode("R&amp;D"), "R&D");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_returns_error_string() {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap();
        let tool = SearchTool::with_endpoint(http, "http://127.0.0.1:9/html/");
        let output = tool.invoke("rust").await;
        assert!(output.starts_with("Search failed:"), "got {}", output);
    }
}
