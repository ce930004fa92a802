use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;

use crate::domain::{ports::DocumentFetcher, Document, DomainError};

const DEFAULT_TITLE: &str = "Documentation";

/// Fetches pages over HTTP and strips them to plain text.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docs-chat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::external(e.to_string()))?
            .error_for_status()
            .map_err(|e| DomainError::external(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let page = strip_html(&body);
        let title = page.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Ok(Document::new(url, title, page.text))
    }
}

struct StrippedPage {
    title: Option<String>,
    text: String,
}

/// Extracts the page title and visible text, dropping script, style and
/// noscript content and collapsing whitespace runs to single spaces.
fn strip_html(html: &str) -> StrippedPage {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty());

    let mut raw = String::new();
    for node in document.root_element().descendants() {
        if let Some(text) = node.value().as_text() {
            let excluded = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"))
            });
            if !excluded {
                raw.push_str(text);
                raw.push(' ');
            }
        }
    }

    StrippedPage {
        title,
        text: collapse_whitespace(&raw),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const PAGE: &str = r#"
        <html>
          <head>
            <title>  Getting   Started </title>
            <style>body { color: red; }</style>
          </head>
          <body>
            <h1>Introduction</h1>
            <script>console.log("tracking");</script>
            <p>Welcome   to
               the docs.</p>
            <noscript>Enable JavaScript</noscript>
          </body>
        </html>
    "#;

    #[test]
    fn test_strip_html_drops_script_and_style() {
        let page = strip_html(PAGE);

        assert_eq!(page.title.as_deref(), Some("Getting Started"));
        assert!(page.text.contains("Introduction"));
        assert!(page.text.contains("Welcome to the docs."));
        assert!(!page.text.contains("console.log"));
        assert!(!page.text.contains("color: red"));
        assert!(!page.text.contains("Enable JavaScript"));
    }

    #[test]
    fn test_strip_html_without_title() {
        let page = strip_html("<html><body><p>plain</p></body></html>");

        assert!(page.title.is_none());
        assert_eq!(page.text, "plain");
    }

    #[tokio::test]
    async fn test_fetch_returns_stripped_document() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/docs/intro");
                then.status(200).body(PAGE);
            })
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let doc = fetcher.fetch(&server.url("/docs/intro")).await.unwrap();

        assert_eq!(doc.title, "Getting Started");
        assert!(doc.content.contains("Welcome to the docs."));
        assert_eq!(doc.source_url, server.url("/docs/intro"));
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/docs/missing");
                then.status(404);
            })
            .await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let result = fetcher.fetch(&server.url("/docs/missing")).await;

        assert!(matches!(result, Err(DomainError::ExternalService(_))));
    }
}
