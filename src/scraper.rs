//! Generic web page loader.
//!
//! Uses reqwest for fetching and scraper for HTML parsing. Plain text is
//! passed through and PDFs are extracted with pdf-extract.

use crate::config::LoaderConfig;
use crate::loader::{ContentLoader, Document, LoadError};
use lazy_static::lazy_static;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// Desktop browser User-Agent; some sites refuse unknown clients
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

/// Shorter blocks are usually navigation or boilerplate
const MIN_BLOCK_CHARS: usize = 20;

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref H1: Selector = Selector::parse("h1").unwrap();
    static ref TEXT_BLOCKS: Selector = Selector::parse("p, h1, h2, h3, h4, h5, h6, li").unwrap();
    static ref MAIN_AREAS: Vec<Selector> = ["article", "main", "[role='main']", ".content", "#content"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect();
}

/// Loads a single page with a fixed header set.
#[derive(Debug, Clone)]
pub struct WebPageLoader {
    client: Client,
    headers: BTreeMap<String, String>,
    verify_tls: bool,
}

impl WebPageLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self, LoadError> {
        let verify_tls = !config.accept_invalid_certs;
        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_tls)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut headers = BTreeMap::new();
        headers.insert(USER_AGENT.as_str().to_string(), config.user_agent.clone());

        Ok(Self {
            client,
            headers,
            verify_tls,
        })
    }

    /// Headers sent with every request
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }
}

impl ContentLoader for WebPageLoader {
    #[tracing::instrument(skip_all, fields(url = %url))]
    async fn load(&self, url: &Url) -> Result<Vec<Document>, LoadError> {
        let mut request = self.client.get(url.clone());
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_ascii_lowercase();
        tracing::debug!(%content_type, "Fetched page");

        let document = if content_type.starts_with("application/pdf") {
            let bytes = response.bytes().await?;
            extract_pdf(url.as_str(), &bytes)?
        } else if content_type.starts_with("text/plain") {
            let text = response.text().await?;
            if text.trim().is_empty() {
                return Err(LoadError::NoContent);
            }
            Document::new(text.trim(), url.as_str())
        } else {
            let html = response.text().await?;
            extract_document(url.as_str(), &html)?
        };

        tracing::info!(chars = document.page_content.len(), "Extracted page text");
        Ok(vec![document])
    }
}

/// Build a document from an HTML page
pub fn extract_document(source: &str, html: &str) -> Result<Document, LoadError> {
    let document = Html::parse_document(html);
    let text = extract_text(&document);

    if text.trim().is_empty() {
        return Err(LoadError::NoContent);
    }

    let mut doc = Document::new(text, source);
    if let Some(title) = extract_title(&document) {
        doc = doc.with_metadata("title", title);
    }
    Ok(doc)
}

fn extract_pdf(source: &str, bytes: &[u8]) -> Result<Document, LoadError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| LoadError::PdfError(e.to_string()))?;
    let cleaned = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if cleaned.is_empty() {
        return Err(LoadError::NoContent);
    }
    Ok(Document::new(cleaned, source).with_metadata("content_type", "application/pdf"))
}

/// Extract the page title from <title> or <h1>
fn extract_title(document: &Html) -> Option<String> {
    [&*TITLE, &*H1].into_iter().find_map(|selector| {
        let element = document.select(selector).next()?;
        let title = collapse_whitespace(&element.text().collect::<String>());
        (!title.is_empty()).then_some(title)
    })
}

/// Extract readable text, preferring the main content area
fn extract_text(document: &Html) -> String {
    for selector in MAIN_AREAS.iter() {
        if let Some(element) = document.select(selector).next() {
            let text = extract_blocks(element);
            if !text.trim().is_empty() {
                return text;
            }
        }
    }

    // Fall back to every text block on the page
    extract_blocks(document.root_element())
}

/// Join paragraphs, headings and list items below `root`
fn extract_blocks(root: ElementRef<'_>) -> String {
    root.select(&TEXT_BLOCKS)
        .map(|element| collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|block| block.chars().count() > MIN_BLOCK_CHARS)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
<html>
  <head><title>  Rust 2024   Edition </title></head>
  <body>
    <nav><ul><li>Home</li><li>A navigation entry that is long enough</li></ul></nav>
    <article>
      <h1>The Rust 2024 edition is here</h1>
      <p>The edition brings   several changes to
         the language and its tooling.</p>
      <p>Short.</p>
      <script>var ignored = "this script body is not text content";</script>
    </article>
  </body>
</html>"#;

    #[test]
    fn extracts_title_and_main_content() {
        let doc = extract_document("https://example.com/article", ARTICLE).unwrap();

        assert_eq!(doc.source(), Some("https://example.com/article"));
        assert_eq!(
            doc.metadata.get("title").map(String::as_str),
            Some("Rust 2024 Edition")
        );
        assert_eq!(
            doc.page_content,
            "The Rust 2024 edition is here\n\nThe edition brings several changes to the language and its tooling."
        );
    }

    #[test]
    fn falls_back_to_whole_page_without_main_area() {
        let html = "<html><body><h2>A heading with enough characters</h2><p>And a paragraph with enough characters.</p></body></html>";
        let doc = extract_document("https://example.com", html).unwrap();

        assert_eq!(
            doc.page_content,
            "A heading with enough characters\n\nAnd a paragraph with enough characters."
        );
        // <h1> is absent and <title> is missing
        assert!(doc.metadata.get("title").is_none());
    }

    #[test]
    fn page_without_text_is_no_content() {
        let html = "<html><body><div><img src=\"a.png\"></div></body></html>";
        let err = extract_document("https://example.com", html).unwrap_err();
        assert!(matches!(err, LoadError::NoContent));
    }

    #[test]
    fn default_loader_skips_tls_verification_and_sends_browser_agent() {
        let loader = WebPageLoader::new(&LoaderConfig::default()).unwrap();

        assert!(!loader.verify_tls());
        assert_eq!(
            loader.headers().get("user-agent").map(String::as_str),
            Some(BROWSER_USER_AGENT)
        );
        assert_eq!(loader.headers().len(), 1);
    }
}
