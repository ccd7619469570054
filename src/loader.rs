//! Content loading: the `ContentLoader` capability and URL classification.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Host substring identifying the video platform
pub const VIDEO_PLATFORM_TOKEN: &str = "youtube.com";

/// Short-link host of the video platform
pub const VIDEO_SHORT_LINK_HOST: &str = "youtu.be";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("{url} responded with status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("no content found at URL")]
    NoContent,
    #[error("no video id in URL: {0}")]
    MissingVideoId(String),
    #[error("failed to retrieve transcript: {0}")]
    TranscriptError(String),
    #[error("failed to extract PDF text: {0}")]
    PdfError(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// A unit of extracted text plus metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub page_content: String,
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Create a document whose `source` metadata is set
    pub fn new(page_content: impl Into<String>, source: impl Into<String>) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), source.into());
        Self {
            page_content: page_content.into(),
            metadata,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").map(String::as_str)
    }
}

/// Turns a URL into one or more documents.
pub trait ContentLoader {
    fn load(&self, url: &Url) -> impl Future<Output = Result<Vec<Document>, LoadError>>;
}

/// Which loader handles a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    VideoPlatform,
    GenericPage,
}

impl SourceKind {
    pub fn classify(url: &Url) -> Self {
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        if host.contains(VIDEO_PLATFORM_TOKEN) || host == VIDEO_SHORT_LINK_HOST {
            SourceKind::VideoPlatform
        } else {
            SourceKind::GenericPage
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::VideoPlatform => f.write_str("video"),
            SourceKind::GenericPage => f.write_str("web page"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(url: &str) -> SourceKind {
        SourceKind::classify(&Url::parse(url).unwrap())
    }

    #[test]
    fn youtube_hosts_are_video() {
        assert_eq!(kind("https://www.youtube.com/watch?v=abc123"), SourceKind::VideoPlatform);
        assert_eq!(kind("https://m.youtube.com/watch?v=abc123"), SourceKind::VideoPlatform);
        assert_eq!(kind("https://youtube.com/shorts/abc123"), SourceKind::VideoPlatform);
        assert_eq!(kind("https://youtu.be/abc123"), SourceKind::VideoPlatform);
    }

    #[test]
    fn other_hosts_are_generic() {
        assert_eq!(kind("https://example.com/article"), SourceKind::GenericPage);
        assert_eq!(kind("https://vimeo.com/12345"), SourceKind::GenericPage);
    }

    #[test]
    fn token_in_path_does_not_count() {
        assert_eq!(
            kind("https://example.com/youtube.com/watch?v=abc123"),
            SourceKind::GenericPage
        );
    }

    #[test]
    fn document_carries_source() {
        let doc = Document::new("text", "https://example.com").with_metadata("title", "Example");
        assert_eq!(doc.source(), Some("https://example.com"));
        assert_eq!(doc.metadata.get("title").map(String::as_str), Some("Example"));
    }
}
