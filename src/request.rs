//! User input for a single summarization: the API token and the target URL.

use std::fmt;
use thiserror::Error;
use url::{Host, Url};

/// Schemes the loaders can fetch
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("please provide both the API token and a URL")]
    MissingInput(Field),
    #[error("the URL is invalid, please enter a valid YouTube or website URL: {0}")]
    InvalidUrl(String),
}

/// The input field that was left blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Credential,
    Url,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Credential => f.write_str("API token"),
            Field::Url => f.write_str("URL"),
        }
    }
}

/// Opaque API token. Never logged or printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RequestError::MissingInput(Field::Credential));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Raw input for one invocation, built fresh each time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummarizeRequest {
    pub credential: String,
    pub url: String,
}

impl SummarizeRequest {
    pub fn new(credential: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
            url: url.into(),
        }
    }

    /// Check both fields without touching the network.
    ///
    /// Blank fields are reported before a malformed URL.
    pub fn validate(&self) -> Result<(Credential, Url), RequestError> {
        let credential = Credential::parse(&self.credential)?;
        if self.url.trim().is_empty() {
            return Err(RequestError::MissingInput(Field::Url));
        }
        let url = parse_url(&self.url)?;
        Ok((credential, url))
    }
}

/// Syntax-level URL check: scheme and host must be present
pub fn is_valid(url: &str) -> bool {
    parse_url(url).is_ok()
}

pub fn parse_url(raw: &str) -> Result<Url, RequestError> {
    let raw = raw.trim();
    let invalid = || RequestError::InvalidUrl(raw.to_string());

    // The url crate accepts `http:/host`; require the full authority marker
    if !raw.contains("://") || raw.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let url = Url::parse(raw).map_err(|_| invalid())?;
    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(invalid());
    }

    match url.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(url),
        Some(Host::Domain(domain)) if is_public_domain(domain) => Ok(url),
        _ => Err(invalid()),
    }
}

/// Dotted hostname whose last label looks like a TLD
fn is_public_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let label_ok = |label: &&str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    let tld_ok = labels.last().is_some_and(|tld| {
        tld.len() >= 2
            && (tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"))
    });

    labels.iter().all(label_ok) && tld_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credential_is_missing_input() {
        let request = SummarizeRequest::new("   ", "https://example.com");
        assert_eq!(
            request.validate().unwrap_err(),
            RequestError::MissingInput(Field::Credential)
        );
    }

    #[test]
    fn blank_url_is_missing_input() {
        let request = SummarizeRequest::new("tok_123", "\t\n");
        assert_eq!(
            request.validate().unwrap_err(),
            RequestError::MissingInput(Field::Url)
        );
    }

    #[test]
    fn blank_fields_win_over_malformed_url() {
        let request = SummarizeRequest::new("", "not a url");
        assert!(matches!(
            request.validate().unwrap_err(),
            RequestError::MissingInput(_)
        ));
    }

    #[test]
    fn malformed_urls_are_rejected() {
        for url in [
            "not a url",
            "ftp:/broken",
            "https:/example.com",
            "example.com",
            "https://",
            "https://localhost/page",
            "https://exa mple.com",
            "mailto:someone@example.com",
            "ftp://example.com/file",
            "https://example.c0m",
        ] {
            assert!(!is_valid(url), "{url} should be invalid");
        }
    }

    #[test]
    fn well_formed_urls_are_accepted() {
        for url in [
            "https://www.youtube.com/watch?v=abc123",
            "https://example.com/article",
            "http://sub.domain.co.uk/path?q=1#frag",
            "https://192.168.0.10:8080/",
            "http://[::1]/",
            "  https://example.com  ",
        ] {
            assert!(is_valid(url), "{url} should be valid");
        }
    }

    #[test]
    fn validate_trims_credential() {
        let request = SummarizeRequest::new("  tok_123 ", "https://example.com");
        let (credential, url) = request.validate().unwrap();
        assert_eq!(credential.expose(), "tok_123");
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn credential_debug_is_redacted() {
        let credential = Credential::parse("hf_secret").unwrap();
        assert!(!format!("{credential:?}").contains("hf_secret"));
    }
}
