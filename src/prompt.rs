//! Summarization prompt template.

use crate::config::ConfigError;

/// Placeholder substituted with the combined document text
pub const PLACEHOLDER: &str = "{text}";

/// Default instruction, asking for a ~300 word summary
pub const DEFAULT_TEMPLATE: &str = "\
Provide a summary of the following content in 300 words:
Content: {text}
";

/// A prompt with exactly one `{text}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = template.into();
        if !template.contains(PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder);
        }
        Ok(Self { template })
    }

    /// Substitute `text` for the placeholder
    pub fn render(&self, text: &str) -> String {
        self.template.replacen(PLACEHOLDER, text, 1)
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_renders_text() {
        let prompt = PromptTemplate::default().render("Hello world transcript.");
        assert_eq!(
            prompt,
            "Provide a summary of the following content in 300 words:\nContent: Hello world transcript.\n"
        );
    }

    #[test]
    fn placeholder_in_content_is_left_alone() {
        let template = PromptTemplate::new("Summarize: {text}").unwrap();
        assert_eq!(template.render("a {text} b"), "Summarize: a {text} b");
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        assert!(PromptTemplate::new("no placeholder here").is_err());
    }
}
