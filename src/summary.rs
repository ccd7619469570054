//! Summary struct - the result of a successful dispatch.

use crate::loader::SourceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The URL that was summarized
    pub url: String,
    /// Which loader produced the content
    pub source: SourceKind,
    /// Number of documents stuffed into the prompt
    pub document_count: usize,
    /// Generated summary text
    pub text: String,
}

impl Summary {
    pub fn new(url: String, source: SourceKind, document_count: usize, text: String) -> Self {
        Self {
            url,
            source,
            document_count,
            text,
        }
    }

    /// Approximate word count of the summary
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
