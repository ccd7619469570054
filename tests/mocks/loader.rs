use super::{Call, Journal};
use url::Url;
use urlgist::{ContentLoader, Document, LoadError};

#[derive(Clone)]
pub struct MockLoader {
    pub name: &'static str,
    pub documents: Vec<Document>,
    pub journal: Journal,
    pub fail_with: Option<String>,
}

impl MockLoader {
    pub fn new(name: &'static str, journal: &Journal, content: &str) -> Self {
        Self {
            name,
            documents: vec![Document::new(content, "mock")],
            journal: journal.clone(),
            fail_with: None,
        }
    }

    pub fn failing(name: &'static str, journal: &Journal, msg: &str) -> Self {
        Self {
            name,
            documents: Vec::new(),
            journal: journal.clone(),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl ContentLoader for MockLoader {
    async fn load(&self, url: &Url) -> Result<Vec<Document>, LoadError> {
        self.journal.lock().unwrap().push(Call::Load {
            loader: self.name,
            url: url.to_string(),
        });
        if let Some(ref msg) = self.fail_with {
            return Err(LoadError::TranscriptError(msg.clone()));
        }
        Ok(self.documents.clone())
    }
}
