use super::{Call, Journal};
use urlgist::{Credential, InferenceEndpoint, InferenceError};

#[derive(Clone)]
pub struct MockEndpoint {
    pub reply: String,
    pub journal: Journal,
    pub fail_with: Option<String>,
}

impl MockEndpoint {
    pub fn new(journal: &Journal, reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            journal: journal.clone(),
            fail_with: None,
        }
    }

    pub fn failing(journal: &Journal, msg: &str) -> Self {
        Self {
            reply: String::new(),
            journal: journal.clone(),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl InferenceEndpoint for MockEndpoint {
    async fn generate(&self, credential: &Credential, prompt: &str) -> Result<String, InferenceError> {
        self.journal.lock().unwrap().push(Call::Generate {
            credential: credential.expose().to_string(),
            prompt: prompt.to_string(),
        });
        if let Some(ref msg) = self.fail_with {
            return Err(InferenceError::Api {
                status: 401,
                message: msg.clone(),
            });
        }
        Ok(self.reply.clone())
    }
}
