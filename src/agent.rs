//! LLM layer: the hosted inference endpoint and the "stuff" summarization.
//!
//! Every document is concatenated into one prompt and the model is called
//! exactly once. Nothing is chunked or map-reduced.

use crate::config::{EndpointConfig, SummaryConfig};
use crate::loader::Document;
use crate::prompt::PromptTemplate;
use crate::request::Credential;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Separator placed between documents in the combined prompt
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("LLM request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("inference API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("model returned no text")]
    EmptyResponse,
    #[error("nothing to summarize")]
    EmptyInput,
    #[error("configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

/// A hosted model that turns a prompt into text.
pub trait InferenceEndpoint {
    fn generate(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> impl Future<Output = Result<String, InferenceError>>;
}

/// Hugging Face text-generation endpoint
#[derive(Debug, Clone)]
pub struct HuggingFaceEndpoint {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_new_tokens: u32,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
    options: GenerationOptions,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f32,
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Serialize)]
struct GenerationOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

/// The API answers with a list, a single object, or an error object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<Generation>),
    Single(Generation),
    Error { error: String },
}

impl HuggingFaceEndpoint {
    pub fn new(config: &EndpointConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_new_tokens: config.max_new_tokens,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint_url(&self) -> String {
        format!("{}/{}", self.base_url, self.model)
    }
}

impl InferenceEndpoint for HuggingFaceEndpoint {
    #[tracing::instrument(skip_all, fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn generate(&self, credential: &Credential, prompt: &str) -> Result<String, InferenceError> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                temperature: self.temperature,
                max_new_tokens: self.max_new_tokens,
                return_full_text: false,
            },
            options: GenerationOptions {
                wait_for_model: true,
            },
        };

        let resp = self
            .client
            .post(self.endpoint_url())
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(InferenceError::Api { status, message });
        }

        let text = match resp.json::<GenerationResponse>().await? {
            GenerationResponse::Batch(generations) => generations
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .unwrap_or_default(),
            GenerationResponse::Single(generation) => generation.generated_text,
            GenerationResponse::Error { error } => {
                return Err(InferenceError::Api {
                    status: 200,
                    message: error,
                })
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(InferenceError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Combines every document into one prompt and calls the model once.
#[derive(Debug, Clone, Default)]
pub struct StuffSummarizer {
    template: PromptTemplate,
    max_input_chars: Option<usize>,
}

impl StuffSummarizer {
    pub fn new(template: PromptTemplate, max_input_chars: Option<usize>) -> Self {
        Self {
            template,
            max_input_chars,
        }
    }

    pub fn from_config(config: &SummaryConfig) -> Result<Self, InferenceError> {
        let template = PromptTemplate::new(config.prompt.clone())?;
        Ok(Self::new(template, config.max_input_chars))
    }

    /// Render the prompt for `documents`
    pub fn prompt(&self, documents: &[Document]) -> Result<String, InferenceError> {
        let combined = documents
            .iter()
            .map(|doc| doc.page_content.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(DOCUMENT_SEPARATOR);

        if combined.is_empty() {
            return Err(InferenceError::EmptyInput);
        }

        let text = match self.max_input_chars {
            Some(limit) => {
                let cut = truncate_chars(&combined, limit);
                if cut.len() < combined.len() {
                    tracing::warn!(
                        limit,
                        total_chars = combined.chars().count(),
                        "Content exceeds input limit, truncating"
                    );
                }
                cut
            }
            None => combined.as_str(),
        };

        Ok(self.template.render(text))
    }

    pub async fn run<E: InferenceEndpoint>(
        &self,
        endpoint: &E,
        credential: &Credential,
        documents: &[Document],
    ) -> Result<String, InferenceError> {
        let prompt = self.prompt(documents)?;
        endpoint.generate(credential, &prompt).await
    }
}

/// Cut `text` to at most `max` characters on a char boundary
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summarizer(limit: Option<usize>) -> StuffSummarizer {
        StuffSummarizer::new(PromptTemplate::new("Summarize: {text}").unwrap(), limit)
    }

    #[test]
    fn documents_are_stuffed_into_one_prompt() {
        let docs = vec![
            Document::new("First part.", "a"),
            Document::new("  ", "b"),
            Document::new("Second part.\n", "c"),
        ];
        let prompt = summarizer(None).prompt(&docs).unwrap();
        assert_eq!(prompt, "Summarize: First part.\n\nSecond part.");
    }

    #[test]
    fn empty_documents_are_rejected() {
        let docs = vec![Document::new("", "a")];
        assert!(matches!(
            summarizer(None).prompt(&docs).unwrap_err(),
            InferenceError::EmptyInput
        ));
        assert!(matches!(
            summarizer(None).prompt(&[]).unwrap_err(),
            InferenceError::EmptyInput
        ));
    }

    #[test]
    fn oversized_content_is_truncated_on_char_boundary() {
        let docs = vec![Document::new("héllo wörld", "a")];
        let prompt = summarizer(Some(5)).prompt(&docs).unwrap();
        assert_eq!(prompt, "Summarize: héllo");
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn endpoint_url_joins_model() {
        let endpoint = HuggingFaceEndpoint::new(&EndpointConfig::default())
            .unwrap()
            .with_base_url("http://localhost:1234/models/");
        assert_eq!(
            endpoint.endpoint_url(),
            "http://localhost:1234/models/mistralai/Mistral-7B-Instruct-v0.3"
        );
    }

    #[test]
    fn response_shapes_deserialize() {
        let batch: GenerationResponse =
            serde_json::from_str(r#"[{"generated_text": "a"}]"#).unwrap();
        assert!(matches!(batch, GenerationResponse::Batch(ref g) if g[0].generated_text == "a"));

        let single: GenerationResponse = serde_json::from_str(r#"{"generated_text": "b"}"#).unwrap();
        assert!(matches!(single, GenerationResponse::Single(ref g) if g.generated_text == "b"));

        let error: GenerationResponse =
            serde_json::from_str(r#"{"error": "Model is overloaded"}"#).unwrap();
        assert!(matches!(error, GenerationResponse::Error { ref error } if error == "Model is overloaded"));
    }
}
