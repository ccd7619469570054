//! Request dispatcher: validate input, pick a loader, summarize.

use crate::agent::{HuggingFaceEndpoint, InferenceEndpoint, InferenceError, StuffSummarizer};
use crate::config::Config;
use crate::loader::{ContentLoader, LoadError, SourceKind};
use crate::request::{Field, RequestError, SummarizeRequest};
use crate::scraper::WebPageLoader;
use crate::summary::Summary;
use crate::youtube::YoutubeTranscriptLoader;
use std::error::Error as _;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("please provide both the API token and a URL ({0} is blank)")]
    MissingInput(Field),
    #[error("the URL is invalid, please enter a valid YouTube or website URL")]
    InvalidUrl(String),
    #[error("something went wrong during summarization")]
    SummarizationFailed(#[source] Failure),
}

/// Underlying cause of a failed summarization, kept for diagnostics only
#[derive(Error, Debug)]
pub enum Failure {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl DispatchError {
    /// Diagnostic text for unexpected failures
    pub fn detail(&self) -> Option<String> {
        let DispatchError::SummarizationFailed(failure) = self else {
            return None;
        };

        let mut detail = failure.to_string();
        let mut source = failure.source();
        while let Some(cause) = source {
            detail.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
        Some(detail)
    }
}

impl From<RequestError> for DispatchError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::MissingInput(field) => DispatchError::MissingInput(field),
            RequestError::InvalidUrl(url) => DispatchError::InvalidUrl(url),
        }
    }
}

impl From<LoadError> for DispatchError {
    fn from(err: LoadError) -> Self {
        DispatchError::SummarizationFailed(err.into())
    }
}

impl From<InferenceError> for DispatchError {
    fn from(err: InferenceError) -> Self {
        DispatchError::SummarizationFailed(err.into())
    }
}

/// Routes a request to the video or the generic loader, then summarizes.
pub struct Dispatcher<V, G, E> {
    video: V,
    web: G,
    endpoint: E,
    summarizer: StuffSummarizer,
}

/// Dispatcher wired to YouTube, the web and Hugging Face
pub type HostedDispatcher = Dispatcher<YoutubeTranscriptLoader, WebPageLoader, HuggingFaceEndpoint>;

impl HostedDispatcher {
    pub fn from_config(config: &Config) -> Result<Self, DispatchError> {
        let video = YoutubeTranscriptLoader::new(&config.loader)?;
        let web = WebPageLoader::new(&config.loader)?;
        let endpoint = HuggingFaceEndpoint::new(&config.endpoint)?;
        let summarizer = StuffSummarizer::from_config(&config.summary)?;

        Ok(Dispatcher::new(video, web, endpoint).with_summarizer(summarizer))
    }
}

impl<V, G, E> Dispatcher<V, G, E>
where
    V: ContentLoader,
    G: ContentLoader,
    E: InferenceEndpoint,
{
    pub fn new(video: V, web: G, endpoint: E) -> Self {
        Self {
            video,
            web,
            endpoint,
            summarizer: StuffSummarizer::default(),
        }
    }

    pub fn with_summarizer(mut self, summarizer: StuffSummarizer) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Validate, load and summarize. Nothing is contacted when validation fails.
    #[tracing::instrument(skip_all)]
    pub async fn dispatch(&self, request: &SummarizeRequest) -> Result<Summary, DispatchError> {
        let (credential, url) = request.validate()?;

        let source = SourceKind::classify(&url);
        tracing::info!(%url, %source, "Loading content");

        let documents = match source {
            SourceKind::VideoPlatform => self.video.load(&url).await,
            SourceKind::GenericPage => self.web.load(&url).await,
        }
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load content"))?;

        let text = self
            .summarizer
            .run(&self.endpoint, &credential, &documents)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))?;

        Ok(Summary::new(url.to_string(), source, documents.len(), text))
    }
}
