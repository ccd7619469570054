//! # urlgist
//!
//! Summarise YouTube videos and webpages with a model hosted on Hugging Face.
//!
//! ## Features
//!
//! - **Two loaders**: YouTube transcripts via yt-transcript-rs, everything else scraped with reqwest + scraper
//! - **Stuff summarization**: all extracted text goes into one prompt, one model call
//! - **Explicit outcomes**: `Dispatcher::dispatch` returns `Result<Summary, DispatchError>`
//! - **TUI and CLI**: ratatui form or a one-shot `summarise` command

pub mod agent;
pub mod config;
pub mod dispatcher;
pub mod loader;
pub mod logging;
pub mod prompt;
pub mod request;
pub mod scraper;
pub mod summary;
pub mod ui;
pub mod youtube;

pub use agent::{HuggingFaceEndpoint, InferenceEndpoint, InferenceError, StuffSummarizer};
pub use config::Config;
pub use dispatcher::{DispatchError, Dispatcher, HostedDispatcher};
pub use loader::{ContentLoader, Document, LoadError, SourceKind};
pub use prompt::PromptTemplate;
pub use request::{Credential, Field, SummarizeRequest};
pub use summary::Summary;
