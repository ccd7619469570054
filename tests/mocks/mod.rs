pub mod endpoint;
pub mod loader;

use std::sync::{Arc, Mutex};

/// Calls made to any mock, in order
pub type Journal = Arc<Mutex<Vec<Call>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load { loader: &'static str, url: String },
    Generate { credential: String, prompt: String },
}

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}
