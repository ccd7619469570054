//! YouTube transcript loader.
//!
//! Transcripts come from yt-transcript-rs; with metadata enabled the
//! video's title, author, view count and length are attached as well.

use crate::config::LoaderConfig;
use crate::loader::{ContentLoader, Document, LoadError, VIDEO_SHORT_LINK_HOST};
use std::time::Duration;
use url::Url;
use yt_transcript_rs::api::YouTubeTranscriptApi;

/// Path prefixes that carry the video id as the next segment
const ID_PATH_PREFIXES: [&str; 4] = ["shorts", "embed", "live", "v"];

pub struct YoutubeTranscriptLoader {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
    include_metadata: bool,
    timeout: Duration,
}

impl YoutubeTranscriptLoader {
    pub fn new(config: &LoaderConfig) -> Result<Self, LoadError> {
        // No proxy and no cookie authentication
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| LoadError::TranscriptError(e.to_string()))?;

        Ok(Self {
            api,
            languages: config.languages.clone(),
            include_metadata: config.video_metadata,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    async fn attach_details(&self, video_id: &str, doc: Document) -> Document {
        let details = match tokio::time::timeout(
            self.timeout,
            self.api.fetch_video_details(video_id),
        )
        .await
        {
            Ok(Ok(details)) => details,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, video_id, "Failed to fetch video details");
                return doc;
            }
            Err(_) => {
                tracing::warn!(video_id, "Timed out fetching video details");
                return doc;
            }
        };

        doc.with_metadata("title", details.title.to_string())
            .with_metadata("author", details.author.to_string())
            .with_metadata("view_count", details.view_count.to_string())
            .with_metadata("length_seconds", details.length_seconds.to_string())
    }
}

impl ContentLoader for YoutubeTranscriptLoader {
    #[tracing::instrument(skip_all, fields(url = %url))]
    async fn load(&self, url: &Url) -> Result<Vec<Document>, LoadError> {
        let video_id = video_id(url).ok_or_else(|| LoadError::MissingVideoId(url.to_string()))?;
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();

        let transcript = tokio::time::timeout(
            self.timeout,
            self.api.fetch_transcript(&video_id, &languages, false),
        )
        .await
        .map_err(|_| LoadError::Timeout(self.timeout))?
        .map_err(|e| LoadError::TranscriptError(e.to_string()))?;

        let text = transcript.text();
        if text.trim().is_empty() {
            return Err(LoadError::NoContent);
        }
        tracing::info!(
            %video_id,
            language = %transcript.language_code,
            snippets = transcript.snippets.len(),
            "Fetched transcript"
        );

        let mut doc = Document::new(text, video_id.clone())
            .with_metadata("language", transcript.language_code.to_string());
        if self.include_metadata {
            doc = self.attach_details(&video_id, doc).await;
        }

        Ok(vec![doc])
    }
}

/// Extract the video id from the common YouTube URL shapes
pub fn video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if host == VIDEO_SHORT_LINK_HOST {
        segments.next().map(str::to_string)
    } else if let Some((_, id)) = url.query_pairs().find(|(key, _)| key == "v") {
        Some(id.into_owned())
    } else {
        match segments.next() {
            Some(prefix) if ID_PATH_PREFIXES.contains(&prefix) => {
                segments.next().map(str::to_string)
            }
            _ => None,
        }
    };

    candidate.filter(|id| {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}
