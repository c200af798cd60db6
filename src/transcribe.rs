//! Voice-note transcription.
//!
//! Transcription is a collaborator behind the [`Transcriber`] trait, so the
//! pipeline stays testable without a speech-recognition backend. The bundled
//! implementation talks to an OpenAI-compatible audio endpoint and is gated
//! behind the `transcription` feature.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::archive::Extracted;
use crate::error::Result;
use crate::message::ParsedChat;

/// Default number of clips transcribed concurrently.
pub const DEFAULT_TRANSCRIPTION_CONCURRENCY: usize = 4;

/// A speech-to-text backend.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribes one audio clip to text.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects or fails the request. The
    /// pipeline skips failed clips rather than aborting.
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String>;
}

/// One transcribed voice note, attributed to its message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionRecord {
    pub timestamp: DateTime<Utc>,
    pub sender: String,
    pub text: String,
}

/// Transcribes every voice note in the chat whose audio file survived
/// extraction.
///
/// Clips run through the backend with bounded concurrency. A clip whose
/// audio is missing from the archive, or whose transcription fails, is
/// logged and skipped; the rest still complete. Records come back in
/// message-timestamp order.
pub async fn transcribe_voice_notes(
    transcriber: &dyn Transcriber,
    chat: &ParsedChat,
    extracted: &Extracted,
    concurrency: usize,
) -> Vec<TranscriptionRecord> {
    let clips: Vec<_> = chat
        .voice_notes()
        .enumerate()
        .filter_map(|(index, message)| {
            let filename = message.media_filename.as_deref()?;
            match extracted.media_bytes(filename) {
                Ok(audio) => Some((index, message, filename.to_string(), audio)),
                Err(e) => {
                    warn!(filename, error = %e, "voice note audio missing, skipping");
                    None
                }
            }
        })
        .collect();

    if clips.is_empty() {
        return Vec::new();
    }
    debug!(clips = clips.len(), concurrency, "transcribing voice notes");

    // Completion order is arbitrary under buffer_unordered, so each record
    // keeps its message index to make ties on timestamp deterministic
    let mut records: Vec<(usize, TranscriptionRecord)> = stream::iter(clips)
        .map(|(index, message, filename, audio)| async move {
            match transcriber.transcribe(&audio, &filename).await {
                Ok(text) => Some((
                    index,
                    TranscriptionRecord {
                        timestamp: message.timestamp(),
                        sender: message.sender().to_string(),
                        text,
                    },
                )),
                Err(e) => {
                    warn!(filename, error = %e, "transcription failed, skipping clip");
                    None
                }
            }
        })
        .buffer_unordered(concurrency.max(1))
        .filter_map(|record| async move { record })
        .collect()
        .await;

    records.sort_by_key(|(index, record)| (record.timestamp, *index));
    records.into_iter().map(|(_, record)| record).collect()
}

#[cfg(feature = "transcription")]
pub use openai::OpenAiTranscriber;

#[cfg(feature = "transcription")]
mod openai {
    use async_openai::Client;
    use async_openai::config::OpenAIConfig;
    use async_openai::types::{AudioInput, CreateTranscriptionRequestArgs};
    use async_trait::async_trait;

    use crate::error::{ChatlensError, Result};

    use super::Transcriber;

    /// Default speech-recognition model.
    pub const DEFAULT_AUDIO_MODEL: &str = "whisper-1";

    /// [`Transcriber`] backed by an OpenAI-compatible `/audio/transcriptions`
    /// endpoint.
    pub struct OpenAiTranscriber {
        client: Client<OpenAIConfig>,
        model: String,
    }

    impl OpenAiTranscriber {
        /// Creates a transcriber against the official OpenAI API.
        #[must_use]
        pub fn new(api_key: impl Into<String>) -> Self {
            let config = OpenAIConfig::new().with_api_key(api_key.into());
            Self {
                client: Client::with_config(config),
                model: DEFAULT_AUDIO_MODEL.to_string(),
            }
        }

        /// Points the transcriber at a compatible server, e.g. a local one.
        #[must_use]
        pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
            let config = OpenAIConfig::new().with_api_base(base_url.into());
            self.client = Client::with_config(config);
            self
        }

        /// Overrides the speech-recognition model.
        #[must_use]
        pub fn with_model(mut self, model: impl Into<String>) -> Self {
            self.model = model.into();
            self
        }
    }

    #[async_trait]
    impl Transcriber for OpenAiTranscriber {
        async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String> {
            let request = CreateTranscriptionRequestArgs::default()
                .file(AudioInput::from_vec_u8(
                    filename.to_string(),
                    audio.to_vec(),
                ))
                .model(&self.model)
                .build()
                .map_err(|e| ChatlensError::transcription(e.to_string()))?;

            let response = self
                .client
                .audio()
                .transcribe(request)
                .await
                .map_err(|e| ChatlensError::transcription(e.to_string()))?;

            Ok(response.text)
        }
    }
}
