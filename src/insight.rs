//! LLM-generated conversation insights.
//!
//! The insight step never sees message bodies. It receives only the
//! aggregate statistics, serialized as JSON, so the text shipped to the
//! model carries no conversation content beyond sender display names.
//! The bundled generator targets OpenAI-compatible chat endpoints and is
//! gated behind the `insights` feature.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::stats::{BasicStats, LinguisticStats, TemporalStats};

/// A narrative-insight backend.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Produces a free-form narrative from a statistics summary.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails. The pipeline treats insight
    /// failure as non-fatal and omits the narrative.
    async fn generate(&self, summary: &str) -> Result<String>;
}

/// The aggregate view handed to the model.
#[derive(Serialize)]
struct StatsSummary<'a> {
    basic: &'a BasicStats,
    temporal: &'a TemporalStats,
    linguistic: &'a LinguisticStats,
}

/// Serializes the aggregate statistics for the insight prompt.
///
/// # Errors
///
/// Returns [`crate::ChatlensError::Json`] if serialization fails.
pub fn build_summary(
    basic: &BasicStats,
    temporal: &TemporalStats,
    linguistic: &LinguisticStats,
) -> Result<String> {
    let summary = StatsSummary {
        basic,
        temporal,
        linguistic,
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Builds the chat prompt around a statistics summary.
#[must_use]
pub fn build_prompt(summary: &str) -> String {
    format!(
        "You are analyzing aggregate statistics from a two-person chat \
         conversation. You are given message volumes, activity patterns over \
         time, and the most frequent words per participant. You never see \
         the messages themselves.\n\n\
         Statistics:\n{summary}\n\n\
         Write a short, friendly narrative (3-5 paragraphs) describing the \
         relationship dynamics these numbers suggest: who talks more, when \
         the conversation is most alive, what themes the frequent words hint \
         at, and how the rhythm of the chat has evolved. Be concrete about \
         the numbers but do not invent details the statistics cannot \
         support."
    )
}

#[cfg(feature = "insights")]
pub use openai::{InsightProvider, OpenAiInsightGenerator};

#[cfg(feature = "insights")]
mod openai {
    use async_openai::Client;
    use async_openai::config::OpenAIConfig;
    use async_openai::types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    };
    use async_trait::async_trait;

    use crate::error::{ChatlensError, Result};

    use super::{InsightGenerator, build_prompt};

    /// Known OpenAI-compatible insight backends.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum InsightProvider {
        /// The official OpenAI API.
        OpenAi,
        /// A local Ollama server via its OpenAI-compatible endpoint.
        Ollama,
    }

    impl InsightProvider {
        fn default_model(self) -> &'static str {
            match self {
                InsightProvider::OpenAi => "gpt-3.5-turbo",
                InsightProvider::Ollama => "llama3",
            }
        }
    }

    /// [`InsightGenerator`] backed by an OpenAI-compatible chat endpoint.
    pub struct OpenAiInsightGenerator {
        client: Client<OpenAIConfig>,
        model: String,
    }

    impl OpenAiInsightGenerator {
        /// Creates a generator against the official OpenAI API.
        #[must_use]
        pub fn new(api_key: impl Into<String>) -> Self {
            let config = OpenAIConfig::new().with_api_key(api_key.into());
            Self {
                client: Client::with_config(config),
                model: InsightProvider::OpenAi.default_model().to_string(),
            }
        }

        /// Creates a generator against a local Ollama server.
        ///
        /// `base_url` should point at the OpenAI-compatible root, e.g.
        /// `http://localhost:11434/v1`.
        #[must_use]
        pub fn ollama(base_url: impl Into<String>) -> Self {
            let config = OpenAIConfig::new().with_api_base(base_url.into());
            Self {
                client: Client::with_config(config),
                model: InsightProvider::Ollama.default_model().to_string(),
            }
        }

        /// Overrides the chat model.
        #[must_use]
        pub fn with_model(mut self, model: impl Into<String>) -> Self {
            self.model = model.into();
            self
        }
    }

    #[async_trait]
    impl InsightGenerator for OpenAiInsightGenerator {
        async fn generate(&self, summary: &str) -> Result<String> {
            let system = ChatCompletionRequestSystemMessageArgs::default()
                .content("You are a warm, observant analyst of conversation statistics.")
                .build()
                .map_err(|e| ChatlensError::insight(e.to_string()))?;
            let user = ChatCompletionRequestUserMessageArgs::default()
                .content(build_prompt(summary))
                .build()
                .map_err(|e| ChatlensError::insight(e.to_string()))?;

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages([system.into(), user.into()])
                .build()
                .map_err(|e| ChatlensError::insight(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| ChatlensError::insight(e.to_string()))?;

            response
                .choices
                .first()
                .and_then(|choice| choice.message.content.clone())
                .ok_or_else(|| ChatlensError::insight("model returned no content"))
        }
    }
}
