//! End-to-end analysis pipeline.
//!
//! The [`Analyzer`] owns the full flow: extract the archive into a scoped
//! workspace, parse the chat log, run the three aggregators on blocking
//! threads, then the optional collaborators. The workspace is removed when
//! the analyzer returns, on success and on error alike.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::archive::Workspace;
use crate::config::{LinguisticConfig, ParserConfig};
use crate::error::{ChatlensError, Result};
use crate::insight::{InsightGenerator, build_summary};
use crate::message::ParsedChat;
use crate::parser::ChatParser;
use crate::stats::{
    BasicStats, LinguisticStats, TemporalStats, compute_basic_stats, compute_linguistic_stats,
    compute_temporal_stats,
};
use crate::transcribe::{
    DEFAULT_TRANSCRIPTION_CONCURRENCY, Transcriber, TranscriptionRecord, transcribe_voice_notes,
};

/// Default ceiling on the insight round-trip.
pub const DEFAULT_INSIGHT_TIMEOUT: Duration = Duration::from_secs(60);

/// The complete output of one analysis run.
///
/// `transcriptions` and `insight` are present only when the corresponding
/// collaborator was configured; `insight` is additionally `None` when the
/// backend failed or timed out, since insight failure never fails the run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub basic: BasicStats,
    pub temporal: TemporalStats,
    pub linguistic: LinguisticStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcriptions: Option<Vec<TranscriptionRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

/// Orchestrates extraction, parsing, aggregation, and collaborators.
///
/// # Example
///
/// ```rust,no_run
/// use chatlens::Analyzer;
///
/// # async fn run(archive_bytes: &[u8]) -> chatlens::Result<()> {
/// let analyzer = Analyzer::new();
/// let result = analyzer.analyze(archive_bytes).await?;
/// println!("{} messages", result.basic.total_messages);
/// # Ok(())
/// # }
/// ```
pub struct Analyzer {
    parser_config: ParserConfig,
    linguistic_config: LinguisticConfig,
    transcriber: Option<Arc<dyn Transcriber>>,
    insight_generator: Option<Arc<dyn InsightGenerator>>,
    transcription_concurrency: usize,
    insight_timeout: Duration,
}

impl Analyzer {
    /// Creates an analyzer with default configuration and no collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser_config: ParserConfig::default(),
            linguistic_config: LinguisticConfig::default(),
            transcriber: None,
            insight_generator: None,
            transcription_concurrency: DEFAULT_TRANSCRIPTION_CONCURRENCY,
            insight_timeout: DEFAULT_INSIGHT_TIMEOUT,
        }
    }

    /// Sets the parser configuration.
    #[must_use]
    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    /// Sets the linguistic-aggregator configuration.
    #[must_use]
    pub fn with_linguistic_config(mut self, config: LinguisticConfig) -> Self {
        self.linguistic_config = config;
        self
    }

    /// Enables voice-note transcription through the given backend.
    #[must_use]
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Enables narrative insight through the given backend.
    #[must_use]
    pub fn with_insight_generator(mut self, generator: Arc<dyn InsightGenerator>) -> Self {
        self.insight_generator = Some(generator);
        self
    }

    /// Bounds how many voice notes are transcribed concurrently.
    #[must_use]
    pub fn with_transcription_concurrency(mut self, concurrency: usize) -> Self {
        self.transcription_concurrency = concurrency.max(1);
        self
    }

    /// Bounds how long the insight round-trip may take.
    #[must_use]
    pub fn with_insight_timeout(mut self, timeout: Duration) -> Self {
        self.insight_timeout = timeout;
        self
    }

    /// Runs the full pipeline over the bytes of an exported chat archive.
    ///
    /// # Errors
    ///
    /// Fails on unreadable archives, archives without a chat log, and chat
    /// logs with no recognizable messages. Collaborator failures are
    /// downgraded: failed transcription clips are skipped, and a failed or
    /// timed-out insight leaves `insight` as `None`.
    pub async fn analyze(&self, archive_bytes: &[u8]) -> Result<AnalysisResult> {
        let workspace = Workspace::new()?;
        let extracted = workspace.extract(archive_bytes)?;

        let parser = ChatParser::with_config(self.parser_config.clone());
        let chat = Arc::new(parser.parse_str(&extracted.chat_text)?);
        info!(
            messages = chat.len(),
            participants = chat.participants.len(),
            "chat parsed, running aggregators"
        );

        let (basic, temporal, linguistic) = self.run_aggregators(Arc::clone(&chat)).await?;

        let transcriptions = match &self.transcriber {
            Some(transcriber) => Some(
                transcribe_voice_notes(
                    transcriber.as_ref(),
                    &chat,
                    &extracted,
                    self.transcription_concurrency,
                )
                .await,
            ),
            None => None,
        };

        let insight = match &self.insight_generator {
            Some(generator) => {
                self.run_insight(generator.as_ref(), &basic, &temporal, &linguistic)
                    .await
            }
            None => None,
        };

        // Workspace and its extracted media are removed on drop
        Ok(AnalysisResult {
            basic,
            temporal,
            linguistic,
            transcriptions,
            insight,
        })
    }

    /// Runs the three pure aggregators on blocking threads and joins them.
    async fn run_aggregators(
        &self,
        chat: Arc<ParsedChat>,
    ) -> Result<(BasicStats, TemporalStats, LinguisticStats)> {
        let basic_chat = Arc::clone(&chat);
        let temporal_chat = Arc::clone(&chat);
        let linguistic_config = self.linguistic_config.clone();

        let basic = tokio::task::spawn_blocking(move || compute_basic_stats(&basic_chat));
        let temporal = tokio::task::spawn_blocking(move || compute_temporal_stats(&temporal_chat));
        let linguistic = tokio::task::spawn_blocking(move || {
            compute_linguistic_stats(&chat, &linguistic_config)
        });

        let (basic, temporal, linguistic) = tokio::try_join!(basic, temporal, linguistic)
            .map_err(|e| ChatlensError::Io(std::io::Error::other(e)))?;
        Ok((basic, temporal, linguistic))
    }

    /// Runs the insight collaborator under the configured timeout.
    ///
    /// Never fails the pipeline; errors and timeouts log and return `None`.
    async fn run_insight(
        &self,
        generator: &dyn InsightGenerator,
        basic: &BasicStats,
        temporal: &TemporalStats,
        linguistic: &LinguisticStats,
    ) -> Option<String> {
        let summary = match build_summary(basic, temporal, linguistic) {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "could not serialize stats summary, skipping insight");
                return None;
            }
        };

        match tokio::time::timeout(self.insight_timeout, generator.generate(&summary)).await {
            Ok(Ok(insight)) => Some(insight),
            Ok(Err(e)) => {
                warn!(error = %e, "insight generation failed, continuing without it");
                None
            }
            Err(_) => {
                warn!(timeout = ?self.insight_timeout, "insight generation timed out");
                None
            }
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
