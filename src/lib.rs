//! # chatlens
//!
//! Analyze exported two-person chat conversations.
//!
//! `chatlens` takes the ZIP archive a messaging app produces when you export
//! a chat, parses the log inside it, and computes statistics about the
//! conversation: message and word volumes per participant, activity patterns
//! over days, hours, and weekdays, and the most frequent words. Voice notes
//! bundled in the archive can optionally be transcribed, and an
//! LLM-generated narrative can be layered on top of the numbers.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use chatlens::Analyzer;
//!
//! # async fn run() -> chatlens::Result<()> {
//! let bytes = std::fs::read("chat-export.zip")?;
//! let result = Analyzer::new().analyze(&bytes).await?;
//!
//! println!("{} messages over {} days",
//!     result.basic.total_messages,
//!     result.basic.chat_duration_days);
//! for (sender, count) in &result.basic.messages_per_user {
//!     println!("  {sender}: {count}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Collaborators
//!
//! Transcription and insight are traits ([`Transcriber`],
//! [`InsightGenerator`]) with OpenAI-compatible implementations behind the
//! `transcription` and `insights` features. Both are optional and their
//! failures never fail an analysis run.
//!
//! ## Feature flags
//!
//! - `full` (default): everything below.
//! - `transcription`: the [`OpenAiTranscriber`](transcribe::OpenAiTranscriber) backend.
//! - `insights`: the [`OpenAiInsightGenerator`](insight::OpenAiInsightGenerator) backend.
//! - `cli`: the `chatlens` command-line binary.

pub mod analyze;
pub mod archive;
pub mod config;
pub mod error;
pub mod insight;
pub mod message;
pub mod parser;
pub mod stats;
pub mod transcribe;

pub use analyze::{AnalysisResult, Analyzer};
pub use config::{LinguisticConfig, ParserConfig, Stopwords};
pub use error::{ChatlensError, Result};
pub use insight::InsightGenerator;
pub use message::{Message, MessageKind, ParsedChat};
pub use parser::ChatParser;
pub use stats::{BasicStats, LinguisticStats, TemporalStats};
pub use transcribe::{TranscriptionRecord, Transcriber};
