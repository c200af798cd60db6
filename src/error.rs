//! Unified error types for chatlens.
//!
//! This module provides a single [`ChatlensError`] enum that covers all error
//! cases in the library.
//!
//! # Error Handling Philosophy
//!
//! Only two failure classes abort an analysis request: the archive could not
//! be extracted, or the chat log yielded zero parseable messages. Everything
//! else (a malformed line, a failed transcription of one clip, an insight
//! call timing out) is recovered locally and logged, never surfaced here.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for chatlens operations.
///
/// # Example
///
/// ```rust
/// use chatlens::error::Result;
/// use chatlens::ParsedChat;
///
/// fn my_function() -> Result<ParsedChat> {
///     // ... operations that may fail
///     Ok(ParsedChat::default())
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlensError>;

/// The error type for all chatlens operations.
///
/// Each variant contains context about what went wrong and, where applicable,
/// the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlensError {
    /// An I/O error occurred.
    ///
    /// This typically happens when reading extracted media back from the
    /// workspace, or when the workspace directory cannot be created.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The uploaded archive is corrupt or not a ZIP file.
    ///
    /// Fatal: the request is aborted.
    #[error("Archive extraction failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The archive was readable but unusable.
    ///
    /// This occurs when:
    /// - No `.txt` chat-log entry was found in the archive
    /// - An entry carries an unsafe path and nothing else is usable
    #[error("Archive extraction failed: {message}")]
    Extraction {
        /// Description of what's wrong
        message: String,
    },

    /// The chat log yielded zero parseable messages.
    ///
    /// A log with some malformed lines recovers by treating them as
    /// continuations. This error is returned only when no line in the whole
    /// input matches a known header shape.
    #[error("Failed to parse chat log: {message}")]
    Parse {
        /// Description of what's wrong
        message: String,
    },

    /// JSON serialization error.
    ///
    /// Can occur when building the insight summary or serializing results.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A transcription collaborator call failed.
    ///
    /// Per-clip failures are recovered by the orchestrator; this variant
    /// surfaces only from direct collaborator usage.
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// An insight collaborator call failed or timed out.
    ///
    /// The orchestrator recovers by omitting the insight field; this variant
    /// surfaces only from direct collaborator usage.
    #[error("Insight generation error: {0}")]
    Insight(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatlensError {
    /// Creates an extraction error.
    pub fn extraction(message: impl Into<String>) -> Self {
        ChatlensError::Extraction {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        ChatlensError::Parse {
            message: message.into(),
        }
    }

    /// Creates a transcription error.
    pub fn transcription(message: impl Into<String>) -> Self {
        ChatlensError::Transcription(message.into())
    }

    /// Creates an insight error.
    pub fn insight(message: impl Into<String>) -> Self {
        ChatlensError::Insight(message.into())
    }

    /// Returns `true` if this error aborts extraction (corrupt archive or no
    /// chat-log entry).
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            ChatlensError::Extraction { .. } | ChatlensError::Zip(_)
        )
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatlensError::Parse { .. })
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlensError::Io(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
