//! Message and chat types produced by the parser.
//!
//! This module provides [`Message`], the typed record one chat-log line (plus
//! its continuation lines) parses into, and [`ParsedChat`], the ordered
//! sequence of messages with the resolved participant set.
//!
//! # Examples
//!
//! ```
//! use chatlens::{Message, MessageKind};
//! use chrono::Utc;
//!
//! let msg = Message::text(Utc::now(), "Alice", "Hello, world!");
//! assert_eq!(msg.sender(), "Alice");
//! assert_eq!(msg.word_count(), 2);
//! assert!(!msg.is_media());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a message record denotes: authored text or an attachment reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Authored text.
    Text,
    /// An attachment reference (image, video, document, ...).
    Media,
    /// An audio attachment eligible for transcription.
    VoiceNote,
}

/// File extensions that mark an attachment as a voice note.
pub const VOICE_NOTE_EXTENSIONS: &[&str] = &["opus", "ogg", "mp3", "m4a"];

impl MessageKind {
    /// Classifies a recovered attachment filename by extension.
    pub fn from_media_filename(filename: &str) -> Self {
        let is_voice = filename
            .rsplit_once('.')
            .is_some_and(|(_, ext)| {
                VOICE_NOTE_EXTENSIONS
                    .iter()
                    .any(|v| ext.eq_ignore_ascii_case(v))
            });
        if is_voice {
            MessageKind::VoiceNote
        } else {
            MessageKind::Media
        }
    }
}

/// A single parsed chat message.
///
/// Immutable value record once constructed. The timestamp is the export's
/// local time interpreted as UTC; the export convention carries no zone
/// information, so none is tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,

    /// Participant display name, exactly as exported (trimmed).
    pub sender: String,

    /// Message text. May contain newlines for multiline messages; empty for
    /// media messages.
    pub body: String,

    /// Whether this record is text, media, or a voice note.
    pub kind: MessageKind,

    /// Attachment filename, when one was recovered from the placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub media_filename: Option<String>,
}

impl Message {
    /// Creates a text message.
    pub fn text(
        timestamp: DateTime<Utc>,
        sender: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            sender: sender.into(),
            body: body.into(),
            kind: MessageKind::Text,
            media_filename: None,
        }
    }

    /// Creates a media message, classifying voice notes by extension when a
    /// filename was recovered.
    pub fn media(
        timestamp: DateTime<Utc>,
        sender: impl Into<String>,
        media_filename: Option<String>,
    ) -> Self {
        let kind = media_filename
            .as_deref()
            .map_or(MessageKind::Media, MessageKind::from_media_filename);
        Self {
            timestamp,
            sender: sender.into(),
            body: String::new(),
            kind,
            media_filename,
        }
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns `true` if this record denotes an attachment rather than
    /// authored text.
    pub fn is_media(&self) -> bool {
        matches!(self.kind, MessageKind::Media | MessageKind::VoiceNote)
    }

    /// Returns `true` if this record is a voice note.
    pub fn is_voice_note(&self) -> bool {
        self.kind == MessageKind::VoiceNote
    }

    /// Number of whitespace-separated words in the body.
    ///
    /// Media messages contribute zero words.
    pub fn word_count(&self) -> usize {
        if self.is_media() {
            return 0;
        }
        self.body.split_whitespace().count()
    }
}

/// The full ordered message sequence plus resolved participant set.
///
/// Owned exclusively by the pipeline run that produced it; never mutated
/// after parsing completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedChat {
    /// Messages in chronological order (equal timestamps keep parse order).
    pub messages: Vec<Message>,

    /// Participant display names in first-seen order.
    pub participants: Vec<String>,
}

impl ParsedChat {
    /// Builds a chat from an already-ordered message sequence, resolving the
    /// participant set in first-seen order.
    pub fn new(messages: Vec<Message>) -> Self {
        let mut participants: Vec<String> = Vec::new();
        for msg in &messages {
            if !participants.iter().any(|p| p == &msg.sender) {
                participants.push(msg.sender.clone());
            }
        }
        Self {
            messages,
            participants,
        }
    }

    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the chat contains no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates over the messages in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Iterates over voice-note messages that carry a recovered filename.
    pub fn voice_notes(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|m| m.is_voice_note() && m.media_filename.is_some())
    }
}

impl<'a> IntoIterator for &'a ParsedChat {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
