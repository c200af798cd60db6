//! Volume and duration statistics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::message::ParsedChat;

/// Per-conversation volume statistics.
///
/// Media messages count toward message totals but contribute zero words, so
/// `avg_message_length` reflects typed text only in chats with attachments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    /// Total number of messages across all senders.
    pub total_messages: usize,
    /// Message count per sender, keyed by display name.
    pub messages_per_user: BTreeMap<String, usize>,
    /// Total whitespace-separated words across all messages.
    pub total_words: usize,
    /// Word count per sender.
    pub words_per_user: BTreeMap<String, usize>,
    /// Mean words per message per sender. Zero when the sender has no
    /// messages.
    pub avg_message_length_per_user: BTreeMap<String, f64>,
    /// Calendar days spanned, inclusive of partial days at either end.
    pub chat_duration_days: i64,
    /// Date of the earliest message, if any.
    pub chat_start_date: Option<NaiveDate>,
    /// Date of the latest message, if any.
    pub chat_end_date: Option<NaiveDate>,
}

/// Computes volume statistics over a parsed chat.
///
/// An empty chat yields all-zero stats with `None` dates.
#[must_use]
pub fn compute_basic_stats(chat: &ParsedChat) -> BasicStats {
    let mut messages_per_user: BTreeMap<String, usize> = BTreeMap::new();
    let mut words_per_user: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_words = 0;

    for message in chat {
        let words = message.word_count();
        total_words += words;
        *messages_per_user.entry(message.sender().to_string()).or_default() += 1;
        *words_per_user.entry(message.sender().to_string()).or_default() += words;
    }

    let avg_message_length_per_user = messages_per_user
        .iter()
        .map(|(sender, &count)| {
            let words = words_per_user.get(sender).copied().unwrap_or(0);
            let avg = if count == 0 {
                0.0
            } else {
                words as f64 / count as f64
            };
            (sender.clone(), avg)
        })
        .collect();

    // Messages are sorted by timestamp, so the span is first to last
    let chat_start_date = chat.messages.first().map(|m| m.timestamp().date_naive());
    let chat_end_date = chat.messages.last().map(|m| m.timestamp().date_naive());
    let chat_duration_days = match (chat_start_date, chat_end_date) {
        (Some(start), Some(end)) => (end - start).num_days().max(0),
        _ => 0,
    };

    BasicStats {
        total_messages: chat.len(),
        messages_per_user,
        total_words,
        words_per_user,
        avg_message_length_per_user,
        chat_duration_days,
        chat_start_date,
        chat_end_date,
    }
}
