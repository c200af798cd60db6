//! Chat-log parser.
//!
//! WhatsApp exports vary by locale. This parser auto-detects the line shape
//! by scoring candidate header patterns, and the date-order convention by
//! checking which one parses consistently across the whole log.
//!
//! Supported line shapes:
//! - Bracketed: `[1/15/24, 10:30:45 AM] Sender: Message`
//! - Hyphenated: `15/01/2024, 10:30 - Sender: Message`
//!
//! A physical line that matches no header shape is a continuation of the
//! previous message and is appended with a line break. Header-shaped lines
//! without a `Sender:` segment (encryption banner, participant changes) are
//! system notices and are dropped entirely.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::ParserConfig;
use crate::error::{ChatlensError, Result};
use crate::message::{Message, ParsedChat};

/// Parser for WhatsApp-style TXT chat logs.
///
/// # Example
///
/// ```rust
/// use chatlens::parser::ChatParser;
///
/// let parser = ChatParser::new();
/// let chat = parser.parse_str("1/5/23, 10:00 AM - Alice: Hi there")?;
/// assert_eq!(chat.len(), 1);
/// # Ok::<(), chatlens::ChatlensError>(())
/// ```
pub struct ChatParser {
    config: ParserConfig,
}

/// Detected line-shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineShape {
    /// `[1/15/24, 10:30:45 AM] Sender: Message`
    Bracketed,
    /// `15/01/2024, 10:30 - Sender: Message`
    Hyphenated,
}

impl LineShape {
    /// Returns the header regex pattern for this shape.
    ///
    /// Captures: 1 date, 2 time, 3 sender, 4 message start.
    fn header_pattern(self) -> &'static str {
        match self {
            LineShape::Bracketed => {
                r"^\[(\d{1,2}[/.]\d{1,2}[/.]\d{2,4}),?\s+(\d{1,2}:\d{2}(?::\d{2})?(?:\s?[APap][Mm])?)\]\s+([^:]+):\s?(.*)$"
            }
            LineShape::Hyphenated => {
                r"^(\d{1,2}[/.]\d{1,2}[/.]\d{2,4}),?\s+(\d{1,2}:\d{2}(?::\d{2})?(?:\s?[APap][Mm])?)\s+-\s+([^:]+):\s?(.*)$"
            }
        }
    }

    /// Returns the pattern for a timestamped line with no `Sender:` segment.
    ///
    /// Only tried after the header pattern fails, so a match means a system
    /// notice.
    fn notice_pattern(self) -> &'static str {
        match self {
            LineShape::Bracketed => {
                r"^\[(\d{1,2}[/.]\d{1,2}[/.]\d{2,4}),?\s+(\d{1,2}:\d{2}(?::\d{2})?(?:\s?[APap][Mm])?)\]\s?(.*)$"
            }
            LineShape::Hyphenated => {
                r"^(\d{1,2}[/.]\d{1,2}[/.]\d{2,4}),?\s+(\d{1,2}:\d{2}(?::\d{2})?(?:\s?[APap][Mm])?)\s+-\s?(.*)$"
            }
        }
    }
}

/// Date-order conventions the export may use.
///
/// The convention is picked once for the whole log and never switched
/// mid-file. Fully ambiguous logs (every date valid both ways, e.g.
/// `01/02/23`) resolve to month-first; the export format carries nothing
/// that could disambiguate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateConvention {
    /// `M/D/Y` ordering (US exports).
    MonthFirst,
    /// `D/M/Y` ordering (most other locales).
    DayFirst,
}

impl DateConvention {
    fn formats(self) -> &'static [&'static str] {
        match self {
            DateConvention::MonthFirst => &[
                "%m/%d/%y, %I:%M %p",
                "%m/%d/%y, %I:%M:%S %p",
                "%m/%d/%Y, %I:%M %p",
                "%m/%d/%Y, %I:%M:%S %p",
                "%m/%d/%y, %H:%M",
                "%m/%d/%y, %H:%M:%S",
                "%m/%d/%Y, %H:%M",
                "%m/%d/%Y, %H:%M:%S",
            ],
            DateConvention::DayFirst => &[
                "%d/%m/%y, %I:%M %p",
                "%d/%m/%y, %I:%M:%S %p",
                "%d/%m/%Y, %I:%M %p",
                "%d/%m/%Y, %I:%M:%S %p",
                "%d/%m/%y, %H:%M",
                "%d/%m/%y, %H:%M:%S",
                "%d/%m/%Y, %H:%M",
                "%d/%m/%Y, %H:%M:%S",
            ],
        }
    }
}

/// English phrases that mark a header-shaped line as a chat-level event.
///
/// iOS exports prefix the encryption banner with the chat name as if it were
/// a sender, so notices must also be recognized on lines that match the full
/// header shape.
const SYSTEM_NOTICE_INDICATORS: &[&str] = &[
    "messages and calls are end-to-end encrypted",
    "created group",
    "created this group",
    "added you",
    "you added",
    "changed the subject",
    "changed this group's icon",
    "changed the group description",
    "changed their phone number",
    "joined using this group's invite link",
    "your security code with",
    "security code changed",
    "turned on disappearing messages",
    "turned off disappearing messages",
    "you blocked this contact",
    "you unblocked this contact",
];

/// Media placeholder for attachments stripped from the export.
const MEDIA_OMITTED: &str = "<Media omitted>";

/// Marker following a retained attachment's filename.
const FILE_ATTACHED: &str = "(file attached)";

/// Check if a header-shaped line is a system notice rather than a message.
///
/// Notices with a colon in them ("changed the subject to: trip") split
/// across the sender and content captures, so both are scanned.
fn is_system_notice(sender: &str, content: &str) -> bool {
    if sender.trim().is_empty() {
        return true;
    }
    let sender_lower = sender.to_lowercase();
    let content_lower = content.to_lowercase();
    SYSTEM_NOTICE_INDICATORS
        .iter()
        .any(|indicator| sender_lower.contains(indicator) || content_lower.contains(indicator))
}

/// Normalizes invisible Unicode spacing characters that appear in exports.
fn normalize_line(line: &str) -> String {
    line.replace('\u{202f}', " ") // narrow no-break space
        .replace('\u{200e}', "") // left-to-right mark
        .replace('\u{2028}', " ") // line separator
}

/// Auto-detect the line shape by scoring header matches.
fn detect_shape(lines: &[String], sample: usize) -> Option<LineShape> {
    let shapes = [LineShape::Bracketed, LineShape::Hyphenated];
    let regexes: Vec<Regex> = shapes
        .iter()
        .map(|s| Regex::new(s.header_pattern()).unwrap())
        .collect();

    let score = |window: &[String]| -> [usize; 2] {
        let mut scores = [0usize; 2];
        for line in window {
            for (i, regex) in regexes.iter().enumerate() {
                if regex.is_match(line) {
                    scores[i] += 1;
                }
            }
        }
        scores
    };

    let sample_len = sample.min(lines.len());
    let mut scores = score(&lines[..sample_len]);
    if scores.iter().all(|&s| s == 0) {
        // Headers may start later than the sampled prefix
        scores = score(lines);
    }

    let max_score = *scores.iter().max()?;
    if max_score == 0 {
        return None;
    }
    let winner = scores.iter().position(|&s| s == max_score)?;
    Some(shapes[winner])
}

/// Check if any line matches either shape's senderless-notice pattern.
fn matches_any_notice(lines: &[String]) -> bool {
    [LineShape::Bracketed, LineShape::Hyphenated]
        .iter()
        .map(|s| Regex::new(s.notice_pattern()).unwrap())
        .any(|regex| lines.iter().any(|line| regex.is_match(line)))
}

/// Parse a date/time pair under the given convention.
fn parse_timestamp(
    date_str: &str,
    time_str: &str,
    convention: DateConvention,
) -> Option<DateTime<Utc>> {
    let datetime_str = format!(
        "{}, {}",
        normalize_date(date_str),
        normalize_time(time_str)
    );
    for format in convention.formats() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&datetime_str, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Unifies the date separator so one format set covers `/` and `.` exports.
fn normalize_date(date_str: &str) -> String {
    date_str.replace('.', "/")
}

/// Uppercases the meridiem and guarantees a single space before it.
fn normalize_time(time_str: &str) -> String {
    let upper = time_str.trim().to_uppercase();
    for meridiem in ["AM", "PM"] {
        if let Some(head) = upper.strip_suffix(meridiem) {
            return format!("{} {}", head.trim_end(), meridiem);
        }
    }
    upper
}

/// Pick the convention that parses consistently across every header date.
fn detect_convention(header_times: &[(String, String)]) -> Option<DateConvention> {
    if header_times.is_empty() {
        return None;
    }

    let count = |convention: DateConvention| {
        header_times
            .iter()
            .filter(|(date, time)| parse_timestamp(date, time, convention).is_some())
            .count()
    };

    let month_first = count(DateConvention::MonthFirst);
    let day_first = count(DateConvention::DayFirst);

    if month_first == 0 && day_first == 0 {
        return None;
    }
    // Month-first wins ties: ambiguous dates cannot be distinguished
    if month_first >= day_first {
        Some(DateConvention::MonthFirst)
    } else {
        Some(DateConvention::DayFirst)
    }
}

/// A message being accumulated during the forward scan.
///
/// Emitted when the next header is recognized or input ends.
struct PendingMessage {
    timestamp: DateTime<Utc>,
    sender: String,
    body: String,
    media_filename: Option<String>,
    is_media: bool,
}

impl PendingMessage {
    fn push_continuation(&mut self, line: &str) {
        self.body.push('\n');
        self.body.push_str(line);
    }

    /// Finalizes into a message, dropping empty non-media records.
    fn finish(self) -> Option<Message> {
        if self.is_media {
            return Some(Message::media(
                self.timestamp,
                self.sender,
                self.media_filename,
            ));
        }
        let body = self.body.trim().to_string();
        if body.is_empty() {
            return None;
        }
        Some(Message::text(self.timestamp, self.sender, body))
    }
}

impl ChatParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses chat-log text into an ordered message sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::Parse`] only when the input has content but
    /// zero lines match any header or notice shape, or when no date-order
    /// convention parses the headers. Individual malformed lines are
    /// recovered as continuations of the previous message.
    pub fn parse_str(&self, content: &str) -> Result<ParsedChat> {
        let lines: Vec<String> = content.lines().map(normalize_line).collect();
        let nonblank = lines.iter().filter(|l| !l.trim().is_empty()).count();

        if nonblank == 0 {
            return Ok(ParsedChat::default());
        }

        let Some(shape) = detect_shape(&lines, self.config.detection_sample) else {
            // No headers anywhere. A log of nothing but senderless system
            // notices is a valid, empty chat; anything else is not a chat
            // export at all.
            if matches_any_notice(&lines) {
                return Ok(ParsedChat::default());
            }
            return Err(ChatlensError::parse(
                "no message headers recognized; the file does not look like a chat export",
            ));
        };
        debug!(?shape, "detected chat-log line shape");

        let header_re = Regex::new(shape.header_pattern())
            .map_err(|e| ChatlensError::parse(e.to_string()))?;
        let notice_re = Regex::new(shape.notice_pattern())
            .map_err(|e| ChatlensError::parse(e.to_string()))?;

        // First pass: gather header date/time pairs to fix the convention
        let header_times: Vec<(String, String)> = lines
            .iter()
            .filter_map(|line| header_re.captures(line))
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect();

        // Shape detection succeeded, so at least one header exists
        let Some(convention) = detect_convention(&header_times) else {
            return Err(ChatlensError::parse(
                "could not determine a consistent timestamp convention",
            ));
        };
        debug!(?convention, headers = header_times.len(), "detected date convention");

        // Second pass: single forward scan with an explicit accumulator
        let mut messages: Vec<Message> = Vec::new();
        let mut pending: Option<PendingMessage> = None;
        let mut dropped_notices = 0usize;

        for line in &lines {
            if line.trim().is_empty() && pending.is_none() {
                continue;
            }

            if let Some(caps) = header_re.captures(line) {
                let sender = caps[3].trim().to_string();
                let body_start = caps.get(4).map_or("", |m| m.as_str());

                if self.config.skip_system_notices && is_system_notice(&sender, body_start) {
                    if let Some(done) = pending.take().and_then(PendingMessage::finish) {
                        messages.push(done);
                    }
                    dropped_notices += 1;
                    continue;
                }

                let Some(timestamp) = parse_timestamp(&caps[1], &caps[2], convention) else {
                    // Recover a header with an unparseable timestamp as a
                    // continuation rather than aborting
                    warn!(line = %line.trim(), "header timestamp did not parse, treating as continuation");
                    if let Some(ref mut msg) = pending {
                        msg.push_continuation(line);
                    }
                    continue;
                };

                if let Some(done) = pending.take().and_then(PendingMessage::finish) {
                    messages.push(done);
                }

                pending = Some(classify_header(timestamp, sender, body_start));
            } else if notice_re.is_match(line) {
                // Timestamped line without a sender segment
                if let Some(done) = pending.take().and_then(PendingMessage::finish) {
                    messages.push(done);
                }
                dropped_notices += 1;
            } else if let Some(ref mut msg) = pending {
                msg.push_continuation(line);
            }
            // Orphan leading lines with no prior message are skipped
        }

        if let Some(done) = pending.take().and_then(PendingMessage::finish) {
            messages.push(done);
        }

        // Headerless input was already rejected at shape detection, so an
        // empty result here is a genuinely empty chat (notices only, or
        // every message dropped as empty).

        // The export is chronological, but stable-sort anyway so malformed
        // reorderings cannot break the non-decreasing invariant downstream.
        // Equal timestamps keep parse order.
        messages.sort_by_key(Message::timestamp);

        info!(
            messages = messages.len(),
            dropped_notices, "parsed chat log"
        );

        Ok(ParsedChat::new(messages))
    }
}

impl Default for ChatParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the accumulator for a fresh header line, classifying media
/// placeholders.
fn classify_header(timestamp: DateTime<Utc>, sender: String, body_start: &str) -> PendingMessage {
    let trimmed = body_start.trim();

    if trimmed.contains(MEDIA_OMITTED) {
        return PendingMessage {
            timestamp,
            sender,
            body: String::new(),
            media_filename: None,
            is_media: true,
        };
    }

    if let Some(idx) = trimmed.find(FILE_ATTACHED) {
        let filename = trimmed[..idx].trim();
        return PendingMessage {
            timestamp,
            sender,
            body: String::new(),
            media_filename: (!filename.is_empty()).then(|| filename.to_string()),
            is_media: true,
        };
    }

    PendingMessage {
        timestamp,
        sender,
        body: trimmed.to_string(),
        media_filename: None,
        is_media: false,
    }
}
