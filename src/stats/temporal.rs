//! Activity-over-time statistics.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::message::ParsedChat;

/// Weekday names indexed Monday-first, matching the dense count layout.
const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Message count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Activity distribution over days, hours, and weekdays.
///
/// Every message lands in exactly one bucket per dimension, so each
/// distribution sums to the total message count. Ties on "most active" go to
/// the earliest date, lowest hour, and Monday-first weekday respectively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalStats {
    /// Calendar day with the most messages.
    pub most_active_date: Option<NaiveDate>,
    /// Hour of day (0-23) with the most messages.
    pub most_active_hour: Option<u32>,
    /// Weekday name with the most messages.
    pub most_active_weekday: Option<String>,
    /// Per-day counts in ascending date order. Days without messages are
    /// absent.
    pub daily_counts: Vec<DailyCount>,
    /// Dense 24-slot distribution by hour of day.
    pub hourly_counts: Vec<usize>,
    /// Dense 7-slot distribution, Monday first.
    pub weekday_counts: Vec<usize>,
}

/// Computes activity distributions over a parsed chat.
#[must_use]
pub fn compute_temporal_stats(chat: &ParsedChat) -> TemporalStats {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut hourly_counts = vec![0usize; 24];
    let mut weekday_counts = vec![0usize; 7];

    for message in chat {
        let timestamp = message.timestamp();
        *by_date.entry(timestamp.date_naive()).or_default() += 1;
        hourly_counts[timestamp.hour() as usize] += 1;
        weekday_counts[timestamp.weekday().num_days_from_monday() as usize] += 1;
    }

    // Strictly-greater comparisons so ties keep the first bucket scanned
    let mut most_active_date = None;
    let mut best = 0usize;
    for (&date, &count) in &by_date {
        if count > best {
            best = count;
            most_active_date = Some(date);
        }
    }

    let most_active_hour = peak_slot(&hourly_counts).map(|h| h as u32);
    let most_active_weekday = peak_slot(&weekday_counts).map(|d| WEEKDAY_NAMES[d].to_string());

    let daily_counts = by_date
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();

    TemporalStats {
        most_active_date,
        most_active_hour,
        most_active_weekday,
        daily_counts,
        hourly_counts,
        weekday_counts,
    }
}

/// Index of the first slot holding the maximum nonzero count.
fn peak_slot(counts: &[usize]) -> Option<usize> {
    let mut peak = None;
    let mut best = 0usize;
    for (slot, &count) in counts.iter().enumerate() {
        if count > best {
            best = count;
            peak = Some(slot);
        }
    }
    peak
}

/// Returns the Monday-first display name for a weekday.
#[must_use]
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use chrono::NaiveDateTime;

    fn at(datetime: &str) -> chrono::DateTime<chrono::Utc> {
        NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M")
            .unwrap()
            .and_utc()
    }

    fn chat_of(times: &[&str]) -> ParsedChat {
        ParsedChat::new(
            times
                .iter()
                .map(|t| Message::text(at(t), "Alice", "hi"))
                .collect(),
        )
    }

    #[test]
    fn test_empty_chat() {
        let stats = compute_temporal_stats(&ParsedChat::default());
        assert!(stats.most_active_date.is_none());
        assert!(stats.most_active_hour.is_none());
        assert!(stats.most_active_weekday.is_none());
        assert!(stats.daily_counts.is_empty());
        assert_eq!(stats.hourly_counts, vec![0; 24]);
        assert_eq!(stats.weekday_counts, vec![0; 7]);
    }

    #[test]
    fn test_buckets_sum_to_total() {
        let chat = chat_of(&[
            "2023-01-05 10:00",
            "2023-01-05 22:30",
            "2023-01-06 10:15",
            "2023-01-08 03:00",
        ]);
        let stats = compute_temporal_stats(&chat);
        assert_eq!(stats.daily_counts.iter().map(|d| d.count).sum::<usize>(), 4);
        assert_eq!(stats.hourly_counts.iter().sum::<usize>(), 4);
        assert_eq!(stats.weekday_counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_most_active_date() {
        let chat = chat_of(&["2023-01-05 10:00", "2023-01-06 10:00", "2023-01-06 11:00"]);
        let stats = compute_temporal_stats(&chat);
        assert_eq!(
            stats.most_active_date,
            Some(NaiveDate::from_ymd_opt(2023, 1, 6).unwrap())
        );
    }

    #[test]
    fn test_most_active_hour() {
        let chat = chat_of(&["2023-01-05 10:00", "2023-01-06 22:00", "2023-01-07 22:30"]);
        let stats = compute_temporal_stats(&chat);
        assert_eq!(stats.most_active_hour, Some(22));
        assert_eq!(stats.hourly_counts[22], 2);
        assert_eq!(stats.hourly_counts[10], 1);
    }

    #[test]
    fn test_most_active_weekday() {
        // 2023-01-05 is a Thursday, 2023-01-07 a Saturday
        let chat = chat_of(&["2023-01-05 10:00", "2023-01-07 10:00", "2023-01-07 11:00"]);
        let stats = compute_temporal_stats(&chat);
        assert_eq!(stats.most_active_weekday.as_deref(), Some("Saturday"));
        assert_eq!(stats.weekday_counts[5], 2);
        assert_eq!(stats.weekday_counts[3], 1);
    }

    #[test]
    fn test_ties_keep_first_bucket() {
        let chat = chat_of(&["2023-01-05 09:00", "2023-01-06 14:00"]);
        let stats = compute_temporal_stats(&chat);
        // earliest date, lowest hour, earliest-in-week day win ties
        assert_eq!(
            stats.most_active_date,
            Some(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap())
        );
        assert_eq!(stats.most_active_hour, Some(9));
        assert_eq!(stats.most_active_weekday.as_deref(), Some("Thursday"));
    }

    #[test]
    fn test_daily_counts_ascending() {
        let chat = chat_of(&["2023-01-08 10:00", "2023-01-05 10:00", "2023-01-06 10:00"]);
        let stats = compute_temporal_stats(&chat);
        let dates: Vec<NaiveDate> = stats.daily_counts.iter().map(|d| d.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_unstable();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
    }
}
