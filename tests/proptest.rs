//! Property-based tests over generated chat logs.

use proptest::prelude::*;

use chatlens::config::LinguisticConfig;
use chatlens::stats::{compute_basic_stats, compute_linguistic_stats, compute_temporal_stats};
use chatlens::{ChatParser, Stopwords};

fn sender() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("Alice"), Just("Bob")]
}

fn body() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{1,8}){0,5}"
}

/// A synthetic hyphen-format log line per generated message.
fn chat_log() -> impl Strategy<Value = String> {
    prop::collection::vec((sender(), body(), 0u32..24, 0u32..60), 1..40).prop_map(|messages| {
        messages
            .into_iter()
            .map(|(sender, body, hour, minute)| {
                format!("1/5/23, {hour:02}:{minute:02} - {sender}: {body}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

proptest! {
    #[test]
    fn parsing_is_deterministic(log in chat_log()) {
        let parser = ChatParser::new();
        let a = parser.parse_str(&log).unwrap();
        let b = parser.parse_str(&log).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn timestamps_are_non_decreasing(log in chat_log()) {
        let chat = ChatParser::new().parse_str(&log).unwrap();
        for pair in chat.messages.windows(2) {
            prop_assert!(pair[0].timestamp() <= pair[1].timestamp());
        }
    }

    #[test]
    fn every_message_attributed_to_a_participant(log in chat_log()) {
        let chat = ChatParser::new().parse_str(&log).unwrap();
        for message in &chat {
            prop_assert!(chat.participants.iter().any(|p| p == message.sender()));
        }
    }

    #[test]
    fn per_user_counts_sum_to_total(log in chat_log()) {
        let chat = ChatParser::new().parse_str(&log).unwrap();
        let stats = compute_basic_stats(&chat);
        prop_assert_eq!(
            stats.messages_per_user.values().sum::<usize>(),
            stats.total_messages
        );
        prop_assert_eq!(stats.words_per_user.values().sum::<usize>(), stats.total_words);
    }

    #[test]
    fn temporal_buckets_sum_to_total(log in chat_log()) {
        let chat = ChatParser::new().parse_str(&log).unwrap();
        let stats = compute_temporal_stats(&chat);
        prop_assert_eq!(stats.hourly_counts.iter().sum::<usize>(), chat.len());
        prop_assert_eq!(stats.weekday_counts.iter().sum::<usize>(), chat.len());
        prop_assert_eq!(
            stats.daily_counts.iter().map(|d| d.count).sum::<usize>(),
            chat.len()
        );
    }

    #[test]
    fn rankings_are_descending_and_bounded(log in chat_log()) {
        let chat = ChatParser::new().parse_str(&log).unwrap();
        let config = LinguisticConfig::new()
            .with_stopwords(Stopwords::none())
            .with_top_n(10);
        let stats = compute_linguistic_stats(&chat, &config);
        prop_assert!(stats.top_words.len() <= 10);
        for pair in stats.top_words.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn arbitrary_text_never_panics(input in "\\PC{0,400}") {
        // may error, must not panic
        let _ = ChatParser::new().parse_str(&input);
    }
}
