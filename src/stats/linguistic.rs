//! Word-frequency statistics.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::LinguisticConfig;
use crate::message::ParsedChat;

/// One ranked word with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Top-word rankings for the whole chat and per sender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinguisticStats {
    /// Most frequent valid words across all senders, descending by count.
    pub top_words: Vec<WordCount>,
    /// Per-sender rankings, keyed by display name. Senders with no valid
    /// tokens map to an empty ranking.
    pub top_words_per_sender: BTreeMap<String, Vec<WordCount>>,
}

/// Computes word-frequency rankings over a parsed chat.
///
/// Tokens are lowercased and split on non-alphanumeric boundaries. A token
/// counts only when it meets the minimum length, is not a stopword, is at
/// least 60% alphabetic (so bare numbers never rank), and is not a
/// repetitive-character run like "hahahaha". Ties in the ranking break
/// toward the word seen earlier in the chat.
#[must_use]
pub fn compute_linguistic_stats(chat: &ParsedChat, config: &LinguisticConfig) -> LinguisticStats {
    let mut global = FrequencyTable::default();
    let mut per_sender: BTreeMap<String, FrequencyTable> = BTreeMap::new();

    for message in chat {
        let sender_table = per_sender.entry(message.sender().to_string()).or_default();
        for token in tokenize(message.body()) {
            if !is_valid_token(&token, config) {
                continue;
            }
            global.record(&token);
            sender_table.record(&token);
        }
    }

    LinguisticStats {
        top_words: global.into_ranking(config.top_n),
        top_words_per_sender: per_sender
            .into_iter()
            .map(|(sender, table)| (sender, table.into_ranking(config.top_n)))
            .collect(),
    }
}

/// Occurrence counts with first-seen positions for stable tie-breaking.
#[derive(Default)]
struct FrequencyTable {
    counts: HashMap<String, (usize, usize)>,
    next_index: usize,
}

impl FrequencyTable {
    fn record(&mut self, token: &str) {
        if let Some((count, _)) = self.counts.get_mut(token) {
            *count += 1;
        } else {
            self.counts.insert(token.to_string(), (1, self.next_index));
            self.next_index += 1;
        }
    }

    fn into_ranking(self, top_n: usize) -> Vec<WordCount> {
        let mut entries: Vec<(String, usize, usize)> = self
            .counts
            .into_iter()
            .map(|(word, (count, first_seen))| (word, count, first_seen))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        entries
            .into_iter()
            .take(top_n)
            .map(|(word, count, _)| WordCount { word, count })
            .collect()
    }
}

/// Lowercased tokens split on non-alphanumeric boundaries.
fn tokenize(body: &str) -> impl Iterator<Item = String> + '_ {
    body.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn is_valid_token(token: &str, config: &LinguisticConfig) -> bool {
    let len = token.chars().count();
    if len < config.min_token_len || config.stopwords.contains(token) {
        return false;
    }

    // laugh strings and key mashes ("hahahaha", "ahhhh") carry no theme
    let distinct: HashSet<char> = token.chars().collect();
    if distinct.len() <= 2 && len > 3 {
        return false;
    }

    // at least 60% alphabetic, which also drops bare numbers
    let alpha = token.chars().filter(|c| c.is_alphabetic()).count();
    alpha * 5 >= len * 3 && alpha > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Stopwords;
    use crate::message::Message;
    use chrono::NaiveDateTime;

    fn at(minute: u32) -> chrono::DateTime<chrono::Utc> {
        NaiveDateTime::parse_from_str(&format!("2023-01-05 10:{minute:02}"), "%Y-%m-%d %H:%M")
            .unwrap()
            .and_utc()
    }

    fn no_stopwords() -> LinguisticConfig {
        LinguisticConfig::new().with_stopwords(Stopwords::none())
    }

    #[test]
    fn test_empty_chat() {
        let stats = compute_linguistic_stats(&ParsedChat::default(), &LinguisticConfig::default());
        assert!(stats.top_words.is_empty());
        assert!(stats.top_words_per_sender.is_empty());
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        let tokens: Vec<String> = tokenize("Hello, world! It's great-fun").collect();
        assert_eq!(tokens, ["hello", "world", "it", "s", "great", "fun"]);
    }

    #[test]
    fn test_counts_case_insensitive() {
        let chat = ParsedChat::new(vec![
            Message::text(at(0), "Alice", "Pizza pizza PIZZA"),
            Message::text(at(1), "Bob", "pasta"),
        ]);
        let stats = compute_linguistic_stats(&chat, &no_stopwords());
        assert_eq!(stats.top_words[0], WordCount { word: "pizza".into(), count: 3 });
    }

    #[test]
    fn test_stopwords_and_short_tokens_excluded() {
        let chat = ParsedChat::new(vec![Message::text(
            at(0),
            "Alice",
            "the weather is nice, I think the beach works",
        )]);
        let stats = compute_linguistic_stats(&chat, &LinguisticConfig::default());
        let words: Vec<&str> = stats.top_words.iter().map(|w| w.word.as_str()).collect();
        assert!(!words.contains(&"the"));
        assert!(!words.contains(&"is"));
        assert!(!words.contains(&"i"));
        assert!(words.contains(&"weather"));
        assert!(words.contains(&"beach"));
    }

    #[test]
    fn test_numeric_tokens_excluded() {
        let chat = ParsedChat::new(vec![Message::text(at(0), "Alice", "call me at 12345 or 67")]);
        let stats = compute_linguistic_stats(&chat, &no_stopwords());
        let words: Vec<&str> = stats.top_words.iter().map(|w| w.word.as_str()).collect();
        assert!(!words.contains(&"12345"));
        assert!(!words.contains(&"67"));
        assert!(words.contains(&"call"));
    }

    #[test]
    fn test_mostly_numeric_tokens_excluded() {
        // one letter in three characters is below the alphabetic threshold
        let chat = ParsedChat::new(vec![Message::text(at(0), "Alice", "room b12 uses web3 stuff")]);
        let stats = compute_linguistic_stats(&chat, &no_stopwords());
        let words: Vec<&str> = stats.top_words.iter().map(|w| w.word.as_str()).collect();
        assert!(!words.contains(&"b12"));
        assert!(words.contains(&"web3"));
    }

    #[test]
    fn test_repetitive_runs_excluded() {
        let chat = ParsedChat::new(vec![Message::text(
            at(0),
            "Alice",
            "hahahaha ahhhh loool that joke was hilarious",
        )]);
        let stats = compute_linguistic_stats(&chat, &no_stopwords());
        let words: Vec<&str> = stats.top_words.iter().map(|w| w.word.as_str()).collect();
        assert!(!words.contains(&"hahahaha"));
        assert!(!words.contains(&"ahhhh"));
        assert!(!words.contains(&"loool"));
        assert!(words.contains(&"hilarious"));
        assert!(words.contains(&"joke"));
    }

    #[test]
    fn test_ties_break_by_first_seen() {
        let chat = ParsedChat::new(vec![Message::text(at(0), "Alice", "zebra apple zebra apple")]);
        let stats = compute_linguistic_stats(&chat, &no_stopwords());
        assert_eq!(stats.top_words[0].word, "zebra");
        assert_eq!(stats.top_words[1].word, "apple");
        assert_eq!(stats.top_words[0].count, 2);
    }

    #[test]
    fn test_top_n_truncation() {
        let chat = ParsedChat::new(vec![Message::text(
            at(0),
            "Alice",
            "alpha beta gamma delta epsilon",
        )]);
        let config = no_stopwords().with_top_n(3);
        let stats = compute_linguistic_stats(&chat, &config);
        assert_eq!(stats.top_words.len(), 3);
    }

    #[test]
    fn test_per_sender_rankings_independent() {
        let chat = ParsedChat::new(vec![
            Message::text(at(0), "Alice", "pizza pizza"),
            Message::text(at(1), "Bob", "pasta pasta pasta"),
        ]);
        let stats = compute_linguistic_stats(&chat, &no_stopwords());
        assert_eq!(stats.top_words_per_sender["Alice"][0].word, "pizza");
        assert_eq!(stats.top_words_per_sender["Bob"][0].word, "pasta");
        assert_eq!(stats.top_words[0], WordCount { word: "pasta".into(), count: 3 });
    }

    #[test]
    fn test_media_messages_contribute_nothing() {
        let chat = ParsedChat::new(vec![
            Message::media(at(0), "Alice", None),
            Message::text(at(1), "Alice", "hello hello"),
        ]);
        let stats = compute_linguistic_stats(&chat, &no_stopwords());
        assert_eq!(stats.top_words.len(), 1);
        assert_eq!(stats.top_words[0].word, "hello");
    }
}
