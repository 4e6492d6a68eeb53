//! Word filter — banned-term set with whole-word matching.
//!
//! The live set is a cache over the word store: seeded from the base
//! dictionary, bulk-loaded with persisted custom words at startup, and
//! appended to at runtime by `addbadword`. Matching is whole-word and
//! case-insensitive: text is split on non-alphanumeric boundaries and
//! each token is checked against the set, so a banned "ass" does not
//! flag "class".

use std::collections::HashSet;
use std::sync::RwLock;

use tracing::debug;

/// Terms every filter starts with, before custom entries are loaded.
const BASE_DICTIONARY: &[&str] = &[
    "arse", "ass", "asshole", "bastard", "bitch", "bollocks", "crap", "cunt", "dick", "douche",
    "fuck", "fucker", "fucking", "piss", "prick", "pussy", "shit", "slut", "twat", "wanker",
    "whore",
];

/// In-memory banned-word set.
pub struct WordFilter {
    words: RwLock<HashSet<String>>,
}

impl WordFilter {
    /// Create a filter seeded with the base dictionary.
    pub fn new() -> Self {
        let words = BASE_DICTIONARY.iter().map(|w| w.to_string()).collect();
        Self {
            words: RwLock::new(words),
        }
    }

    /// Create an empty filter (for testing).
    pub fn empty() -> Self {
        Self {
            words: RwLock::new(HashSet::new()),
        }
    }

    /// Bulk-load persisted custom words into the live set.
    pub fn load<I>(&self, words: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut set = self.words.write().expect("word filter lock poisoned");
        for word in words {
            set.insert(word.to_lowercase());
        }
        debug!(total = set.len(), "Word filter loaded");
    }

    /// Add one term, effective immediately. Idempotent if already present.
    pub fn add_word(&self, word: &str) {
        let mut set = self.words.write().expect("word filter lock poisoned");
        set.insert(word.to_lowercase());
    }

    /// Whether any whole word of `text` is a banned term.
    pub fn is_profane(&self, text: &str) -> bool {
        let set = self.words.read().expect("word filter lock poisoned");
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .any(|token| set.contains(token))
    }

    /// Number of terms in the live set.
    pub fn len(&self) -> usize {
        self.words.read().expect("word filter lock poisoned").len()
    }

    /// Whether the live set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WordFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_base_dictionary_terms() {
        let filter = WordFilter::new();
        assert!(filter.is_profane("well shit"));
        assert!(filter.is_profane("shit"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let filter = WordFilter::new();
        assert!(filter.is_profane("SHIT happens"));
        assert!(filter.is_profane("ShIt"));
    }

    #[test]
    fn ignores_punctuation_boundaries() {
        let filter = WordFilter::new();
        assert!(filter.is_profane("no. shit! really?"));
    }

    #[test]
    fn does_not_match_inside_words() {
        let filter = WordFilter::new();
        // "ass" is banned; "class" and "bassoon" are not.
        assert!(!filter.is_profane("the whole class passed"));
        assert!(!filter.is_profane("bassoon lessons"));
    }

    #[test]
    fn clean_text_passes() {
        let filter = WordFilter::new();
        assert!(!filter.is_profane("hello there, how are you?"));
        assert!(!filter.is_profane(""));
    }

    #[test]
    fn add_word_is_effective_immediately() {
        let filter = WordFilter::empty();
        assert!(!filter.is_profane("blorp"));
        filter.add_word("blorp");
        assert!(filter.is_profane("blorp"));
        assert!(filter.is_profane("BLORP!"));
    }

    #[test]
    fn add_word_is_idempotent() {
        let filter = WordFilter::empty();
        filter.add_word("blorp");
        filter.add_word("blorp");
        filter.add_word("BLORP");
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn load_lowercases_entries() {
        let filter = WordFilter::empty();
        filter.load(vec!["Grok".to_string(), "ZAP".to_string()]);
        assert!(filter.is_profane("grok"));
        assert!(filter.is_profane("don't zap me"));
        assert_eq!(filter.len(), 2);
    }
}
