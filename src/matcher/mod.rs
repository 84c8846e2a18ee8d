//! Sensitive-term matching
//!
//! Builds a character trie from the term dictionary once at startup and
//! shares it read-only across all requests.

mod dictionary;
mod trie;

pub use dictionary::TermDictionary;
pub use trie::Trie;

use crate::screening::{ComplianceResult, RiskCategories, RiskLevel, Verdict, SENSITIVE_TERM_CATEGORY};
use std::path::Path;

/// Confidence assigned to deterministic term-matcher verdicts
const TERM_MATCH_CONFIDENCE: f64 = 0.99;

/// Local, deterministic compliance check backed by a term trie
#[derive(Debug, Default)]
pub struct TermMatcher {
    trie: Trie,
}

impl TermMatcher {
    /// Build a matcher from a loaded dictionary
    pub fn new(dictionary: &TermDictionary) -> Self {
        Self {
            trie: Trie::from_words(dictionary.iter()),
        }
    }

    /// Build a matcher from an in-memory word list
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(&TermDictionary::from_words(words))
    }

    /// Load the word list at `path`; an unreadable list yields an empty matcher.
    pub fn load(path: &Path) -> Self {
        Self::new(&TermDictionary::load_or_empty(path))
    }

    /// Number of terms in the trie
    pub fn term_count(&self) -> usize {
        self.trie.len()
    }

    pub fn find_first<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.trie.find_first(text)
    }

    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.trie.find_all(text)
    }

    /// Compliance verdict from the dictionary alone
    pub fn check(&self, content: &str) -> ComplianceResult {
        match self.find_first(content) {
            Some(term) => ComplianceResult {
                result: Verdict::Fail,
                risk_level: RiskLevel::High,
                risk_categories: RiskCategories::single(SENSITIVE_TERM_CATEGORY),
                confidence_score: TERM_MATCH_CONFIDENCE,
                detail: format!("内容包含敏感词: {}", term),
            },
            None => ComplianceResult {
                result: Verdict::Pass,
                risk_level: RiskLevel::Low,
                risk_categories: RiskCategories::new(),
                confidence_score: TERM_MATCH_CONFIDENCE,
                detail: "内容检测通过，未发现敏感词".to_string(),
            },
        }
    }
}
