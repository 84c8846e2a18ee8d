//! Sensitive-term word list

use crate::error::Result;
use std::collections::BTreeSet;
use std::path::Path;

/// Immutable set of sensitive terms, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermDictionary {
    terms: BTreeSet<String>,
}

impl TermDictionary {
    /// Build from an in-memory word list. Words are trimmed; blanks dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self { terms }
    }

    /// Parse a plain-text word list, one term per line.
    pub fn parse(content: &str) -> Self {
        Self::from_words(content.trim_start_matches('\u{feff}').lines())
    }

    /// Read a word list from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Read a word list from disk, falling back to an empty dictionary.
    ///
    /// A missing or unreadable list must not abort startup; the failure is
    /// logged and the service runs with no local terms.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(dictionary) => {
                tracing::info!(
                    path = %path.display(),
                    terms = dictionary.len(),
                    "Loaded sensitive-term dictionary"
                );
                dictionary
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load sensitive-term dictionary, continuing with an empty one"
                );
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}
