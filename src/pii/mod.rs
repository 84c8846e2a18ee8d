//! Personal identifier extraction
//!
//! Locates mainland-China national ID numbers and mobile phone numbers
//! with regexes. ID candidates are kept only when their check character
//! is consistent; phone numbers have no checksum and are validated by
//! shape alone.

mod checksum;

pub use checksum::{check_char, validate_id_checksum};

use crate::error::{Error, Result};
use crate::screening::ScanResult;
use regex::Regex;
use std::collections::BTreeSet;

/// Region(6) + year(18xx|19xx|20xx) + month + day + sequence(3) + check char.
/// The day range is permissive, not exact per month.
const ID_CARD_PATTERN: &str = r"[1-9][0-9]{5}(?:18|19|20)[0-9]{2}(?:0[1-9]|1[0-2])(?:[0-2][1-9]|10|20|30|31)[0-9]{3}[0-9Xx]";

/// Optional +86/86 prefix followed by an 11-digit mobile number
const PHONE_PATTERN: &str = r"(?:\+?86[-\s]?)?(?:13[0-9]|14[579]|15[0-35-9]|16[2567]|17[01235-8]|18[0-9]|19[189])[0-9]{8}";

/// Deduplicated raw candidates, before checksum filtering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub id_cards: BTreeSet<String>,
    pub phones: BTreeSet<String>,
}

/// Regex-based identifier extractor
#[derive(Debug, Clone)]
pub struct IdentifierExtractor {
    id_card: Regex,
    phone: Regex,
}

impl IdentifierExtractor {
    /// Compile the built-in patterns
    pub fn new() -> Result<Self> {
        let compile = |name: &str, pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| Error::Internal(format!("Invalid {} pattern: {}", name, e)))
        };

        Ok(Self {
            id_card: compile("id card", ID_CARD_PATTERN)?,
            phone: compile("phone", PHONE_PATTERN)?,
        })
    }

    /// Collect unique ID-card and phone candidates from `text`.
    ///
    /// Every phone pattern match is reported, including digits that sit
    /// inside a longer number.
    pub fn find_candidates(&self, text: &str) -> Candidates {
        let id_cards = self
            .id_card
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();

        let phones = self
            .phone
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();

        Candidates { id_cards, phones }
    }

    /// Rule-based scan: candidates with checksum-invalid IDs discarded.
    pub fn scan(&self, text: &str) -> ScanResult {
        let candidates = self.find_candidates(text);
        ScanResult::from_sets(valid_id_cards(candidates.id_cards), candidates.phones)
    }
}

/// Keep only ID numbers whose check character is consistent
pub fn valid_id_cards<I>(candidates: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    candidates
        .into_iter()
        .filter(|c| validate_id_checksum(c))
        .collect()
}
