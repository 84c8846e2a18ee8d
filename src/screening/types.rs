//! Wire and domain types for screening results
//!
//! All result types serialize with the snake_case field names used by the
//! HTTP API (`risk_level`, `id_cards_found`, ...).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category reported by the term matcher when a dictionary term is found
pub const SENSITIVE_TERM_CATEGORY: &str = "敏感词汇";

/// Category reported by every remote classifier failure placeholder
pub const SYSTEM_ERROR_CATEGORY: &str = "系统错误";

/// Overall compliance verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// Decode a verdict string. Anything other than `PASS` is a failure,
    /// so a missing or garbled verdict never lets content through.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("PASS") {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Risk severity.
///
/// Variants are declared in severity order so the derived `Ord` ranks
/// `Unspecified < Low < Medium < High`. `Unspecified` stands in for a
/// remote verdict that omitted the field and serializes as `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum RiskLevel {
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "HIGH")]
    High,
}

impl RiskLevel {
    /// Lenient, case-insensitive decoding; unknown labels are `Unspecified`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "HIGH" => Self::High,
            _ => Self::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of risk category labels.
///
/// Serialized as a single comma-joined string. Labels keep insertion
/// order; empty labels and duplicates are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskCategories(Vec<String>);

impl RiskCategories {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single label
    pub fn single(label: impl Into<String>) -> Self {
        let mut categories = Self::new();
        categories.push(label);
        categories
    }

    /// Split a comma-separated label list (ASCII or full-width commas).
    pub fn parse(s: &str) -> Self {
        let mut categories = Self::new();
        for label in s.split(&[',', '，'][..]) {
            categories.push(label);
        }
        categories
    }

    /// Append a label unless it is blank or already present
    pub fn push(&mut self, label: impl Into<String>) {
        let label = label.into();
        let label = label.trim();
        if !label.is_empty() && !self.contains(label) {
            self.0.push(label.to_string());
        }
    }

    /// Labels of `self` followed by the new labels of `other`
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for label in &other.0 {
            merged.push(label.as_str());
        }
        merged
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl std::fmt::Display for RiskCategories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

impl Serialize for RiskCategories {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RiskCategories {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Self::parse(&s))
    }
}

/// Result of a compliance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub result: Verdict,
    pub risk_level: RiskLevel,
    pub risk_categories: RiskCategories,
    /// Confidence in `[0, 1]`
    pub confidence_score: f64,
    pub detail: String,
}

impl ComplianceResult {
    pub fn is_pass(&self) -> bool {
        self.result == Verdict::Pass
    }

    pub fn is_fail(&self) -> bool {
        self.result == Verdict::Fail
    }

    /// Conservative placeholder used whenever the remote classifier could
    /// not produce a verdict.
    pub fn system_error(risk_level: RiskLevel, detail: impl Into<String>) -> Self {
        Self {
            result: Verdict::Fail,
            risk_level,
            risk_categories: RiskCategories::single(SYSTEM_ERROR_CATEGORY),
            confidence_score: 0.0,
            detail: detail.into(),
        }
    }
}

/// Compliance strictness mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ComplianceMode {
    /// Term matcher only
    Loose,
    /// Term matcher and remote classifier, most severe wins
    Strict,
    /// Term matcher first; remote classifier arbitrates local failures
    #[default]
    Moderate,
}

impl From<&str> for ComplianceMode {
    /// Unknown modes fall back to `moderate`.
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "loose" => Self::Loose,
            "strict" => Self::Strict,
            _ => Self::Moderate,
        }
    }
}

impl From<String> for ComplianceMode {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl std::fmt::Display for ComplianceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loose => write!(f, "loose"),
            Self::Strict => write!(f, "strict"),
            Self::Moderate => write!(f, "moderate"),
        }
    }
}

/// PII scan mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ScanMode {
    /// Identifier extractor only
    #[default]
    Rules,
    /// Remote classifier only
    Llm,
    /// Both, merged
    Both,
}

impl From<&str> for ScanMode {
    /// Unknown modes fall back to `rules`.
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" => Self::Llm,
            "both" => Self::Both,
            _ => Self::Rules,
        }
    }
}

impl From<String> for ScanMode {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rules => write!(f, "rules"),
            Self::Llm => write!(f, "llm"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Detection method that contributed to a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMethod {
    Rules,
    Llm,
}

/// Result of a personal-information scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub id_cards_found: usize,
    pub phones_found: usize,
    pub id_cards: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub has_sensitive_info: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scan_methods: Vec<ScanMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_result: Option<Box<ScanResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_result: Option<Box<ScanResult>>,
    /// Detail of an absorbed remote classifier failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_error: Option<String>,
}

impl ScanResult {
    /// Build a result from already-validated identifier sets.
    pub fn from_sets(id_cards: BTreeSet<String>, phones: BTreeSet<String>) -> Self {
        Self {
            id_cards_found: id_cards.len(),
            phones_found: phones.len(),
            has_sensitive_info: !id_cards.is_empty() || !phones.is_empty(),
            id_cards,
            phones,
            ..Default::default()
        }
    }

    /// Tag the result with the methods that produced it
    pub fn with_methods(mut self, methods: &[ScanMethod]) -> Self {
        self.scan_methods = methods.to_vec();
        self
    }
}

/// Outcome of one item in a batch compliance check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Position in the submitted list
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ComplianceResult>,
    /// Why the item was left unchecked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch compliance report; `items` follow the input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchComplianceResult {
    pub items: Vec<BatchItem>,
    pub total: usize,
    pub passed_count: usize,
    pub failed_count: usize,
    pub unchecked_count: usize,
}

impl BatchComplianceResult {
    pub fn from_items(items: Vec<BatchItem>) -> Self {
        let mut report = Self {
            total: items.len(),
            ..Default::default()
        };
        for item in &items {
            match &item.result {
                Some(r) if r.is_pass() => report.passed_count += 1,
                Some(_) => report.failed_count += 1,
                None => report.unchecked_count += 1,
            }
        }
        report.items = items;
        report
    }
}
