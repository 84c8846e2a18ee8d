//! Chat-completion response decoding

use super::{ClassifierError, IdentifierReport, REMOTE_FAIL_CONFIDENCE, REMOTE_PASS_CONFIDENCE};
use crate::screening::{ComplianceResult, RiskCategories, RiskLevel, Verdict};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Extract `choices[0].message.content` from a 2xx response body.
pub(super) fn message_content(body: &str) -> Result<String, ClassifierError> {
    let value: Value = serde_json::from_str(body).map_err(|_| ClassifierError::MalformedResponse)?;
    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ClassifierError::MalformedResponse)
}

/// Remove a surrounding markdown code fence (with optional language tag).
pub fn strip_code_fence(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        s = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Verdict object as the remote model returns it. Missing fields decode
/// as empty strings.
#[derive(Debug, Default, Deserialize)]
struct RemoteVerdict {
    #[serde(default, deserialize_with = "lenient_string")]
    result: String,
    #[serde(default, deserialize_with = "lenient_string")]
    risk_level: String,
    #[serde(default, deserialize_with = "lenient_string")]
    risk_categories: String,
    #[serde(default, deserialize_with = "lenient_string")]
    detail: String,
}

impl From<RemoteVerdict> for ComplianceResult {
    fn from(raw: RemoteVerdict) -> Self {
        let result = Verdict::parse(&raw.result);
        let confidence_score = match result {
            Verdict::Pass => REMOTE_PASS_CONFIDENCE,
            Verdict::Fail => REMOTE_FAIL_CONFIDENCE,
        };

        Self {
            result,
            risk_level: RiskLevel::parse(&raw.risk_level),
            risk_categories: RiskCategories::parse(&raw.risk_categories),
            confidence_score,
            detail: raw.detail,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RemoteIdentifiers {
    #[serde(default, deserialize_with = "lenient_list")]
    id_cards: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    phones: Vec<String>,
}

/// Decode a compliance verdict from message content.
pub fn parse_compliance(content: &str) -> Result<ComplianceResult, ClassifierError> {
    let raw: RemoteVerdict = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| ClassifierError::Parse(e.to_string()))?;
    Ok(raw.into())
}

/// Decode an identifier report from message content.
pub fn parse_identifiers(content: &str) -> Result<IdentifierReport, ClassifierError> {
    let raw: RemoteIdentifiers = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| ClassifierError::Parse(e.to_string()))?;
    Ok(IdentifierReport {
        id_cards: raw.id_cards,
        phones: raw.phones,
    })
}

/// Strings pass through, lists are comma-joined, null is empty and any
/// other scalar is rendered as JSON.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    })
}

/// A list of strings; non-string items are dropped, a lone string becomes
/// a one-element list.
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::String(s) => vec![Value::String(s)],
        _ => Vec::new(),
    };

    Ok(items
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect())
}
