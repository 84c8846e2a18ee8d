//! Combining local and remote verdicts

use super::types::{ComplianceResult, ScanMethod, ScanResult, Verdict};
use crate::pii::valid_id_cards;

/// Strict-mode fusion.
///
/// Two passes yield the remote result verbatim. Otherwise the fused result
/// fails with the more severe risk level, the union of both category
/// lists, the higher confidence and both details labelled by source.
pub fn fuse_strict(local: ComplianceResult, remote: ComplianceResult) -> ComplianceResult {
    if local.is_pass() && remote.is_pass() {
        return remote;
    }

    ComplianceResult {
        result: Verdict::Fail,
        risk_level: local.risk_level.max(remote.risk_level),
        risk_categories: local.risk_categories.union(&remote.risk_categories),
        confidence_score: local.confidence_score.max(remote.confidence_score),
        detail: format!("规则检查: {}; LLM检查: {}", local.detail, remote.detail),
    }
}

/// Merge rule and remote scans for `both` mode.
///
/// ID numbers from the union are checked again, so a remote-only
/// candidate with a bad check character is dropped. The inputs are kept
/// as sub-results.
pub fn merge_scans(rules: ScanResult, llm: ScanResult) -> ScanResult {
    let id_cards = valid_id_cards(rules.id_cards.iter().chain(&llm.id_cards).cloned());
    let phones = rules.phones.iter().chain(&llm.phones).cloned().collect();

    let mut merged = ScanResult::from_sets(id_cards, phones)
        .with_methods(&[ScanMethod::Rules, ScanMethod::Llm]);
    merged.llm_error = llm.llm_error.clone();
    merged.rules_result = Some(Box::new(rules));
    merged.llm_result = Some(Box::new(llm));
    merged
}
