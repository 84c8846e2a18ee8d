//! Screening service facade
//!
//! Entry point for compliance checks and personal-information scans. The
//! term matcher and extractor are immutable and shared; remote failures
//! are absorbed into placeholder results, so only empty input surfaces as
//! an error.

use super::fusion::{fuse_strict, merge_scans};
use super::types::{
    BatchComplianceResult, BatchItem, ComplianceMode, ComplianceResult, ScanMethod, ScanMode,
    ScanResult,
};
use crate::classifier::{HttpClassifier, RemoteClassifier};
use crate::config::{ContentGuardConfig, LlmConfig, LlmOverride};
use crate::error::{Error, Result};
use crate::matcher::TermMatcher;
use crate::pii::{valid_id_cards, IdentifierExtractor};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Batch items checked concurrently
const BATCH_CONCURRENCY: usize = 4;

/// Compliance and PII screening facade
#[derive(Clone)]
pub struct ScreeningService {
    matcher: Arc<TermMatcher>,
    extractor: Arc<IdentifierExtractor>,
    classifier: Arc<dyn RemoteClassifier>,
    llm_defaults: LlmConfig,
}

impl ScreeningService {
    pub fn new(
        matcher: Arc<TermMatcher>,
        extractor: IdentifierExtractor,
        classifier: Arc<dyn RemoteClassifier>,
        llm_defaults: LlmConfig,
    ) -> Self {
        Self {
            matcher,
            extractor: Arc::new(extractor),
            classifier,
            llm_defaults,
        }
    }

    /// Load the dictionary and wire the HTTP classifier from configuration.
    pub fn from_config(config: &ContentGuardConfig) -> Result<Self> {
        let matcher = TermMatcher::load(&config.dictionary.path);
        Ok(Self::new(
            Arc::new(matcher),
            IdentifierExtractor::new()?,
            Arc::new(HttpClassifier::new()),
            config.llm.clone(),
        ))
    }

    pub fn matcher(&self) -> &TermMatcher {
        &self.matcher
    }

    /// Process-wide remote classifier defaults
    pub fn llm_defaults(&self) -> &LlmConfig {
        &self.llm_defaults
    }

    fn effective_llm(&self, over: Option<&LlmOverride>) -> LlmConfig {
        match over {
            Some(over) => self.llm_defaults.with_override(over),
            None => self.llm_defaults.clone(),
        }
    }

    /// Check `content` under `mode`.
    pub async fn check_compliance(
        &self,
        content: &str,
        mode: ComplianceMode,
        llm: Option<&LlmOverride>,
    ) -> Result<ComplianceResult> {
        if content.is_empty() {
            return Err(Error::empty_input());
        }

        tracing::info!(
            content_len = content.chars().count(),
            mode = %mode,
            "Compliance check"
        );

        let local = self.matcher.check(content);
        let result = match mode {
            ComplianceMode::Loose => local,
            ComplianceMode::Strict => {
                let remote = self.remote_check(content, &self.effective_llm(llm)).await;
                fuse_strict(local, remote)
            }
            ComplianceMode::Moderate if local.is_pass() => local,
            ComplianceMode::Moderate => {
                // The remote verdict overrides a local hit
                self.remote_check(content, &self.effective_llm(llm)).await
            }
        };

        tracing::debug!(
            result = %result.result,
            risk_level = %result.risk_level,
            "Compliance check finished"
        );
        Ok(result)
    }

    /// Check every item of `contents`; empty items are reported unchecked.
    pub async fn check_batch(
        &self,
        contents: &[String],
        mode: ComplianceMode,
        llm: Option<&LlmOverride>,
    ) -> BatchComplianceResult {
        tracing::info!(items = contents.len(), mode = %mode, "Batch compliance check");

        let items = stream::iter(contents.iter().cloned().enumerate())
            .map(|(index, content): (usize, String)| async move {
                match self.check_compliance(&content, mode, llm).await {
                    Ok(result) => BatchItem {
                        index,
                        result: Some(result),
                        error: None,
                    },
                    Err(e) => BatchItem {
                        index,
                        result: None,
                        error: Some(e.to_string()),
                    },
                }
            })
            .buffered(BATCH_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        BatchComplianceResult::from_items(items)
    }

    /// Scan `content` for ID-card and phone numbers under `mode`.
    pub async fn scan_personal_info(
        &self,
        content: &str,
        mode: ScanMode,
        llm: Option<&LlmOverride>,
    ) -> Result<ScanResult> {
        if content.is_empty() {
            return Err(Error::empty_input());
        }

        tracing::info!(
            content_len = content.chars().count(),
            scan_mode = %mode,
            "Personal information scan"
        );

        let result = match mode {
            ScanMode::Rules => self.rule_scan(content),
            ScanMode::Llm => self.remote_scan(content, &self.effective_llm(llm)).await,
            ScanMode::Both => {
                let rules = self.rule_scan(content);
                let remote = self.remote_scan(content, &self.effective_llm(llm)).await;
                merge_scans(rules, remote)
            }
        };

        tracing::info!(
            id_cards = result.id_cards_found,
            phones = result.phones_found,
            "Personal information scan finished"
        );
        Ok(result)
    }

    fn rule_scan(&self, content: &str) -> ScanResult {
        self.extractor.scan(content).with_methods(&[ScanMethod::Rules])
    }

    async fn remote_check(&self, content: &str, config: &LlmConfig) -> ComplianceResult {
        match self.classifier.classify(content, config).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    backend = self.classifier.name(),
                    url = %config.url,
                    error = %e,
                    "Remote classifier failed, using placeholder verdict"
                );
                e.to_placeholder()
            }
        }
    }

    async fn remote_scan(&self, content: &str, config: &LlmConfig) -> ScanResult {
        match self.classifier.extract_identifiers(content, config).await {
            Ok(report) => ScanResult::from_sets(
                valid_id_cards(report.id_cards),
                report.phones.into_iter().collect(),
            )
            .with_methods(&[ScanMethod::Llm]),
            Err(e) => {
                tracing::warn!(
                    backend = self.classifier.name(),
                    url = %config.url,
                    error = %e,
                    "Remote identifier extraction failed"
                );
                let mut result = ScanResult::default().with_methods(&[ScanMethod::Llm]);
                result.llm_error = Some(e.to_string());
                result
            }
        }
    }
}
