//! Remote classifier client
//!
//! Delegates compliance judgement and identifier extraction to an
//! OpenAI-compatible chat-completions endpoint. Every failure mode maps to
//! a typed [`ClassifierError`], which in turn maps to a conservative
//! placeholder verdict so an outage never silently passes content.
//!
//! ## Architecture
//!
//! ```text
//! content → prompt::compliance_request → HTTP POST (bearer, timeout)
//!         → response::message_content → strip fence → lenient decode
//! ```

mod client;
mod prompt;
mod response;

pub use client::HttpClassifier;
pub use response::{parse_compliance, parse_identifiers, strip_code_fence};

use crate::config::LlmConfig;
use crate::screening::{ComplianceResult, RiskLevel};
use async_trait::async_trait;
use thiserror::Error;

/// Confidence imputed to a remote FAIL verdict
pub const REMOTE_FAIL_CONFIDENCE: f64 = 0.85;

/// Confidence imputed to a remote PASS verdict
pub const REMOTE_PASS_CONFIDENCE: f64 = 0.95;

/// Remote classifier failure taxonomy.
///
/// The display text of each variant is the `detail` of its placeholder
/// verdict.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// URL or key missing; no request was attempted
    #[error("大模型API地址或密钥未配置")]
    Configuration,

    #[error("大模型API调用超时")]
    Timeout,

    #[error("无法连接到大模型API，请检查网络或服务地址")]
    Connection,

    /// Endpoint answered with a non-2xx status
    #[error("大模型API调用失败: HTTP {status}")]
    Status { status: u16 },

    /// 2xx body without `choices[0].message.content`
    #[error("大模型响应格式异常")]
    MalformedResponse,

    /// Message content is not a decodable JSON object
    #[error("解析大模型响应失败: {0}")]
    Parse(String),

    #[error("大模型检测异常: {0}")]
    Unexpected(String),
}

impl ClassifierError {
    /// Risk level carried by the placeholder verdict
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            Self::Timeout => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    /// Conservative FAIL verdict standing in for the missing classification
    pub fn to_placeholder(&self) -> ComplianceResult {
        ComplianceResult::system_error(self.risk_level(), self.to_string())
    }
}

/// Raw identifier candidates reported by the remote endpoint.
///
/// Nothing here is validated; callers run ID numbers through the checksum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierReport {
    pub id_cards: Vec<String>,
    pub phones: Vec<String>,
}

/// Remote classification backend.
///
/// Implementations never retry; retry policy belongs to the caller.
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    /// Judge `content` for compliance.
    async fn classify(
        &self,
        content: &str,
        config: &LlmConfig,
    ) -> Result<ComplianceResult, ClassifierError>;

    /// Ask the endpoint for ID-card and phone numbers in `content`.
    async fn extract_identifiers(
        &self,
        content: &str,
        config: &LlmConfig,
    ) -> Result<IdentifierReport, ClassifierError>;

    /// Backend name used in logs
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::{Verdict, SYSTEM_ERROR_CATEGORY};

    #[test]
    fn test_placeholder_is_conservative() {
        let errors = [
            ClassifierError::Configuration,
            ClassifierError::Timeout,
            ClassifierError::Connection,
            ClassifierError::Status { status: 502 },
            ClassifierError::MalformedResponse,
            ClassifierError::Parse("expected value".into()),
            ClassifierError::Unexpected("boom".into()),
        ];

        for err in errors {
            let placeholder = err.to_placeholder();
            assert_eq!(placeholder.result, Verdict::Fail);
            assert_eq!(placeholder.confidence_score, 0.0);
            assert!(placeholder.risk_categories.contains(SYSTEM_ERROR_CATEGORY));
            assert!(placeholder.risk_level >= RiskLevel::Medium);
        }
    }

    #[test]
    fn test_placeholder_details() {
        assert_eq!(
            ClassifierError::Configuration.to_placeholder().detail,
            "大模型API地址或密钥未配置"
        );
        assert_eq!(
            ClassifierError::Status { status: 503 }.to_placeholder().detail,
            "大模型API调用失败: HTTP 503"
        );
        assert_eq!(
            ClassifierError::Parse("eof".into()).to_placeholder().detail,
            "解析大模型响应失败: eof"
        );
    }

    #[test]
    fn test_timeout_is_medium_risk() {
        assert_eq!(ClassifierError::Timeout.risk_level(), RiskLevel::Medium);
        assert_eq!(ClassifierError::Connection.risk_level(), RiskLevel::High);
    }
}
