//! Content screening
//!
//! Combines the local term matcher and identifier extractor with the
//! remote classifier according to the requested mode:
//!
//! | Mode       | Behaviour                                                  |
//! |------------|------------------------------------------------------------|
//! | `loose`    | term matcher only                                          |
//! | `moderate` | term matcher; remote classifier arbitrates local hits      |
//! | `strict`   | both, fused (fail wins, most severe risk)                  |
//! | `rules`    | identifier extractor only                                  |
//! | `llm`      | remote identifier extraction, checksum-filtered            |
//! | `both`     | union of the two scans, re-validated                       |

pub mod fusion;
pub mod handler;
pub mod service;
mod types;

pub use handler::screening_router;
pub use service::ScreeningService;
pub use types::{
    BatchComplianceResult, BatchItem, ComplianceMode, ComplianceResult, RiskCategories, RiskLevel,
    ScanMethod, ScanMode, ScanResult, Verdict, SENSITIVE_TERM_CATEGORY, SYSTEM_ERROR_CATEGORY,
};
