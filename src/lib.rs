//! ContentGuard - content compliance screening service
//!
//! ContentGuard decides whether a piece of user-generated text is safe to
//! publish and finds personal identifiers (mainland-China ID-card numbers
//! and mobile numbers) inside it. It also exposes a small training-task
//! orchestrator used by the platform that submits moderation models.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         HTTP API (axum)                      │
//! │   /api/compliance/*    /api/scaninfo    /api/training/*      │
//! └──────────────┬──────────────────┬────────────────┬───────────┘
//!                │                  │                │
//!      ┌─────────▼──────────────────▼───────┐  ┌─────▼──────────┐
//!      │          ScreeningService          │  │   Training     │
//!      │  loose / moderate / strict checks  │  │  Orchestrator  │
//!      │  rules / llm / both scans          │  │  epochs, stop, │
//!      └───┬──────────────┬─────────────┬───┘  │  callbacks     │
//!          │              │             │      └────────────────┘
//!   ┌──────▼─────┐ ┌──────▼──────┐ ┌────▼───────────────┐
//!   │ TermMatcher│ │ Identifier  │ │ RemoteClassifier   │
//!   │ (trie)     │ │ Extractor   │ │ (chat completions) │
//!   └────────────┘ └─────────────┘ └────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`matcher`]: Sensitive-term dictionary and multi-pattern matching
//! - [`pii`]: ID-card and phone number extraction with checksum validation
//! - [`classifier`]: Remote LLM classifier client and response parsing
//! - [`screening`]: Compliance modes, scan modes and result fusion
//! - [`training`]: Training task lifecycle and progress callbacks
//! - [`api`]: Unified HTTP router
//! - [`config`]: Configuration management

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod matcher;
pub mod pii;
pub mod screening;
pub mod training;

pub use config::ContentGuardConfig;
pub use error::{Error, Result};
