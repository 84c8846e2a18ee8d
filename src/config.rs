//! ContentGuard configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main ContentGuard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentGuardConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Sensitive-term dictionary configuration
    #[serde(default)]
    pub dictionary: DictionaryConfig,

    /// Default remote classifier endpoint
    #[serde(default)]
    pub llm: LlmConfig,

    /// Training orchestrator configuration
    #[serde(default)]
    pub training: TrainingConfig,
}

impl ContentGuardConfig {
    /// Load configuration from a TOML file.
    ///
    /// Sections missing from the file fall back to their defaults, so the
    /// `llm` section still picks up the `LLM_DEFAULT_*` environment.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            crate::Error::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
        }
    }
}

/// Sensitive-term dictionary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Word list, one term per line
    pub path: PathBuf,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Badwords.txt"),
        }
    }
}

/// Training orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Timeout for progress callbacks in seconds
    pub callback_timeout_secs: u64,

    /// Pause between epochs in milliseconds
    pub epoch_interval_ms: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            callback_timeout_secs: 5,
            epoch_interval_ms: 2000,
        }
    }
}

// =============================================================================
// Remote classifier endpoint
// =============================================================================

const DEFAULT_LLM_URL: &str = "https://api.example.com/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

/// A string wrapper that redacts its value in Debug and Display output.
/// Keeps API keys out of logs and error messages.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Access the secret value (only for HTTP headers)
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Serialize for SecretString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            serializer.serialize_str("")
        } else {
            serializer.serialize_str("[REDACTED]")
        }
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

/// Remote classifier endpoint configuration.
///
/// The process-wide instance is built once at startup and never mutated;
/// per-call overrides produce a fresh value via [`LlmConfig::with_override`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat-completions endpoint URL
    pub url: String,

    /// Bearer token
    pub key: SecretString,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl LlmConfig {
    /// Read the default endpoint from `LLM_DEFAULT_URL`, `LLM_DEFAULT_KEY`,
    /// `LLM_DEFAULT_MODEL` and `LLM_DEFAULT_TIMEOUT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout_secs = lookup("LLM_DEFAULT_TIMEOUT")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS);

        Self {
            url: lookup("LLM_DEFAULT_URL").unwrap_or_else(|| DEFAULT_LLM_URL.to_string()),
            key: SecretString::new(lookup("LLM_DEFAULT_KEY").unwrap_or_default()),
            model: lookup("LLM_DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            timeout_secs,
        }
    }

    /// Apply a per-call override. Absent or empty fields keep the default.
    pub fn with_override(&self, over: &LlmOverride) -> Self {
        fn pick(value: &Option<String>, fallback: &str) -> String {
            match value {
                Some(v) if !v.is_empty() => v.clone(),
                _ => fallback.to_string(),
            }
        }

        Self {
            url: pick(&over.url, &self.url),
            key: SecretString::new(pick(&over.key, self.key.expose())),
            model: pick(&over.model, &self.model),
            timeout_secs: over.timeout.filter(|t| *t > 0).unwrap_or(self.timeout_secs),
        }
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether both the endpoint URL and key are present
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.key.is_empty()
    }
}

/// Per-call override of the remote classifier endpoint (`llm_config` on the wire)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmOverride {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
}
