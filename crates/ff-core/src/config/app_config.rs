use serde::{Deserialize, Serialize};

use super::{DISPATCH_TIMEOUT_MS, FEEDBACK_HIDE_MS, SCAN_BACKOFF_MS, SCAN_MAX_ATTEMPTS};

/// Application configuration DTO (pure data, no logic).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Milliseconds a dispatched request may wait before the bridge
    /// synthesizes a timeout failure.
    pub dispatch_timeout_ms: u64,

    /// Attempts the initial input scan makes before handing over to the
    /// mutation watcher entirely.
    pub scan_max_attempts: u32,

    /// Pause between initial-scan attempts.
    pub scan_backoff_ms: u64,

    /// How long transient success feedback stays visible.
    pub feedback_hide_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_ms: DISPATCH_TIMEOUT_MS,
            scan_max_attempts: SCAN_MAX_ATTEMPTS,
            scan_backoff_ms: SCAN_BACKOFF_MS,
            feedback_hide_ms: FEEDBACK_HIDE_MS,
        }
    }
}

impl AppConfig {
    /// Create AppConfig from a TOML value. Missing keys fall back to the
    /// policy constants; present keys are taken as facts.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let section = toml_value.get("formfix");

        let read_u64 = |key: &str, fallback: u64| -> u64 {
            section
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_integer())
                .map(|v| v as u64)
                .unwrap_or(fallback)
        };

        Ok(Self {
            dispatch_timeout_ms: read_u64("dispatch_timeout_ms", defaults.dispatch_timeout_ms),
            scan_max_attempts: read_u64("scan_max_attempts", defaults.scan_max_attempts as u64)
                as u32,
            scan_backoff_ms: read_u64("scan_backoff_ms", defaults.scan_backoff_ms),
            feedback_hide_ms: read_u64("feedback_hide_ms", defaults.feedback_hide_ms),
        })
    }
}
