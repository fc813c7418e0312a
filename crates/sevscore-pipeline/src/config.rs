use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest ticket accepted, in characters.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 5_000;
/// Largest batch accepted by `predict_many` callers that use the default.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;
/// Batch items scored at the same time.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;
/// Upper bound on one batch item, in milliseconds.
pub const DEFAULT_ITEM_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub max_text_chars: usize,
    pub max_batch_size: usize,
    pub batch_concurrency: usize,
    pub item_timeout_ms: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            item_timeout_ms: DEFAULT_ITEM_TIMEOUT_MS,
        }
    }
}

impl PredictorConfig {
    pub fn item_timeout(&self) -> Duration {
        Duration::from_millis(self.item_timeout_ms)
    }

    /// Reject settings that would make every request fail.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_chars == 0 {
            return Err("max_text_chars must be positive".to_string());
        }
        if self.max_batch_size == 0 {
            return Err("max_batch_size must be positive".to_string());
        }
        if self.batch_concurrency == 0 {
            return Err("batch_concurrency must be positive".to_string());
        }
        if self.item_timeout_ms == 0 {
            return Err("item_timeout_ms must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PredictorConfig::default();
        assert_eq!(config.max_batch_size, 100);
        assert_eq!(config.item_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = PredictorConfig {
            batch_concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("batch_concurrency"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PredictorConfig = serde_json::from_str(r#"{"max_batch_size": 10}"#).unwrap();
        assert_eq!(config.max_batch_size, 10);
        assert_eq!(config.max_text_chars, DEFAULT_MAX_TEXT_CHARS);
    }
}
