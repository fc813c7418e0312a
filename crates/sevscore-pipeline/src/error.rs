use sevscore_embeddings::EmbeddingError;
use sevscore_scoring::{ModelError, ProfileError};
use sevscore_text::NormalizeError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The caller's input cannot be scored as given. Never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticket text is empty")]
    EmptyInput,

    #[error("ticket text is {actual} characters long, the limit is {max}")]
    TooLong { actual: usize, max: usize },

    #[error("ticket text is empty after normalization")]
    EmptyAfterNormalization,

    #[error("batch of {actual} tickets exceeds the limit of {max}")]
    BatchTooLarge { actual: usize, max: usize },

    #[error("batch contains no tickets")]
    EmptyBatch,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::TooLong { .. } => "text_too_long",
            Self::EmptyAfterNormalization => "empty_after_normalization",
            Self::BatchTooLarge { .. } => "batch_too_large",
            Self::EmptyBatch => "empty_batch",
        }
    }
}

impl From<NormalizeError> for ValidationError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::EmptyAfterNormalization => Self::EmptyAfterNormalization,
        }
    }
}

/// The embedding provider or severity model failed. Callers may retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("embedding provider failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("severity model failed: {0}")]
    Model(#[from] ModelError),

    #[error("embedding has {actual} dimensions, the model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("prediction timed out after {0:?}")]
    Timeout(Duration),

    #[error("prediction task failed: {0}")]
    TaskFailed(String),
}

impl BackendError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Embedding(_) => "embedding_failed",
            Self::Model(_) => "model_failed",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::Timeout(_) => "timeout",
            Self::TaskFailed(_) => "task_failed",
        }
    }
}

/// Failure of one prediction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PredictionError {
    /// Backend failures are transient from the caller's point of view.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.code(),
            Self::Backend(e) => e.code(),
        }
    }
}

impl From<NormalizeError> for PredictionError {
    fn from(err: NormalizeError) -> Self {
        Self::Validation(err.into())
    }
}

/// Startup faults: a predictor is never built from a broken artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to access model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize model artifact: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unsupported model artifact version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("model expects {model} features but the embedding provider produces {provider}")]
    DimensionMismatch { model: usize, provider: usize },

    #[error("invalid predictor config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::TooLong {
            actual: 6000,
            max: 5000,
        };
        assert!(err.to_string().contains("6000"));
        assert!(err.to_string().contains("5000"));

        let err = ValidationError::BatchTooLarge {
            actual: 101,
            max: 100,
        };
        assert_eq!(err.to_string(), "batch of 101 tickets exceeds the limit of 100");
        assert_eq!(err.code(), "batch_too_large");
    }

    #[test]
    fn test_prediction_error_is_transparent() {
        let err: PredictionError = ValidationError::EmptyInput.into();
        assert_eq!(err.to_string(), "ticket text is empty");
        assert!(!err.is_retryable());
        assert_eq!(err.code(), "empty_input");
    }

    #[test]
    fn test_backend_errors_are_retryable() {
        let err: PredictionError =
            BackendError::Embedding(EmbeddingError::Inference("gpu lost".to_string())).into();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("gpu lost"));
        assert_eq!(err.code(), "embedding_failed");
    }

    #[test]
    fn test_normalize_error_maps_to_validation() {
        let err: PredictionError = NormalizeError::EmptyAfterNormalization.into();
        assert_eq!(
            err,
            PredictionError::Validation(ValidationError::EmptyAfterNormalization)
        );
    }

    #[test]
    fn test_degenerate_profile_message() {
        let err: ArtifactError = ProfileError::Degenerate { min: 1.0, max: 1.0 }.into();
        assert!(err.to_string().contains("degenerate"));
    }
}
