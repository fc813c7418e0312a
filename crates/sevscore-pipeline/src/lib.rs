//! End-to-end severity prediction: language detection, normalization,
//! embedding, raw scoring and calibration, for single tickets and batches.

pub mod artifact;
pub mod builtin;
pub mod config;
pub mod error;
pub mod predictor;
pub mod result;

pub use artifact::{ARTIFACT_VERSION, ModelArtifact};
pub use config::PredictorConfig;
pub use error::{ArtifactError, BackendError, PredictionError, ValidationError};
pub use predictor::SeverityPredictor;
pub use result::{BatchOutcome, BatchSummary, ModelInfo, SeverityResult};
