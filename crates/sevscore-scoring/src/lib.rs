//! Severity models and the calibration of their raw output onto the
//! published 10-100 scale.
//!
//! Calibration happens in two stages: a linear rescale of the raw score from
//! the observed training range, followed by a banded remap that spreads the
//! result over the Low, Medium and High ranges. Category and confidence are
//! derived from the final score only.

mod calibrator;
mod model;
mod profile;
mod stats;

pub use calibrator::{
    Calibration, Category, HIGH_PIVOT, HIGH_THRESHOLD, MEDIUM_PIVOT, MEDIUM_THRESHOLD, calibrate,
    confidence, remap,
};
pub use model::{LinearSeverityModel, ModelError, SeverityModel};
pub use profile::{
    CalibrationProfile, OUTPUT_MAX, OUTPUT_MIN, ProfileError, ProfileSummary,
    format_profile_summary,
};
pub use stats::{ScoreDistribution, ScoreStats};
