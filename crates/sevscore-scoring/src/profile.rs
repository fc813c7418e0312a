//! Calibration profile: the raw-score range observed on training data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calibrator::{HIGH_THRESHOLD, MEDIUM_THRESHOLD};

/// Lower bound of every published severity score.
pub const OUTPUT_MIN: f32 = 10.0;
/// Upper bound of every published severity score.
pub const OUTPUT_MAX: f32 = 100.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    #[error(
        "degenerate calibration profile: original_min ({min}) must be strictly below original_max ({max})"
    )]
    Degenerate { min: f32, max: f32 },
    #[error("calibration profile bounds must be finite numbers")]
    NonFinite,
    #[error("calibration profile range {min}..{max} overflows f32")]
    SpanOverflow { min: f32, max: f32 },
    #[error("cannot fit a calibration profile from zero raw scores")]
    NoSamples,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ProfileBounds {
    original_min: f32,
    original_max: f32,
}

/// Observed minimum and maximum raw score of the severity model.
///
/// Only valid profiles can be constructed: both bounds are finite,
/// `original_min < original_max` and their difference is finite, so
/// rescaling never divides by zero or by infinity.
/// Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileBounds", into = "ProfileBounds")]
pub struct CalibrationProfile {
    original_min: f32,
    original_max: f32,
}

impl CalibrationProfile {
    pub fn new(original_min: f32, original_max: f32) -> Result<Self, ProfileError> {
        if !original_min.is_finite() || !original_max.is_finite() {
            return Err(ProfileError::NonFinite);
        }
        if original_min >= original_max {
            return Err(ProfileError::Degenerate {
                min: original_min,
                max: original_max,
            });
        }
        if !(original_max - original_min).is_finite() {
            return Err(ProfileError::SpanOverflow {
                min: original_min,
                max: original_max,
            });
        }
        Ok(Self {
            original_min,
            original_max,
        })
    }

    /// Derive the profile from raw model outputs over a training set.
    pub fn fit(raw_scores: &[f32]) -> Result<Self, ProfileError> {
        if raw_scores.is_empty() {
            return Err(ProfileError::NoSamples);
        }
        if raw_scores.iter().any(|r| !r.is_finite()) {
            return Err(ProfileError::NonFinite);
        }

        let (min, max) = raw_scores
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &r| {
                (lo.min(r), hi.max(r))
            });
        Self::new(min, max)
    }

    pub fn original_min(&self) -> f32 {
        self.original_min
    }

    pub fn original_max(&self) -> f32 {
        self.original_max
    }

    /// Whether `raw` lies outside the observed training range.
    pub fn is_extrapolated(&self, raw: f32) -> bool {
        raw < self.original_min || raw > self.original_max
    }

    /// First calibration stage: linear map onto `[OUTPUT_MIN, OUTPUT_MAX]`,
    /// clamped.
    pub fn rescale(&self, raw: f32) -> f32 {
        let span = self.original_max - self.original_min;
        let scaled = OUTPUT_MIN + (raw - self.original_min) / span * (OUTPUT_MAX - OUTPUT_MIN);
        scaled.clamp(OUTPUT_MIN, OUTPUT_MAX)
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            original_min: self.original_min,
            original_max: self.original_max,
            output_bounds: (OUTPUT_MIN, OUTPUT_MAX),
        }
    }
}

impl TryFrom<ProfileBounds> for CalibrationProfile {
    type Error = ProfileError;

    fn try_from(bounds: ProfileBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.original_min, bounds.original_max)
    }
}

impl From<CalibrationProfile> for ProfileBounds {
    fn from(profile: CalibrationProfile) -> Self {
        Self {
            original_min: profile.original_min,
            original_max: profile.original_max,
        }
    }
}

/// Introspection view of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub original_min: f32,
    pub original_max: f32,
    pub output_bounds: (f32, f32),
}

/// Format a profile summary for display.
pub fn format_profile_summary(summary: &ProfileSummary) -> String {
    let mut lines = Vec::new();

    lines.push("Calibration Profile".to_string());
    lines.push("=".repeat(40));
    lines.push(format!("  original_min: {:.3}", summary.original_min));
    lines.push(format!("  original_max: {:.3}", summary.original_max));
    lines.push(format!(
        "  output_bounds: [{}, {}]",
        summary.output_bounds.0, summary.output_bounds.1
    ));
    lines.push(String::new());
    lines.push("Bands:".to_string());
    lines.push(format!("  High:   score >= {HIGH_THRESHOLD}"));
    lines.push(format!(
        "  Medium: {MEDIUM_THRESHOLD} <= score < {HIGH_THRESHOLD}"
    ));
    lines.push(format!("  Low:    {OUTPUT_MIN} <= score < {MEDIUM_THRESHOLD}"));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_profile_rejected() {
        assert_eq!(
            CalibrationProfile::new(3.0, 3.0),
            Err(ProfileError::Degenerate { min: 3.0, max: 3.0 })
        );
        assert!(matches!(
            CalibrationProfile::new(5.0, 1.0),
            Err(ProfileError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_non_finite_profile_rejected() {
        assert_eq!(
            CalibrationProfile::new(f32::NAN, 1.0),
            Err(ProfileError::NonFinite)
        );
        assert_eq!(
            CalibrationProfile::new(0.0, f32::INFINITY),
            Err(ProfileError::NonFinite)
        );
    }

    #[test]
    fn test_overflowing_span_rejected() {
        assert_eq!(
            CalibrationProfile::new(-f32::MAX, f32::MAX),
            Err(ProfileError::SpanOverflow {
                min: -f32::MAX,
                max: f32::MAX
            })
        );
        assert!(matches!(
            CalibrationProfile::fit(&[-3.0e38, 3.0e38]),
            Err(ProfileError::SpanOverflow { .. })
        ));
    }

    #[test]
    fn test_wide_profile_keeps_scores_in_bounds() {
        let profile = CalibrationProfile::new(-1.0e38, 1.0e38).unwrap();
        for raw in [f32::INFINITY, f32::NEG_INFINITY, f32::MAX, -f32::MAX, 0.0] {
            let calibration = crate::calibrator::calibrate(raw, &profile);
            assert!(
                (OUTPUT_MIN..=OUTPUT_MAX).contains(&calibration.score),
                "raw {raw} gave {}",
                calibration.score
            );
        }
    }

    #[test]
    fn test_fit_uses_observed_range() {
        let profile = CalibrationProfile::fit(&[2.5, -1.0, 7.0, 3.0]).unwrap();
        assert_eq!(profile.original_min(), -1.0);
        assert_eq!(profile.original_max(), 7.0);
    }

    #[test]
    fn test_fit_failures() {
        assert_eq!(CalibrationProfile::fit(&[]), Err(ProfileError::NoSamples));
        assert_eq!(
            CalibrationProfile::fit(&[1.0, f32::NAN]),
            Err(ProfileError::NonFinite)
        );
        assert!(matches!(
            CalibrationProfile::fit(&[4.0, 4.0, 4.0]),
            Err(ProfileError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_rescale_endpoints_and_clamping() {
        let profile = CalibrationProfile::new(0.0, 12.0).unwrap();
        assert_eq!(profile.rescale(0.0), OUTPUT_MIN);
        assert_eq!(profile.rescale(12.0), OUTPUT_MAX);
        assert!((profile.rescale(6.0) - 55.0).abs() < 1e-4);
        assert_eq!(profile.rescale(-40.0), OUTPUT_MIN);
        assert_eq!(profile.rescale(400.0), OUTPUT_MAX);
        assert!(profile.is_extrapolated(12.5));
        assert!(!profile.is_extrapolated(12.0));
    }

    #[test]
    fn test_serde_validates() {
        let profile: CalibrationProfile =
            serde_json::from_str(r#"{"original_min":-2.0,"original_max":8.0}"#).unwrap();
        assert_eq!(profile.original_max(), 8.0);

        let err = serde_json::from_str::<CalibrationProfile>(
            r#"{"original_min":1.0,"original_max":1.0}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("degenerate"));

        let json = serde_json::to_value(profile).unwrap();
        assert_eq!(json["original_min"], -2.0);
    }

    #[test]
    fn test_summary() {
        let summary = CalibrationProfile::new(0.0, 12.0).unwrap().summary();
        assert_eq!(summary.output_bounds, (10.0, 100.0));

        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["output_bounds"], serde_json::json!([10.0, 100.0]));

        let text = format_profile_summary(&summary);
        assert!(text.contains("original_max: 12.000"));
        assert!(text.contains("High:   score >= 90"));
    }
}
