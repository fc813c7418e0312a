//! Two-stage remap from a raw model score to a published severity.

use serde::{Deserialize, Serialize};

use crate::profile::{CalibrationProfile, OUTPUT_MAX, OUTPUT_MIN};

/// Final scores at or above this are `High`.
pub const HIGH_THRESHOLD: f32 = 90.0;
/// Final scores at or above this (and below `HIGH_THRESHOLD`) are `Medium`.
pub const MEDIUM_THRESHOLD: f32 = 80.0;

/// Rescaled scores at or above this pivot land in the High band.
pub const HIGH_PIVOT: f32 = 60.0;
/// Rescaled scores at or above this pivot (and below `HIGH_PIVOT`) land in
/// the Medium band.
pub const MEDIUM_PIVOT: f32 = 40.0;

const MEDIUM_BAND_TOP: f32 = 89.0;
const LOW_BAND_TOP: f32 = 79.0;

// Distance from the nearest band boundary at which confidence saturates.
const HIGH_REACH: f32 = OUTPUT_MAX - HIGH_THRESHOLD;
const MEDIUM_REACH: f32 = (HIGH_THRESHOLD - MEDIUM_THRESHOLD) / 2.0;
const LOW_REACH: f32 = MEDIUM_THRESHOLD - OUTPUT_MIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    High,
    Medium,
    Low,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::High, Category::Medium, Category::Low];

    /// Category of a final score. Depends on nothing but the score.
    pub fn from_score(score: f32) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown severity category: {}", s)),
        }
    }
}

/// Every intermediate value of one calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Calibration {
    /// Raw model output.
    pub raw: f32,
    /// Linear rescale of `raw`, clamped to `[10, 100]`.
    pub base_score: f32,
    /// Published score after the banded remap.
    pub score: f32,
    pub category: Category,
    pub confidence: f32,
    /// `raw` fell outside the profile's observed range and was clamped.
    pub extrapolated: bool,
}

/// Calibrate a raw score against `profile`.
///
/// NaN is treated as the profile minimum; infinities clamp to the output
/// bounds.
pub fn calibrate(raw: f32, profile: &CalibrationProfile) -> Calibration {
    let raw = if raw.is_nan() {
        profile.original_min()
    } else {
        raw
    };

    let base_score = profile.rescale(raw);
    let score = remap(base_score);

    Calibration {
        raw,
        base_score,
        score,
        category: Category::from_score(score),
        confidence: confidence(score),
        extrapolated: profile.is_extrapolated(raw),
    }
}

/// Second calibration stage: spread a rescaled score over the final bands.
///
/// | rescaled       | final        |
/// |----------------|--------------|
/// | `[60, 100]`    | `[90, 100]`  |
/// | `[40, 60)`     | `[80, 89)`   |
/// | `[10, 40)`     | `[10, 79)`   |
pub fn remap(base_score: f32) -> f32 {
    let base = base_score.clamp(OUTPUT_MIN, OUTPUT_MAX);

    let score = if base >= HIGH_PIVOT {
        HIGH_THRESHOLD
            + (base - HIGH_PIVOT) / (OUTPUT_MAX - HIGH_PIVOT) * (OUTPUT_MAX - HIGH_THRESHOLD)
    } else if base >= MEDIUM_PIVOT {
        MEDIUM_THRESHOLD
            + (base - MEDIUM_PIVOT) / (HIGH_PIVOT - MEDIUM_PIVOT)
                * (MEDIUM_BAND_TOP - MEDIUM_THRESHOLD)
    } else {
        OUTPUT_MIN + (base - OUTPUT_MIN) / (MEDIUM_PIVOT - OUTPUT_MIN) * (LOW_BAND_TOP - OUTPUT_MIN)
    };

    score.clamp(OUTPUT_MIN, OUTPUT_MAX)
}

/// Confidence in `[0.5, 1.0]` that grows with the distance between the
/// final score and the nearest category boundary.
pub fn confidence(score: f32) -> f32 {
    let (distance, reach) = match Category::from_score(score) {
        Category::High => (score - HIGH_THRESHOLD, HIGH_REACH),
        Category::Medium => (
            (score - MEDIUM_THRESHOLD).min(HIGH_THRESHOLD - score),
            MEDIUM_REACH,
        ),
        Category::Low => (MEDIUM_THRESHOLD - score, LOW_REACH),
    };

    let closeness = (distance.max(0.0) / reach).min(1.0);
    (0.5 + 0.5 * closeness).clamp(0.0, 1.0)
}
