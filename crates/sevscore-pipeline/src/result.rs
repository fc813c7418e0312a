use serde::Serialize;
use sevscore_scoring::{Calibration, Category, ProfileSummary, ScoreDistribution};
use sevscore_text::{Language, NormalizedText, TranslationStatus};

use crate::error::PredictionError;

/// Calibrated severity of one ticket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityResult {
    /// Always within `[10, 100]`.
    pub score: f32,
    pub category: Category,
    /// Within `[0, 1]`; lower near category boundaries.
    pub confidence: f32,
    pub detected_language: Language,
    pub normalized_text: String,
    pub translation: TranslationStatus,
    pub raw_score: f32,
    /// The raw score fell outside the calibration profile and was clamped.
    pub extrapolated: bool,
}

impl SeverityResult {
    pub fn new(calibration: Calibration, normalized: NormalizedText) -> Self {
        let (normalized_text, detected_language, translation) = normalized.into_parts();
        Self {
            score: calibration.score,
            category: calibration.category,
            confidence: calibration.confidence,
            detected_language,
            normalized_text,
            translation,
            raw_score: calibration.raw,
            extrapolated: calibration.extrapolated,
        }
    }

    /// Translation was needed but failed.
    pub fn is_degraded(&self) -> bool {
        self.translation.is_degraded()
    }
}

/// Per-position outcome of a batch.
pub type BatchOutcome = Result<SeverityResult, PredictionError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successful items whose translation degraded.
    pub degraded: usize,
    pub distribution: ScoreDistribution,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome {
                Ok(result) => {
                    summary.succeeded += 1;
                    summary.distribution.add(result.category);
                    if result.is_degraded() {
                        summary.degraded += 1;
                    }
                }
                Err(_) => summary.failed += 1,
            }
        }

        summary
    }
}

/// What a predictor was built from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub embedding_provider: String,
    pub embedding_dim: usize,
    pub model: String,
    pub translator: String,
    pub profile: ProfileSummary,
    pub max_text_chars: usize,
    pub max_batch_size: usize,
    pub batch_concurrency: usize,
    pub item_timeout_ms: u64,
}
