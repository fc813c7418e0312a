//! HTTP API request and response types

use serde::{Deserialize, Serialize};
use sevscore_pipeline::SeverityResult;
use sevscore_scoring::{Category, ProfileSummary, ScoreDistribution};
use sevscore_text::{Language, TranslationStatus};

// ============================================
// Common
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub original_min: f32,
    pub original_max: f32,
    pub output_bounds: [f32; 2],
}

impl From<ProfileSummary> for ProfileResponse {
    fn from(summary: ProfileSummary) -> Self {
        Self {
            original_min: summary.original_min,
            original_max: summary.original_max,
            output_bounds: [summary.output_bounds.0, summary.output_bounds.1],
        }
    }
}

// ============================================
// Predict
// ============================================

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub ticket_text: String,
    pub ticket_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub severity_score: f32,
    pub severity_category: Category,
    pub confidence: f32,
    pub detected_language: Language,
    pub processed_text: String,
    pub translation: TranslationStatus,
    /// Human-readable note when translation degraded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_note: Option<String>,
    pub processing_time_ms: u64,
}

impl PredictResponse {
    pub fn new(result: SeverityResult, ticket_id: Option<String>, processing_time_ms: u64) -> Self {
        let translation_note = match &result.translation {
            TranslationStatus::Degraded { reason } => Some(format!(
                "Translation unavailable ({reason}); scored the original text"
            )),
            _ => None,
        };

        Self {
            ticket_id,
            severity_score: result.score,
            severity_category: result.category,
            confidence: result.confidence,
            detected_language: result.detected_language,
            processed_text: result.normalized_text,
            translation: result.translation,
            translation_note,
            processing_time_ms,
        }
    }
}

// ============================================
// Batch
// ============================================

#[derive(Debug, Deserialize)]
pub struct BatchPredictRequest {
    pub tickets: Vec<String>,
}

/// One position of a batch; exactly one of `prediction` and `error` is set.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchPredictResponse {
    pub predictions: Vec<BatchItem>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub distribution: ScoreDistribution,
    pub processing_time_ms: u64,
}
