//! HTTP API routes and handlers

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use sevscore_pipeline::{
    BatchSummary, ModelInfo, PredictionError, SeverityPredictor, ValidationError,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

use super::types::*;

type AppState = Arc<SeverityPredictor>;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Create the router with all API endpoints
pub fn create_router(predictor: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/profile", get(profile))
        .route("/model", get(model))
        .route("/predict", post(predict))
        .route("/predict/batch", post(predict_batch))
        .with_state(predictor)
}

// ============================================
// Health & Introspection
// ============================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn profile(State(predictor): State<AppState>) -> Json<ProfileResponse> {
    Json(predictor.profile_summary().into())
}

async fn model(State(predictor): State<AppState>) -> Json<ModelInfo> {
    Json(predictor.model_info())
}

// ============================================
// Prediction
// ============================================

async fn predict(
    State(predictor): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let start = Instant::now();

    debug!(ticket_id = ?req.ticket_id, chars = req.ticket_text.len(), "HTTP predict request");

    match predictor.predict_one(&req.ticket_text).await {
        Ok(result) => Ok(Json(PredictResponse::new(
            result,
            req.ticket_id,
            elapsed_ms(start),
        ))),
        Err(e) => {
            log_failure(&e);
            Err(prediction_error(&e))
        }
    }
}

async fn predict_batch(
    State(predictor): State<AppState>,
    Json(req): Json<BatchPredictRequest>,
) -> Result<Json<BatchPredictResponse>, ApiError> {
    let start = Instant::now();
    let max_batch_size = predictor.config().max_batch_size;

    debug!(tickets = req.tickets.len(), "HTTP batch request");

    let outcomes = predictor
        .predict_many(&req.tickets, max_batch_size)
        .await
        .map_err(|e| validation_error(&e))?;

    let summary = BatchSummary::from_outcomes(&outcomes);
    let processing_time_ms = elapsed_ms(start);

    let predictions = outcomes
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| match outcome {
            Ok(result) => BatchItem {
                index,
                prediction: Some(PredictResponse::new(result, None, processing_time_ms)),
                error: None,
            },
            Err(e) => BatchItem {
                index,
                prediction: None,
                error: Some(error_body(&e)),
            },
        })
        .collect();

    Ok(Json(BatchPredictResponse {
        predictions,
        total: summary.total,
        succeeded: summary.succeeded,
        failed: summary.failed,
        distribution: summary.distribution,
        processing_time_ms,
    }))
}

// ============================================
// Errors
// ============================================

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn log_failure(e: &PredictionError) {
    match e {
        PredictionError::Validation(e) => debug!("Rejected ticket: {}", e),
        PredictionError::Backend(e) => error!("Prediction failed: {}", e),
    }
}

fn error_body(e: &PredictionError) -> ErrorResponse {
    ErrorResponse {
        error: e.to_string(),
        code: e.code().to_uppercase(),
    }
}

fn prediction_error(e: &PredictionError) -> ApiError {
    match e {
        PredictionError::Validation(v) => validation_error(v),
        PredictionError::Backend(_) => (StatusCode::SERVICE_UNAVAILABLE, Json(error_body(e))),
    }
}

fn validation_error(e: &ValidationError) -> ApiError {
    let status = match e {
        ValidationError::TooLong { .. } | ValidationError::BatchTooLarge { .. } => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        _ => StatusCode::BAD_REQUEST,
    };

    if status == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Rejected oversized request: {}", e);
    }

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            code: e.code().to_uppercase(),
        }),
    )
}
