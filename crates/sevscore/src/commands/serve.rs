//! Start the HTTP API server

use anyhow::Result;
use std::sync::Arc;

use super::common::PredictorArgs;
use crate::http::serve_http;

pub async fn serve(
    args: &PredictorArgs,
    port: u16,
    cors_origin: Option<String>,
    max_concurrent_requests: usize,
) -> Result<()> {
    let predictor = Arc::new(args.build_predictor()?);
    serve_http(predictor, port, cors_origin, max_concurrent_requests).await
}
