//! Score a file of tickets, one per line

use anyhow::Result;
use serde_json::{Value, json};
use sevscore_pipeline::{BatchOutcome, BatchSummary};
use std::path::Path;
use tracing::{info, warn};

use super::common::{PredictorArgs, read_input};

pub async fn batch(args: &PredictorArgs, file: &Path) -> Result<()> {
    let predictor = args.build_predictor()?;
    let input = read_input(file)?;
    let tickets = ticket_lines(&input);

    if tickets.is_empty() {
        warn!("No tickets found in {}", file.display());
        return Ok(());
    }

    let max_batch_size = predictor.config().max_batch_size;
    let mut outcomes = Vec::with_capacity(tickets.len());

    for chunk in tickets.chunks(max_batch_size) {
        let texts: Vec<String> = chunk.iter().map(|(_, text)| text.to_string()).collect();
        let chunk_outcomes = predictor.predict_many(&texts, max_batch_size).await?;

        for ((line, _), outcome) in chunk.iter().zip(&chunk_outcomes) {
            println!("{}", outcome_record(*line, outcome));
        }
        outcomes.extend(chunk_outcomes);
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        degraded = summary.degraded,
        high = summary.distribution.high,
        medium = summary.distribution.medium,
        low = summary.distribution.low,
        "Batch complete"
    );

    Ok(())
}

/// Non-blank lines with their 1-based line numbers.
fn ticket_lines(input: &str) -> Vec<(usize, &str)> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line))
        .collect()
}

fn outcome_record(line: usize, outcome: &BatchOutcome) -> Value {
    match outcome {
        Ok(result) => json!({ "line": line, "result": result }),
        Err(e) => json!({ "line": line, "error": e.to_string(), "code": e.code() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevscore_pipeline::{PredictionError, SeverityPredictor, ValidationError};

    #[test]
    fn test_ticket_lines_skip_blanks() {
        let input = "server down\n\n   \nuser needs password reset\n";
        assert_eq!(
            ticket_lines(input),
            vec![(1, "server down"), (4, "user needs password reset")]
        );
    }

    #[test]
    fn test_error_record() {
        let outcome: BatchOutcome = Err(PredictionError::from(ValidationError::EmptyInput));
        let record = outcome_record(7, &outcome);
        assert_eq!(record["line"], 7);
        assert_eq!(record["code"], "empty_input");
        assert!(record.get("result").is_none());
    }

    #[tokio::test]
    async fn test_result_record() {
        let predictor = SeverityPredictor::builtin().unwrap();
        let outcome = predictor.predict_one("user needs password reset").await;
        let record = outcome_record(2, &outcome);
        assert_eq!(record["line"], 2);
        assert_eq!(record["result"]["category"], "Low");
        assert_eq!(record["result"]["detected_language"], "en");
    }
}
