//! Score a single ticket

use anyhow::Result;
use sevscore_pipeline::SeverityResult;
use sevscore_text::TranslationStatus;

use super::common::PredictorArgs;

pub async fn predict(args: &PredictorArgs, text: &str, json: bool) -> Result<()> {
    let predictor = args.build_predictor()?;
    let result = predictor.predict_one(text).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_result(&result));
    }

    Ok(())
}

fn format_result(result: &SeverityResult) -> String {
    let mut lines = vec![
        format!("Severity: {} ({:.2})", result.category, result.score),
        format!("Confidence: {:.2}", result.confidence),
        format!("Language: {}", result.detected_language),
        format!("Processed: {}", result.normalized_text),
    ];

    match &result.translation {
        TranslationStatus::NotRequired => {}
        TranslationStatus::Translated { translator } => {
            lines.push(format!("Translated by: {translator}"));
        }
        TranslationStatus::Degraded { reason } => {
            lines.push(format!("Translation unavailable, scored untranslated: {reason}"));
        }
    }

    if result.extrapolated {
        lines.push(format!(
            "Note: raw score {:.3} is outside the calibration profile",
            result.raw_score
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevscore_pipeline::SeverityPredictor;

    #[tokio::test]
    async fn test_format_high_ticket() {
        let predictor = SeverityPredictor::builtin().unwrap();
        let result = predictor
            .predict_one("servers down complete system failure")
            .await
            .unwrap();

        let output = format_result(&result);
        assert!(output.starts_with("Severity: High ("));
        assert!(output.contains("Language: en"));
        assert!(!output.contains("Translated by"));
    }

    #[tokio::test]
    async fn test_format_translated_ticket() {
        let predictor = SeverityPredictor::builtin().unwrap();
        let result = predictor.predict_one("सर्वर डाउन है").await.unwrap();

        let output = format_result(&result);
        assert!(output.contains("Language: hi"));
        assert!(output.contains("Translated by: glossary"));
        assert!(output.contains("Processed: server down"));
    }
}
