//! Fit a calibration profile from raw model scores

use anyhow::{Context, Result};
use sevscore_scoring::{
    CalibrationProfile, ScoreDistribution, ScoreStats, calibrate as calibrate_score,
    format_profile_summary,
};
use std::path::Path;
use tracing::info;

use super::common::{PredictorArgs, read_input};

pub fn calibrate(args: &PredictorArgs, raw_scores: &Path, output: Option<&Path>) -> Result<()> {
    let input = read_input(raw_scores)?;
    let scores = parse_scores(&input)?;

    let stats = ScoreStats::compute(&scores)
        .with_context(|| format!("No finite scores in {}", raw_scores.display()))?;
    let profile = CalibrationProfile::fit(&scores).context("Failed to fit calibration profile")?;

    println!("Severity Calibration");
    println!("====================");
    println!("Samples: {}", stats.count);
    println!();
    println!("Raw score statistics:");
    println!("  mean: {:.4}", stats.mean);
    println!("  std_dev: {:.4}", stats.std_dev);
    println!("  min: {:.4}", stats.min);
    println!("  p10: {:.4}", stats.p10);
    println!("  p25: {:.4}", stats.p25);
    println!("  p50 (median): {:.4}", stats.p50);
    println!("  p75: {:.4}", stats.p75);
    println!("  p90: {:.4}", stats.p90);
    println!("  p95: {:.4}", stats.p95);
    println!("  max: {:.4}", stats.max);
    println!();
    println!("{}", format_profile_summary(&profile.summary()));
    println!();
    println!("Category distribution:");
    println!("{}", calibrated_distribution(&scores, &profile));

    match output {
        Some(path) => {
            let artifact = args.load_artifact()?.with_profile(profile);
            artifact.save(path)?;
            info!("Saved model artifact to {}", path.display());
            println!();
            println!("Artifact written to {}", path.display());
        }
        None => {
            println!();
            println!("Dry run - pass --output to write an artifact.");
        }
    }

    Ok(())
}

/// One score per line; blank lines and `#` comments are skipped.
fn parse_scores(input: &str) -> Result<Vec<f32>> {
    input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            line.parse::<f32>()
                .with_context(|| format!("Invalid score on line {}: {:?}", n, line))
        })
        .collect()
}

fn calibrated_distribution(scores: &[f32], profile: &CalibrationProfile) -> ScoreDistribution {
    ScoreDistribution::from_categories(
        scores
            .iter()
            .filter(|s| s.is_finite())
            .map(|&raw| calibrate_score(raw, profile).category),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scores_skips_comments() {
        let input = "# raw scores\n0.5\n\n  1.25 \n# end\n-3\n";
        assert_eq!(parse_scores(input).unwrap(), vec![0.5, 1.25, -3.0]);
    }

    #[test]
    fn test_parse_scores_reports_line() {
        let err = parse_scores("1.0\nabc\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_calibrated_distribution_covers_bands() {
        let scores = [0.0, 5.0, 6.0, 10.0, 12.0];
        let profile = CalibrationProfile::fit(&scores).unwrap();
        let distribution = calibrated_distribution(&scores, &profile);
        assert_eq!(distribution.total(), 5);
        assert_eq!(distribution.high, 2);
        assert_eq!(distribution.low, 1);
    }
}
