//! Built-in lexicon model used when no trained artifact is supplied.
//!
//! Each severity term owns one slot of a vocabulary provider, so the raw
//! score is exactly the sum of the weights of the terms a ticket contains
//! and every other word contributes nothing. Hindi tickets reach it through
//! the glossary translator.

use sevscore_embeddings::{EmbeddingConfig, VocabularyCounts};
use sevscore_scoring::{CalibrationProfile, LinearSeverityModel};

use crate::artifact::ModelArtifact;
use crate::error::ArtifactError;

/// Raw-score range the lexicon is calibrated against.
pub const BUILTIN_RAW_MIN: f32 = 0.0;
pub const BUILTIN_RAW_MAX: f32 = 12.0;

pub const SEVERITY_TERMS: &[(&str, f32)] = &[
    // outages, data loss, security
    ("down", 4.0),
    ("outage", 4.0),
    ("outages", 4.0),
    ("failure", 4.0),
    ("failed", 4.0),
    ("crash", 4.0),
    ("crashed", 4.0),
    ("crashing", 4.0),
    ("corruption", 4.0),
    ("corrupted", 4.0),
    ("breach", 4.0),
    ("ransomware", 4.0),
    ("compromised", 4.0),
    ("unreachable", 4.0),
    ("critical", 4.0),
    ("emergency", 4.0),
    ("dead", 4.0),
    // degradation
    ("slow", 2.0),
    ("timeouts", 2.0),
    ("timing", 2.0),
    ("latency", 2.0),
    ("degraded", 2.0),
    ("intermittent", 2.0),
    ("unstable", 2.0),
    ("freezing", 2.0),
    ("error", 2.0),
    ("errors", 2.0),
    ("lag", 2.0),
    ("hanging", 2.0),
    // scope and intensity
    ("complete", 1.0),
    ("entire", 1.0),
    ("extremely", 1.0),
    ("severe", 1.0),
    ("servers", 1.0),
    ("server", 1.0),
    ("system", 1.0),
    ("database", 1.0),
    ("production", 1.0),
    ("network", 1.0),
    // routine requests
    ("request", -1.0),
    ("question", -1.0),
    ("minor", -1.0),
    ("cosmetic", -1.0),
];

/// Vocabulary of the built-in lexicon, one slot per severity term.
pub fn builtin_vocabulary() -> Result<VocabularyCounts, ArtifactError> {
    Ok(VocabularyCounts::new(
        SEVERITY_TERMS.iter().map(|&(term, _)| term),
    )?)
}

pub fn builtin_model(provider: &VocabularyCounts) -> Result<LinearSeverityModel, ArtifactError> {
    Ok(LinearSeverityModel::from_term_weights(
        provider,
        SEVERITY_TERMS,
        0.0,
    )?)
}

pub fn builtin_artifact() -> Result<ModelArtifact, ArtifactError> {
    let provider = builtin_vocabulary()?;
    Ok(ModelArtifact::new(
        EmbeddingConfig::Vocabulary {
            terms: provider.terms().to_vec(),
        },
        builtin_model(&provider)?,
        CalibrationProfile::new(BUILTIN_RAW_MIN, BUILTIN_RAW_MAX)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sevscore_embeddings::EmbeddingProvider;
    use sevscore_scoring::{Category, SeverityModel, calibrate};

    fn raw_scorer() -> impl Fn(&str) -> f32 {
        let provider = builtin_vocabulary().unwrap();
        let model = builtin_model(&provider).unwrap();
        move |text: &str| model.score(&provider.embed(text).unwrap()).unwrap()
    }

    #[test]
    fn test_raw_scores() {
        let raw = raw_scorer();

        assert!((raw("servers down complete system failure") - 11.0).abs() < 1e-5);
        assert!((raw("database extremely slow applications timing") - 6.0).abs() < 1e-5);
        assert!((raw("server down") - 5.0).abs() < 1e-5);
        assert!(raw("user needs password reset").abs() < 1e-5);
    }

    #[test]
    fn test_ordinary_words_carry_no_weight() {
        let raw = raw_scorer();
        let baseline = raw("server down");

        for word in [
            "thanks", "office", "printer", "headset", "please", "help", "working",
            "application", "chair", "new", "monitor", "keyboard", "install", "access",
        ] {
            assert_eq!(raw(word), 0.0, "{word} has a weight");
            assert_eq!(raw(&format!("server down {word}")), baseline, "{word} shifts the score");
        }
    }

    #[test]
    fn test_routine_requests_are_low() {
        let raw = raw_scorer();
        let profile = CalibrationProfile::new(BUILTIN_RAW_MIN, BUILTIN_RAW_MAX).unwrap();

        for ticket in [
            "please help set office printer thanks",
            "thanks new headset",
            "need new office chair",
            "please install software laptop",
            "monitor flickering sometimes",
        ] {
            let calibration = calibrate(raw(ticket), &profile);
            assert_eq!(calibration.category, Category::Low, "{ticket}");
        }
    }

    #[test]
    fn test_every_term_has_its_own_slot() {
        let provider = builtin_vocabulary().unwrap();
        let model = builtin_model(&provider).unwrap();
        for (term, weight) in SEVERITY_TERMS {
            let slot = provider.slot(term).unwrap();
            assert_eq!(model.weights()[slot], *weight, "{term}");
        }
    }

    #[test]
    fn test_builtin_artifact() {
        let artifact = builtin_artifact().unwrap();
        assert_eq!(artifact.profile.original_max(), BUILTIN_RAW_MAX);
        assert_eq!(artifact.model.weights().len(), SEVERITY_TERMS.len());
        assert_eq!(artifact.embedding.dimension(), SEVERITY_TERMS.len());
    }
}
