//! Raw severity models.

use serde::{Deserialize, Serialize};
use sevscore_embeddings::{EmbeddingProvider, EmbeddingVector, VocabularyCounts};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("feature dimension mismatch: model expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("model produced a non-finite score")]
    NonFinite,
    #[error("invalid model: {0}")]
    Invalid(String),
}

/// Maps a feature vector to an unbounded raw severity score.
pub trait SeverityModel: Send + Sync {
    fn score(&self, features: &EmbeddingVector) -> Result<f32, ModelError>;

    /// Feature dimension the model was built for.
    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinearWeights {
    weights: Vec<f32>,
    #[serde(default)]
    bias: f32,
}

/// `score = bias + weights · features`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LinearWeights", into = "LinearWeights")]
pub struct LinearSeverityModel {
    weights: Vec<f32>,
    bias: f32,
}

impl LinearSeverityModel {
    pub fn new(weights: Vec<f32>, bias: f32) -> Result<Self, ModelError> {
        if weights.is_empty() {
            return Err(ModelError::Invalid("weight vector is empty".to_string()));
        }
        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::Invalid(
                "weights and bias must be finite".to_string(),
            ));
        }
        Ok(Self { weights, bias })
    }

    /// Build a lexicon model over a vocabulary provider: each term's weight
    /// lands on that term's own slot. Every term must be in the vocabulary.
    pub fn from_term_weights(
        provider: &VocabularyCounts,
        terms: &[(&str, f32)],
        bias: f32,
    ) -> Result<Self, ModelError> {
        let mut weights = vec![0.0f32; provider.dimension()];
        for &(term, weight) in terms {
            let slot = provider.slot(term).ok_or_else(|| {
                ModelError::Invalid(format!("term {term:?} is not in the vocabulary"))
            })?;
            weights[slot] += weight;
        }
        debug!(terms = terms.len(), "Built lexicon severity model");
        Self::new(weights, bias)
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }
}

impl TryFrom<LinearWeights> for LinearSeverityModel {
    type Error = ModelError;

    fn try_from(raw: LinearWeights) -> Result<Self, Self::Error> {
        Self::new(raw.weights, raw.bias)
    }
}

impl From<LinearSeverityModel> for LinearWeights {
    fn from(model: LinearSeverityModel) -> Self {
        Self {
            weights: model.weights,
            bias: model.bias,
        }
    }
}

impl SeverityModel for LinearSeverityModel {
    fn score(&self, features: &EmbeddingVector) -> Result<f32, ModelError> {
        if features.len() != self.weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }

        let dot: f32 = self
            .weights
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum();
        let score = self.bias + dot;

        if !score.is_finite() {
            return Err(ModelError::NonFinite);
        }
        Ok(score)
    }

    fn dimension(&self) -> usize {
        self.weights.len()
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_score() {
        let model = LinearSeverityModel::new(vec![1.0, -2.0, 0.5], 0.25).unwrap();
        let score = model
            .score(&EmbeddingVector::new(vec![2.0, 1.0, 4.0]))
            .unwrap();
        assert!((score - 2.25).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = LinearSeverityModel::new(vec![1.0; 4], 0.0).unwrap();
        let err = model
            .score(&EmbeddingVector::new(vec![1.0; 3]))
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_non_finite_score() {
        let model = LinearSeverityModel::new(vec![f32::MAX, f32::MAX], 0.0).unwrap();
        let err = model
            .score(&EmbeddingVector::new(vec![f32::MAX, f32::MAX]))
            .unwrap_err();
        assert_eq!(err, ModelError::NonFinite);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        assert!(LinearSeverityModel::new(vec![], 0.0).is_err());
        assert!(LinearSeverityModel::new(vec![f32::NAN], 0.0).is_err());
        assert!(LinearSeverityModel::new(vec![1.0], f32::INFINITY).is_err());
    }

    #[test]
    fn test_from_term_weights() {
        let provider = VocabularyCounts::new(["down", "slow", "server"]).unwrap();
        let model =
            LinearSeverityModel::from_term_weights(&provider, &[("down", 4.0), ("slow", 2.0)], 0.0)
                .unwrap();
        assert_eq!(model.dimension(), 3);
        assert_eq!(model.weights(), &[4.0, 2.0, 0.0]);

        let features = provider.embed("server down down thanks").unwrap();
        let score = model.score(&features).unwrap();
        assert!((score - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_term_weights_unknown_term() {
        let provider = VocabularyCounts::new(["down"]).unwrap();
        let err = LinearSeverityModel::from_term_weights(&provider, &[("outage", 4.0)], 0.0)
            .unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)));
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let model: LinearSeverityModel =
            serde_json::from_str(r#"{"weights":[0.5,1.5],"bias":-1.0}"#).unwrap();
        assert_eq!(model.weights(), &[0.5, 1.5]);
        assert_eq!(model.bias(), -1.0);

        assert!(serde_json::from_str::<LinearSeverityModel>(r#"{"weights":[]}"#).is_err());
    }
}
