use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::EMBEDDING_DIM;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("nothing to embed")]
    EmptyInput,
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
    #[error("failed to load embedding model: {0}")]
    Load(String),
    #[error("embedding inference failed: {0}")]
    Inference(String),
}

/// Fixed-length dense vector produced by an [`EmbeddingProvider`].
///
/// Values are shared and never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector(Arc<[f32]>);

impl EmbeddingVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values.into())
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for EmbeddingVector {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbeddingConfig {
    /// Feature-hashed term counts; deterministic and dependency free.
    Hashed { dimension: usize },
    /// Counts of an explicit vocabulary, one slot per term.
    Vocabulary { terms: Vec<String> },
    /// Sentence-transformer export run through ONNX Runtime.
    Onnx {
        model_path: String,
        tokenizer_path: String,
        max_length: usize,
        dimension: usize,
    },
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::Hashed {
            dimension: EMBEDDING_DIM,
        }
    }
}

impl EmbeddingConfig {
    pub fn dimension(&self) -> usize {
        match self {
            Self::Hashed { dimension } | Self::Onnx { dimension, .. } => *dimension,
            Self::Vocabulary { terms } => terms.len(),
        }
    }
}

/// Maps normalized text to a vector whose length is `dimension()` on every
/// call. Implementations must be deterministic for identical input.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

/// 64-bit FNV-1a, stable across platforms and releases.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET, |hash, &b| (hash ^ b as u64).wrapping_mul(PRIME))
}

/// Bag-of-words provider: every whitespace token adds 1.0 to the bucket
/// `fnv1a(token) % dimension`.
#[derive(Debug, Clone)]
pub struct HashedBagOfWords {
    dimension: usize,
}

impl HashedBagOfWords {
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "dimension must be positive".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    pub fn bucket(&self, token: &str) -> usize {
        (fnv1a(token.as_bytes()) % self.dimension as u64) as usize
    }
}

impl Default for HashedBagOfWords {
    fn default() -> Self {
        Self {
            dimension: EMBEDDING_DIM,
        }
    }
}

impl EmbeddingProvider for HashedBagOfWords {
    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let mut values = vec![0.0f32; self.dimension];
        let mut tokens = 0usize;

        for token in text.split_whitespace() {
            values[self.bucket(token)] += 1.0;
            tokens += 1;
        }

        if tokens == 0 {
            return Err(EmbeddingError::EmptyInput);
        }

        Ok(EmbeddingVector::new(values))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashed-bow"
    }
}

/// Exact-match term counts over a fixed vocabulary.
///
/// Slot `i` counts occurrences of `terms[i]`; tokens outside the vocabulary
/// contribute nothing, so no two words ever share a slot.
#[derive(Debug, Clone)]
pub struct VocabularyCounts {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl VocabularyCounts {
    pub fn new<I, S>(terms: I) -> Result<Self, EmbeddingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: Vec<String> = terms.into_iter().map(Into::into).collect();
        if terms.is_empty() {
            return Err(EmbeddingError::InvalidConfig(
                "vocabulary is empty".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(terms.len());
        for (slot, term) in terms.iter().enumerate() {
            if term.is_empty() || term.contains(char::is_whitespace) {
                return Err(EmbeddingError::InvalidConfig(format!(
                    "vocabulary term {term:?} is not a single token"
                )));
            }
            if index.insert(term.clone(), slot).is_some() {
                return Err(EmbeddingError::InvalidConfig(format!(
                    "duplicate vocabulary term {term:?}"
                )));
            }
        }

        Ok(Self { terms, index })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn slot(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }
}

impl EmbeddingProvider for VocabularyCounts {
    fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let mut values = vec![0.0f32; self.terms.len()];
        let mut tokens = 0usize;

        for token in text.split_whitespace() {
            if let Some(slot) = self.slot(token) {
                values[slot] += 1.0;
            }
            tokens += 1;
        }

        if tokens == 0 {
            return Err(EmbeddingError::EmptyInput);
        }

        Ok(EmbeddingVector::new(values))
    }

    fn dimension(&self) -> usize {
        self.terms.len()
    }

    fn name(&self) -> &str {
        "vocabulary"
    }
}

#[cfg(feature = "onnx")]
pub mod onnx {
    use super::*;
    use ort::session::Session;
    use ort::session::builder::GraphOptimizationLevel;
    use ort::value::Tensor;
    use std::sync::Mutex;
    use tokenizers::Tokenizer;

    fn inference(e: impl std::fmt::Display) -> EmbeddingError {
        EmbeddingError::Inference(e.to_string())
    }

    fn load(e: impl std::fmt::Display) -> EmbeddingError {
        EmbeddingError::Load(e.to_string())
    }

    pub struct OnnxEmbeddingProvider {
        session: Mutex<Session>,
        tokenizer: Tokenizer,
        max_length: usize,
        dimension: usize,
    }

    impl OnnxEmbeddingProvider {
        pub fn load(
            model_path: &str,
            tokenizer_path: &str,
            max_length: usize,
            dimension: usize,
        ) -> Result<Self, EmbeddingError> {
            info!("Loading ONNX model from {}", model_path);

            let session = Session::builder()
                .map_err(load)?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .map_err(load)?
                .with_intra_threads(4)
                .map_err(load)?
                .commit_from_file(model_path)
                .map_err(load)?;

            let tokenizer = Tokenizer::from_file(tokenizer_path)
                .map_err(|e| EmbeddingError::Load(format!("tokenizer: {e}")))?;

            Ok(Self {
                session: Mutex::new(session),
                tokenizer,
                max_length,
                dimension,
            })
        }

        fn tokenize(&self, text: &str) -> Result<(Vec<i64>, Vec<i64>), EmbeddingError> {
            let encoding = self.tokenizer.encode(text, true).map_err(inference)?;

            let mut input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
            let mut attention_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .map(|&x| x as i64)
                .collect();

            input_ids.truncate(self.max_length);
            attention_mask.truncate(self.max_length);

            Ok((input_ids, attention_mask))
        }

        fn mean_pooling(&self, hidden: &[f32], hidden_size: usize, attention_mask: &[i64]) -> Vec<f32> {
            let mut sum = vec![0.0f32; hidden_size];
            let mut count = 0.0f32;

            for (i, row) in hidden.chunks_exact(hidden_size).enumerate() {
                if attention_mask.get(i) == Some(&1) {
                    for (acc, v) in sum.iter_mut().zip(row) {
                        *acc += v;
                    }
                    count += 1.0;
                }
            }

            if count > 0.0 {
                for v in &mut sum {
                    *v /= count;
                }
            }

            crate::normalize::l2_normalize_in_place(&mut sum);
            sum
        }
    }

    impl EmbeddingProvider for OnnxEmbeddingProvider {
        fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
            if text.trim().is_empty() {
                return Err(EmbeddingError::EmptyInput);
            }

            let (input_ids, attention_mask) = self.tokenize(text)?;
            let seq_len = input_ids.len();
            let token_type_ids = vec![0i64; seq_len];

            let ids = Tensor::from_array(([1usize, seq_len], input_ids)).map_err(inference)?;
            let mask =
                Tensor::from_array(([1usize, seq_len], attention_mask.clone())).map_err(inference)?;
            let types = Tensor::from_array(([1usize, seq_len], token_type_ids)).map_err(inference)?;

            let mut session = self
                .session
                .lock()
                .map_err(|_| EmbeddingError::Inference("session lock poisoned".to_string()))?;
            let outputs = session
                .run(ort::inputs![
                    "input_ids" => ids,
                    "attention_mask" => mask,
                    "token_type_ids" => types,
                ])
                .map_err(inference)?;

            let (shape, data) = outputs[0].try_extract_tensor::<f32>().map_err(inference)?;
            let hidden_size = shape.last().copied().unwrap_or(0) as usize;
            if hidden_size != self.dimension {
                return Err(EmbeddingError::Inference(format!(
                    "model produced {hidden_size}-dim states, expected {}",
                    self.dimension
                )));
            }

            Ok(EmbeddingVector::new(self.mean_pooling(
                data,
                hidden_size,
                &attention_mask,
            )))
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn name(&self) -> &str {
            "onnx"
        }
    }
}

/// Build the provider described by `config`.
pub fn create_embedding_provider(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    match config {
        EmbeddingConfig::Hashed { dimension } => {
            info!(dimension, "Using hashed bag-of-words embeddings");
            Ok(Arc::new(HashedBagOfWords::new(*dimension)?))
        }
        EmbeddingConfig::Vocabulary { terms } => {
            info!(terms = terms.len(), "Using vocabulary term counts");
            Ok(Arc::new(VocabularyCounts::new(terms.iter().cloned())?))
        }
        #[cfg(feature = "onnx")]
        EmbeddingConfig::Onnx {
            model_path,
            tokenizer_path,
            max_length,
            dimension,
        } => {
            info!("Using ONNX embedding model");
            Ok(Arc::new(onnx::OnnxEmbeddingProvider::load(
                model_path,
                tokenizer_path,
                *max_length,
                *dimension,
            )?))
        }
        #[cfg(not(feature = "onnx"))]
        EmbeddingConfig::Onnx { .. } => Err(EmbeddingError::InvalidConfig(
            "built without the `onnx` feature".to_string(),
        )),
    }
}
