pub mod model;
pub mod normalize;

pub use model::{
    EmbeddingConfig, EmbeddingError, EmbeddingProvider, EmbeddingVector, HashedBagOfWords,
    VocabularyCounts, create_embedding_provider, fnv1a,
};

#[cfg(feature = "onnx")]
pub use model::onnx::OnnxEmbeddingProvider;

/// Default embedding width, shared by the hashed provider and MiniLM exports.
pub const EMBEDDING_DIM: usize = 384;
