//! The prediction pipeline.
//!
//! A `SeverityPredictor` owns read-only components built once at startup and
//! is cheap to clone; clones share the same components. Nothing in the
//! pipeline mutates shared state, so any number of predictions may run at the
//! same time.

use sevscore_embeddings::{EmbeddingProvider, create_embedding_provider};
use sevscore_scoring::{CalibrationProfile, ProfileSummary, SeverityModel, calibrate};
use sevscore_text::{GlossaryTranslator, LanguageDetector, NormalizerConfig, TextNormalizer};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::artifact::ModelArtifact;
use crate::builtin::builtin_artifact;
use crate::config::PredictorConfig;
use crate::error::{ArtifactError, BackendError, PredictionError, ValidationError};
use crate::result::{BatchOutcome, ModelInfo, SeverityResult};

#[derive(Clone)]
pub struct SeverityPredictor {
    detector: LanguageDetector,
    normalizer: Arc<TextNormalizer>,
    provider: Arc<dyn EmbeddingProvider>,
    model: Arc<dyn SeverityModel>,
    profile: CalibrationProfile,
    config: PredictorConfig,
}

impl SeverityPredictor {
    /// Assemble a predictor, refusing mismatched or misconfigured parts.
    pub fn new(
        normalizer: TextNormalizer,
        provider: Arc<dyn EmbeddingProvider>,
        model: Arc<dyn SeverityModel>,
        profile: CalibrationProfile,
        config: PredictorConfig,
    ) -> Result<Self, ArtifactError> {
        config.validate().map_err(ArtifactError::InvalidConfig)?;

        if model.dimension() != provider.dimension() {
            return Err(ArtifactError::DimensionMismatch {
                model: model.dimension(),
                provider: provider.dimension(),
            });
        }

        info!(
            provider = provider.name(),
            model = model.name(),
            dimension = provider.dimension(),
            translator = normalizer.translator_name(),
            "Severity predictor ready"
        );

        Ok(Self {
            detector: LanguageDetector::new(),
            normalizer: Arc::new(normalizer),
            provider,
            model,
            profile,
            config,
        })
    }

    pub fn from_model_artifact(
        artifact: ModelArtifact,
        normalizer: TextNormalizer,
        config: PredictorConfig,
    ) -> Result<Self, ArtifactError> {
        let provider = create_embedding_provider(&artifact.embedding)?;
        Self::new(
            normalizer,
            provider,
            Arc::new(artifact.model),
            artifact.profile,
            config,
        )
    }

    pub fn from_artifact(
        path: &Path,
        normalizer: TextNormalizer,
        config: PredictorConfig,
    ) -> Result<Self, ArtifactError> {
        Self::from_model_artifact(ModelArtifact::load(path)?, normalizer, config)
    }

    /// Lexicon model with the offline glossary translator and default limits.
    pub fn builtin() -> Result<Self, ArtifactError> {
        let normalizer = TextNormalizer::new(
            NormalizerConfig::default(),
            Arc::new(GlossaryTranslator::new()),
        );
        Self::from_model_artifact(builtin_artifact()?, normalizer, PredictorConfig::default())
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn profile_summary(&self) -> ProfileSummary {
        self.profile.summary()
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            embedding_provider: self.provider.name().to_string(),
            embedding_dim: self.provider.dimension(),
            model: self.model.name().to_string(),
            translator: self.normalizer.translator_name().to_string(),
            profile: self.profile.summary(),
            max_text_chars: self.config.max_text_chars,
            max_batch_size: self.config.max_batch_size,
            batch_concurrency: self.config.batch_concurrency,
            item_timeout_ms: self.config.item_timeout_ms,
        }
    }

    /// Score one ticket.
    pub async fn predict_one(&self, text: &str) -> Result<SeverityResult, PredictionError> {
        self.predict_holding(text, None).await
    }

    /// `permit`, when given, is released only once the blocking inference
    /// for this ticket has returned, even if the caller stopped waiting.
    async fn predict_holding(
        &self,
        text: &str,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Result<SeverityResult, PredictionError> {
        let text = self.validate(text)?;

        let language = self.detector.detect(text);
        let normalized = self.normalizer.normalize(text, language).await?;
        let raw = self.raw_score(normalized.text(), permit).await?;
        let calibration = calibrate(raw, &self.profile);

        debug!(
            language = %language,
            raw,
            score = calibration.score,
            category = %calibration.category,
            "Scored ticket"
        );

        Ok(SeverityResult::new(calibration, normalized))
    }

    /// Score a batch, at most `batch_concurrency` items at a time.
    ///
    /// Position `i` of the output belongs to position `i` of the input. One
    /// item failing or timing out never affects the others. Batches larger
    /// than `max_batch_size` are rejected before any item is touched.
    ///
    /// A timed-out item reports `Timeout` right away, but its concurrency
    /// slot stays taken until its embedding and scoring have actually
    /// finished, so CPU work never exceeds `batch_concurrency`.
    pub async fn predict_many(
        &self,
        texts: &[String],
        max_batch_size: usize,
    ) -> Result<Vec<BatchOutcome>, ValidationError> {
        if texts.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }
        if texts.len() > max_batch_size {
            return Err(ValidationError::BatchTooLarge {
                actual: texts.len(),
                max: max_batch_size,
            });
        }

        let semaphore = Arc::new(Semaphore::new(self.config.batch_concurrency));
        let mut tasks = JoinSet::new();

        for (index, text) in texts.iter().cloned().enumerate() {
            let predictor = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(permit) => predictor.predict_bounded(&text, permit).await,
                    Err(e) => Err(BackendError::TaskFailed(e.to_string()).into()),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<BatchOutcome>> = (0..texts.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => warn!("Batch item task failed: {}", e),
            }
        }

        let outcomes: Vec<BatchOutcome> = slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(BackendError::TaskFailed("prediction task aborted".to_string()).into())
                })
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        info!(total = outcomes.len(), failed, "Batch prediction complete");

        Ok(outcomes)
    }

    async fn predict_bounded(&self, text: &str, permit: OwnedSemaphorePermit) -> BatchOutcome {
        let limit = self.config.item_timeout();
        tokio::time::timeout(limit, self.predict_holding(text, Some(permit)))
            .await
            .unwrap_or_else(|_| Err(BackendError::Timeout(limit).into()))
    }

    fn validate<'a>(&self, text: &'a str) -> Result<&'a str, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        let chars = text.chars().count();
        if chars > self.config.max_text_chars {
            return Err(ValidationError::TooLong {
                actual: chars,
                max: self.config.max_text_chars,
            });
        }

        Ok(text)
    }

    /// Embedding and model inference are CPU bound and run off the async
    /// workers.
    async fn raw_score(
        &self,
        text: &str,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Result<f32, BackendError> {
        let provider = Arc::clone(&self.provider);
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let features = provider.embed(&text)?;
            if features.len() != model.dimension() {
                return Err(BackendError::DimensionMismatch {
                    expected: model.dimension(),
                    actual: features.len(),
                });
            }
            Ok(model.score(&features)?)
        })
        .await
        .map_err(|e| BackendError::TaskFailed(e.to_string()))?
    }
}
