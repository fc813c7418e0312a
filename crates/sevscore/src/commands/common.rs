//! Shared predictor options and construction for CLI commands

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use sevscore_pipeline::builtin::builtin_artifact;
use sevscore_pipeline::{ModelArtifact, PredictorConfig, SeverityPredictor};
use sevscore_text::{
    DisabledTranslator, GlossaryTranslator, HttpTranslator, NormalizerConfig, TextNormalizer,
    Translator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Artifact filename looked up in the user data directory
pub const DEFAULT_ARTIFACT_NAME: &str = "model.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TranslatorKind {
    /// Offline Hindi IT glossary
    Glossary,
    /// LibreTranslate-compatible service (needs --translate-url)
    Http,
    /// Never translate; Hindi tickets are scored untranslated
    None,
}

#[derive(Debug, Args)]
pub struct PredictorArgs {
    /// Model artifact (default: built-in lexicon model)
    #[arg(long, global = true, env = "SEVSCORE_ARTIFACT")]
    pub artifact: Option<PathBuf>,

    /// Translator for non-English tickets
    #[arg(long, global = true, value_enum, default_value = "glossary", env = "SEVSCORE_TRANSLATOR")]
    pub translator: TranslatorKind,

    /// Base URL of the translation service
    #[arg(long, global = true, env = "SEVSCORE_TRANSLATE_URL")]
    pub translate_url: Option<String>,

    /// API key for the translation service
    #[arg(long, global = true, env = "SEVSCORE_TRANSLATE_API_KEY", hide_env_values = true)]
    pub translate_api_key: Option<String>,

    /// Translation timeout in milliseconds
    #[arg(long, global = true, default_value = "3000", env = "SEVSCORE_TRANSLATION_TIMEOUT_MS")]
    pub translation_timeout_ms: u64,

    /// Maximum ticket length in characters
    #[arg(long, global = true, default_value = "5000", env = "SEVSCORE_MAX_TEXT_CHARS")]
    pub max_text_chars: usize,

    /// Maximum tickets per batch request
    #[arg(long, global = true, default_value = "100", env = "SEVSCORE_MAX_BATCH_SIZE")]
    pub max_batch_size: usize,

    /// Batch items scored concurrently
    #[arg(long, global = true, default_value = "8", env = "SEVSCORE_BATCH_CONCURRENCY")]
    pub batch_concurrency: usize,

    /// Per-item timeout for batches in milliseconds
    #[arg(long, global = true, default_value = "30000", env = "SEVSCORE_ITEM_TIMEOUT_MS")]
    pub item_timeout_ms: u64,
}

impl PredictorArgs {
    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            translation_timeout_ms: self.translation_timeout_ms,
            ..Default::default()
        }
    }

    pub fn predictor_config(&self) -> PredictorConfig {
        PredictorConfig {
            max_text_chars: self.max_text_chars,
            max_batch_size: self.max_batch_size,
            batch_concurrency: self.batch_concurrency,
            item_timeout_ms: self.item_timeout_ms,
        }
    }

    fn translator(&self) -> Result<Arc<dyn Translator>> {
        Ok(match self.translator {
            TranslatorKind::Glossary => Arc::new(GlossaryTranslator::new()),
            TranslatorKind::None => Arc::new(DisabledTranslator),
            TranslatorKind::Http => {
                let url = self
                    .translate_url
                    .as_deref()
                    .context("--translator http requires --translate-url")?;
                let mut translator = HttpTranslator::new(
                    url,
                    self.normalizer_config().translation_timeout(),
                )?;
                if let Some(key) = &self.translate_api_key {
                    translator = translator.with_api_key(key);
                }
                Arc::new(translator)
            }
        })
    }

    /// The artifact given on the command line, else the one in the user
    /// data directory if present.
    pub fn artifact_path(&self) -> Option<PathBuf> {
        self.artifact
            .clone()
            .or_else(|| default_artifact_path().filter(|p| p.exists()))
    }

    pub fn load_artifact(&self) -> Result<ModelArtifact> {
        match self.artifact_path() {
            Some(path) => ModelArtifact::load(&path)
                .with_context(|| format!("Failed to load model artifact {}", path.display())),
            None => Ok(builtin_artifact()?),
        }
    }

    pub fn build_predictor(&self) -> Result<SeverityPredictor> {
        let normalizer = TextNormalizer::new(self.normalizer_config(), self.translator()?);
        let artifact = self.load_artifact()?;

        match self.artifact_path() {
            Some(path) => info!("Using model artifact {}", path.display()),
            None => info!("Using built-in lexicon model"),
        }

        SeverityPredictor::from_model_artifact(artifact, normalizer, self.predictor_config())
            .context("Failed to initialize severity predictor")
    }
}

/// `<data dir>/sevscore/model.json`, e.g. `~/.local/share/sevscore/model.json`.
pub fn default_artifact_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("sevscore").join(DEFAULT_ARTIFACT_NAME))
}

/// Read a whole file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        predictor: PredictorArgs,
    }

    fn parse(args: &[&str]) -> PredictorArgs {
        TestCli::try_parse_from(std::iter::once("sevscore").chain(args.iter().copied()))
            .unwrap()
            .predictor
    }

    #[test]
    fn test_defaults_match_predictor_config() {
        let args = parse(&[]);
        assert_eq!(args.predictor_config(), PredictorConfig::default());
        assert_eq!(args.translator, TranslatorKind::Glossary);
        assert_eq!(args.normalizer_config(), NormalizerConfig::default());
    }

    #[test]
    fn test_http_translator_requires_url() {
        let args = parse(&["--translator", "http"]);
        let err = args.translator().err().unwrap();
        assert!(err.to_string().contains("--translate-url"));
    }

    #[test]
    fn test_explicit_artifact_path() {
        let args = parse(&["--artifact", "/tmp/severity.json"]);
        assert_eq!(args.artifact_path(), Some(PathBuf::from("/tmp/severity.json")));
    }

    #[test]
    fn test_build_predictor_from_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        builtin_artifact().unwrap().save(&path).unwrap();

        let args = parse(&["--artifact", path.to_str().unwrap(), "--max-batch-size", "5"]);
        let predictor = args.build_predictor().unwrap();
        assert_eq!(predictor.config().max_batch_size, 5);
    }

    #[test]
    fn test_missing_artifact_fails() {
        let args = parse(&["--artifact", "/nonexistent/sevscore/model.json"]);
        let err = args.build_predictor().err().unwrap();
        assert!(err.to_string().contains("Failed to load model artifact"));
    }

    #[test]
    fn test_read_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.txt");
        std::fs::write(&path, "server down\n").unwrap();
        assert_eq!(read_input(&path).unwrap(), "server down\n");
    }
}
