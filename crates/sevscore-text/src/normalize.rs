//! Language-aware cleaning of ticket text ahead of embedding.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::language::Language;
use crate::lexicon::{IT_TERM_REWRITES, is_english_stopword, is_hindi_stopword, is_it_term};
use crate::translate::{DisabledTranslator, TranslationError, TranslationStatus, Translator};

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("html pattern compiles"));
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:https?://|www\.)\S+").expect("url pattern compiles"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));
// Letters, combining marks (Devanagari vowel signs) and digits survive.
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}\s]+").expect("noise pattern compiles"));
static REWRITES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    IT_TERM_REWRITES
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("rewrite pattern compiles"),
                *replacement,
            )
        })
        .collect()
});

/// Default bound on a single translation call.
pub const DEFAULT_TRANSLATION_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Drop language-specific function words (IT terms are always kept).
    pub remove_stopwords: bool,
    /// Rewrite IT abbreviations and synonyms to one spelling.
    pub canonicalize_it_terms: bool,
    /// Upper bound on one translation call, in milliseconds.
    pub translation_timeout_ms: u64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
            canonicalize_it_terms: true,
            translation_timeout_ms: DEFAULT_TRANSLATION_TIMEOUT_MS,
        }
    }
}

impl NormalizerConfig {
    pub fn translation_timeout(&self) -> Duration {
        Duration::from_millis(self.translation_timeout_ms)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("text is empty after normalization")]
    EmptyAfterNormalization,
}

/// Cleaned ticket text together with the language detected on the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedText {
    text: String,
    language: Language,
    translation: TranslationStatus,
}

impl NormalizedText {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn translation(&self) -> &TranslationStatus {
        &self.translation
    }

    pub fn into_parts(self) -> (String, Language, TranslationStatus) {
        (self.text, self.language, self.translation)
    }
}

pub struct TextNormalizer {
    config: NormalizerConfig,
    translator: Arc<dyn Translator>,
}

impl TextNormalizer {
    pub fn new(config: NormalizerConfig, translator: Arc<dyn Translator>) -> Self {
        Self { config, translator }
    }

    /// Normalizer that never translates; Hindi tickets are always degraded.
    pub fn without_translation(config: NormalizerConfig) -> Self {
        Self::new(config, Arc::new(DisabledTranslator))
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn translator_name(&self) -> &str {
        self.translator.name()
    }

    /// Clean `text` for embedding, translating non-English input first.
    ///
    /// Translation failures never fail the call: the untranslated text is
    /// cleaned instead and the result carries a `Degraded` status.
    pub async fn normalize(
        &self,
        text: &str,
        language: Language,
    ) -> Result<NormalizedText, NormalizeError> {
        let stripped = collapse_whitespace(&strip_markup(text));

        let (working, working_language, translation) = if language.needs_translation() {
            match self.translate_bounded(&stripped, language).await {
                Ok(translated) => (
                    translated,
                    Language::English,
                    TranslationStatus::Translated {
                        translator: self.translator.name().to_string(),
                    },
                ),
                Err(e) => {
                    warn!(
                        language = %language,
                        translator = self.translator.name(),
                        error = %e,
                        "Translation failed, continuing with untranslated text"
                    );
                    (
                        stripped,
                        language,
                        TranslationStatus::Degraded {
                            reason: e.to_string(),
                        },
                    )
                }
            }
        } else {
            (stripped, language, TranslationStatus::NotRequired)
        };

        let cleaned = self.clean(&working, working_language);
        if cleaned.is_empty() {
            debug!(language = %language, "Nothing left after cleaning");
            return Err(NormalizeError::EmptyAfterNormalization);
        }

        Ok(NormalizedText {
            text: cleaned,
            language,
            translation,
        })
    }

    async fn translate_bounded(
        &self,
        text: &str,
        language: Language,
    ) -> Result<String, TranslationError> {
        let timeout = self.config.translation_timeout();
        let translated = tokio::time::timeout(timeout, self.translator.translate(text, language))
            .await
            .map_err(|_| TranslationError::Timeout(timeout))??;

        if translated.trim().is_empty() {
            return Err(TranslationError::Empty);
        }
        Ok(translated)
    }

    /// Deterministic cleaning without translation. `Unknown` is cleaned as
    /// English.
    pub fn clean(&self, text: &str, language: Language) -> String {
        let mut text = strip_markup(text).to_lowercase();

        if self.config.canonicalize_it_terms {
            for (pattern, replacement) in REWRITES.iter() {
                text = pattern.replace_all(&text, *replacement).into_owned();
            }
        }

        let text = NOISE.replace_all(&text, " ");

        text.split_whitespace()
            .filter(|token| !self.config.remove_stopwords || !is_stopword(token, language))
            .filter(|token| token.chars().count() >= 2 || token.chars().all(char::is_numeric))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn is_stopword(token: &str, language: Language) -> bool {
    match language {
        Language::Hindi => is_hindi_stopword(token),
        Language::English | Language::Unknown => is_english_stopword(token) && !is_it_term(token),
    }
}

fn strip_markup(text: &str) -> String {
    let text = HTML_TAG.replace_all(text, " ");
    let text = URL.replace_all(&text, " ");
    EMAIL.replace_all(&text, " ").into_owned()
}

/// Collapse runs of Unicode whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
