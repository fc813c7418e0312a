//! Translation of non-English tickets into English.
//!
//! Translation is best effort. Callers treat any `TranslationError` as a
//! signal to continue with the untranslated text and record a
//! [`TranslationStatus::Degraded`] marker.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::language::Language;
use crate::lexicon::glossary_lookup;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("translation service unavailable: {0}")]
    Unavailable(String),
    #[error("translation timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed translation response: {0}")]
    Malformed(String),
    #[error("translation returned empty text")]
    Empty,
    #[error("no glossary coverage for input")]
    NoCoverage,
    #[error("cannot translate from language '{0}'")]
    Unsupported(Language),
    #[error("translation is disabled")]
    Disabled,
}

/// How the working text of a ticket was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranslationStatus {
    /// The ticket was already in the working language.
    NotRequired,
    /// The ticket was translated by the named translator.
    Translated { translator: String },
    /// Translation failed; the cleaned original text was used instead.
    Degraded { reason: String },
}

impl TranslationStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, TranslationStatus::Degraded { .. })
    }
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` into English.
    async fn translate(&self, text: &str, source: Language) -> Result<String, TranslationError>;

    fn name(&self) -> &str;
}

/// Translator that always refuses, forcing the untranslated path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    async fn translate(&self, _text: &str, _source: Language) -> Result<String, TranslationError> {
        Err(TranslationError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Offline word-for-word Hindi to English translator over the built-in
/// IT glossary. Unknown words are kept as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlossaryTranslator;

impl GlossaryTranslator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Translator for GlossaryTranslator {
    async fn translate(&self, text: &str, source: Language) -> Result<String, TranslationError> {
        match source {
            Language::English => return Ok(text.to_string()),
            Language::Unknown => return Err(TranslationError::Unsupported(source)),
            Language::Hindi => {}
        }

        let mut known = 0usize;
        let words: Vec<String> = text
            .split_whitespace()
            .map(|token| {
                let core = token.trim_matches(|c: char| {
                    c.is_ascii_punctuation() || matches!(c, '।' | '॥')
                });
                match glossary_lookup(core) {
                    Some(english) => {
                        known += 1;
                        english.to_string()
                    }
                    None => token.to_string(),
                }
            })
            .collect();

        if known == 0 {
            return Err(TranslationError::NoCoverage);
        }

        debug!(known, total = words.len(), "Glossary translation");
        Ok(words.join(" "))
    }

    fn name(&self) -> &str {
        "glossary"
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// Client for a LibreTranslate-compatible `POST /translate` endpoint.
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpTranslator {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TranslationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
            timeout,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, source: Language) -> Result<String, TranslationError> {
        match source {
            Language::English => return Ok(text.to_string()),
            Language::Unknown => return Err(TranslationError::Unsupported(source)),
            Language::Hindi => {}
        }

        let url = format!("{}/translate", self.endpoint.trim_end_matches('/'));
        let request = TranslateRequest {
            q: text,
            source: source.code(),
            target: Language::English.code(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::Timeout(self.timeout)
                } else {
                    TranslationError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Unavailable(format!("HTTP {status}")));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Malformed(e.to_string()))?;

        if body.translated_text.trim().is_empty() {
            return Err(TranslationError::Empty);
        }

        Ok(body.translated_text)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_glossary_translates_known_words() {
        let translator = GlossaryTranslator::new();
        let out = translator
            .translate("सर्वर डाउन है।", Language::Hindi)
            .await
            .unwrap();
        assert_eq!(out, "server down is");
    }

    #[tokio::test]
    async fn test_glossary_keeps_unknown_words() {
        let translator = GlossaryTranslator::new();
        let out = translator
            .translate("सर्वर अचानक डाउन", Language::Hindi)
            .await
            .unwrap();
        assert_eq!(out, "server अचानक down");
    }

    #[tokio::test]
    async fn test_glossary_without_coverage_fails() {
        let translator = GlossaryTranslator::new();
        let err = translator
            .translate("अचानक सब रुक गया", Language::Hindi)
            .await
            .unwrap_err();
        assert_eq!(err, TranslationError::NoCoverage);
    }

    #[tokio::test]
    async fn test_unknown_source_is_unsupported() {
        let translator = GlossaryTranslator::new();
        let err = translator
            .translate("texte", Language::Unknown)
            .await
            .unwrap_err();
        assert_eq!(err, TranslationError::Unsupported(Language::Unknown));
    }

    #[tokio::test]
    async fn test_disabled_translator() {
        let err = DisabledTranslator
            .translate("सर्वर", Language::Hindi)
            .await
            .unwrap_err();
        assert_eq!(err, TranslationError::Disabled);
    }

    #[tokio::test]
    async fn test_http_translator_unreachable_endpoint() {
        // Port 9 (discard) on localhost is closed in test environments
        let translator =
            HttpTranslator::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = translator
            .translate("सर्वर डाउन", Language::Hindi)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TranslationError::Unavailable(_) | TranslationError::Timeout(_)
        ));
    }

    #[test]
    fn test_status_serialization() {
        let status = TranslationStatus::Degraded {
            reason: "translation is disabled".to_string(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "degraded");
        assert!(status.is_degraded());
        assert!(!TranslationStatus::NotRequired.is_degraded());
    }
}
