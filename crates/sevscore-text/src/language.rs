use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use crate::lexicon;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:https?://|www\.)\S+").expect("url pattern compiles"));
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+").expect("email pattern compiles"));

/// Share of letters that must be Devanagari for text to count as Hindi.
pub const HINDI_SCRIPT_SHARE: f32 = 0.5;

/// Share of Latin-script tokens that must be known English words.
pub const ENGLISH_VOCABULARY_SHARE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Language {
    /// ISO 639-1 code, or `unknown`.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Unknown => "unknown",
        }
    }

    /// Languages that are translated into English before cleaning.
    /// `Unknown` is treated as English.
    pub fn needs_translation(&self) -> bool {
        matches!(self, Language::Hindi)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a detection, with the share of evidence that supported it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub language: Language,
    pub confidence: f32,
}

impl Detection {
    fn unknown() -> Self {
        Self {
            language: Language::Unknown,
            confidence: 0.0,
        }
    }
}

/// Script and vocabulary based detector for English and Hindi ticket text.
///
/// Anything that is neither confidently English nor Hindi is `Unknown`;
/// detection never fails.
#[derive(Debug, Clone, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> Language {
        self.detect_scored(text).language
    }

    pub fn detect_scored(&self, text: &str) -> Detection {
        let stripped = strip_for_detection(text);

        let mut devanagari = 0usize;
        let mut latin = 0usize;
        let mut letters = 0usize;
        for c in stripped.chars().filter(|c| c.is_alphabetic()) {
            letters += 1;
            if is_devanagari(c) {
                devanagari += 1;
            } else if c.is_ascii_alphabetic() {
                latin += 1;
            }
        }

        if letters == 0 {
            debug!("No letters to detect a language from");
            return Detection::unknown();
        }

        let devanagari_share = devanagari as f32 / letters as f32;
        if devanagari_share >= HINDI_SCRIPT_SHARE {
            return Detection {
                language: Language::Hindi,
                confidence: devanagari_share,
            };
        }

        let latin_share = latin as f32 / letters as f32;
        if latin_share < 0.5 {
            return Detection::unknown();
        }

        let tokens: Vec<String> = stripped
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_ascii_lowercase())
            .collect();
        if tokens.is_empty() {
            return Detection::unknown();
        }

        let known = tokens
            .iter()
            .filter(|t| lexicon::is_english_word(t))
            .count();
        let vocabulary_share = known as f32 / tokens.len() as f32;

        if known > 0 && vocabulary_share >= ENGLISH_VOCABULARY_SHARE {
            Detection {
                language: Language::English,
                confidence: (latin_share * vocabulary_share).sqrt(),
            }
        } else {
            debug!(
                tokens = tokens.len(),
                known, "Latin script without enough English vocabulary"
            );
            Detection::unknown()
        }
    }

    pub fn is_hindi(&self, text: &str) -> bool {
        self.detect(text) == Language::Hindi
    }

    pub fn is_english(&self, text: &str) -> bool {
        self.detect(text) == Language::English
    }
}

pub(crate) fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

fn strip_for_detection(text: &str) -> String {
    let without_urls = URL_PATTERN.replace_all(text, " ");
    EMAIL_PATTERN.replace_all(&without_urls, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_english() {
        let detector = LanguageDetector::new();
        assert_eq!(
            detector.detect("All servers are down, complete system failure"),
            Language::English
        );
        assert_eq!(detector.detect("User needs password reset"), Language::English);
    }

    #[test]
    fn test_detect_hindi() {
        let detector = LanguageDetector::new();
        let detection = detector.detect_scored("सर्वर डाउन है और कोई भी काम नहीं कर सकता");
        assert_eq!(detection.language, Language::Hindi);
        assert!(detection.confidence > 0.9);
        assert!(detector.is_hindi("सर्वर डाउन है"));
    }

    #[test]
    fn test_mixed_script_majority_wins() {
        let detector = LanguageDetector::new();
        // Mostly Devanagari with an English product name
        assert_eq!(detector.detect("Outlook में ईमेल नहीं आ रहा है"), Language::Hindi);
    }

    #[test]
    fn test_other_languages_are_unknown() {
        let detector = LanguageDetector::new();
        assert_eq!(detector.detect("Сервер не работает"), Language::Unknown);
        assert_eq!(detector.detect("Le serveur est en panne totale"), Language::Unknown);
        assert_eq!(detector.detect("12345 !!! ???"), Language::Unknown);
    }

    #[test]
    fn test_urls_and_emails_do_not_vote() {
        let detector = LanguageDetector::new();
        let text = "सर्वर डाउन https://status.example.com/incidents/very/long/path admin@example.com";
        assert_eq!(detector.detect(text), Language::Hindi);
    }

    #[test]
    fn test_language_codes() {
        for lang in [Language::English, Language::Hindi, Language::Unknown] {
            assert_eq!(lang.to_string(), lang.code());
        }
        assert!(Language::Hindi.needs_translation());
        assert!(!Language::Unknown.needs_translation());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Language::Hindi).unwrap();
        assert_eq!(json, "\"hi\"");
        let parsed: Language = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(parsed, Language::Unknown);
    }
}
