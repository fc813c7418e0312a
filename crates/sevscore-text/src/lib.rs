//! Language detection, translation and cleaning of ticket text.

pub mod language;
pub mod lexicon;
pub mod normalize;
pub mod translate;

pub use language::{Detection, Language, LanguageDetector};
pub use normalize::{
    NormalizeError, NormalizedText, NormalizerConfig, TextNormalizer, collapse_whitespace,
};
pub use translate::{
    DisabledTranslator, GlossaryTranslator, HttpTranslator, TranslationError, TranslationStatus,
    Translator,
};
