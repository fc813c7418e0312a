//! JSON model artifacts: embedding config, linear weights and the
//! calibration profile, loaded once at startup.

use serde::{Deserialize, Serialize};
use sevscore_embeddings::EmbeddingConfig;
use sevscore_scoring::{CalibrationProfile, LinearSeverityModel};
use std::path::Path;
use tracing::info;

use crate::error::ArtifactError;

pub const ARTIFACT_VERSION: u32 = 1;

fn default_version() -> u32 {
    ARTIFACT_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    pub model: LinearSeverityModel,
    pub profile: CalibrationProfile,
}

impl ModelArtifact {
    pub fn new(
        embedding: EmbeddingConfig,
        model: LinearSeverityModel,
        profile: CalibrationProfile,
    ) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            embedding,
            model,
            profile,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let artifact: Self =
            serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if artifact.version != ARTIFACT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: artifact.version,
                expected: ARTIFACT_VERSION,
            });
        }

        info!(
            path = %path.display(),
            original_min = artifact.profile.original_min(),
            original_max = artifact.profile.original_max(),
            "Loaded model artifact"
        );
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let io_err = |source: std::io::Error| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(ArtifactError::Serialize)?;
        std::fs::write(path, json).map_err(io_err)?;

        info!(path = %path.display(), "Saved model artifact");
        Ok(())
    }

    /// Same artifact with a refitted calibration profile.
    pub fn with_profile(mut self, profile: CalibrationProfile) -> Self {
        self.profile = profile;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ModelArtifact {
        ModelArtifact::new(
            EmbeddingConfig::Hashed { dimension: 4 },
            LinearSeverityModel::new(vec![1.0, 0.0, -1.0, 2.0], 0.5).unwrap(),
            CalibrationProfile::new(-3.0, 9.0).unwrap(),
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models").join("severity.json");

        sample().save(&path).unwrap();
        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ModelArtifact::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    #[test]
    fn test_degenerate_profile_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"model":{"weights":[1.0]},"profile":{"original_min":2.0,"original_max":2.0}}"#,
        )
        .unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn test_unsupported_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("future.json");
        std::fs::write(
            &path,
            r#"{"version":7,"model":{"weights":[1.0]},"profile":{"original_min":0.0,"original_max":1.0}}"#,
        )
        .unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::UnsupportedVersion {
                found: 7,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_embedding_defaults_to_hashed() {
        let artifact: ModelArtifact = serde_json::from_str(
            r#"{"model":{"weights":[1.0]},"profile":{"original_min":0.0,"original_max":1.0}}"#,
        )
        .unwrap();
        assert_eq!(artifact.embedding, EmbeddingConfig::default());
        assert_eq!(artifact.version, ARTIFACT_VERSION);
    }

    #[test]
    fn test_with_profile() {
        let profile = CalibrationProfile::new(0.0, 1.0).unwrap();
        let artifact = sample().with_profile(profile);
        assert_eq!(artifact.profile, profile);
    }
}
