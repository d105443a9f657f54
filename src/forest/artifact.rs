//! Versioned model artifact: the frozen output of offline training.
//!
//! The artifact records the exact feature schema it was trained on.
//! `load()` validates that schema against [`crate::types::FEATURE_NAMES`]
//! and refuses to serve on any mismatch — a model trained on different
//! columns must never answer diagnostic requests.
//!
//! Saves are atomic (write temp file, then rename) so a crash mid-write
//! never leaves a truncated artifact behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::forest::RandomForest;
use crate::forest::training::{EvalReport, ForestParams};
use crate::types::{FEATURE_NAMES, NUM_FEATURES};

/// Artifact format version, bumped on incompatible layout changes.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read model artifact at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("artifact schema version mismatch: file has v{found}, expected v{expected}")]
    SchemaVersion { found: u32, expected: u32 },

    #[error("artifact feature schema mismatch: expected {expected:?}, found {found:?}")]
    FeatureSchema {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("artifact contains no trees")]
    EmptyForest,
}

/// Provenance recorded alongside the trained forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// When training finished.
    pub trained_at: DateTime<Utc>,
    /// Rows in the training partition.
    pub training_rows: usize,
    /// Hold-out accuracy reported at publish time.
    pub test_accuracy: f64,
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Seed the forest was fitted with.
    pub seed: u64,
}

/// The persisted, frozen classifier. Loaded once at startup and shared
/// read-only by every request; never mutated at inference time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub schema_version: u32,
    /// Feature names in training order — must match [`FEATURE_NAMES`].
    pub feature_names: Vec<String>,
    pub forest: RandomForest,
    pub metadata: ArtifactMetadata,
}

impl ForestArtifact {
    /// Package a freshly trained forest with its provenance.
    pub fn new(
        forest: RandomForest,
        params: &ForestParams,
        eval: &EvalReport,
        training_rows: usize,
    ) -> Self {
        let n_trees = forest.num_trees();
        Self {
            schema_version: SCHEMA_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            forest,
            metadata: ArtifactMetadata {
                trained_at: Utc::now(),
                training_rows,
                test_accuracy: eval.accuracy,
                n_trees,
                seed: params.seed,
            },
        }
    }

    /// Predict the raw label for a feature vector.
    pub fn predict_label(&self, features: &[f64; NUM_FEATURES]) -> u8 {
        self.forest.predict_label(features)
    }

    /// Validate version, feature schema, and non-emptiness.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ArtifactError::SchemaVersion {
                found: self.schema_version,
                expected: SCHEMA_VERSION,
            });
        }

        let expected: Vec<String> = FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect();
        if self.feature_names != expected {
            return Err(ArtifactError::FeatureSchema {
                expected,
                found: self.feature_names.clone(),
            });
        }

        if self.forest.trees.is_empty() {
            return Err(ArtifactError::EmptyForest);
        }

        Ok(())
    }

    /// Save to disk atomically (write temp file, then rename).
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let json = serde_json::to_vec(self)?;

        let io_err = |source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        };

        let tmp_path = path.with_extension("json.tmp");
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        std::fs::write(&tmp_path, &json).map_err(io_err)?;
        std::fs::rename(&tmp_path, path).map_err(io_err)?;

        tracing::info!(
            path = %path.display(),
            trees = self.metadata.n_trees,
            accuracy = self.metadata.test_accuracy,
            "Saved model artifact"
        );
        Ok(())
    }

    /// Load and validate an artifact. Any failure here is fatal for the
    /// serving path — the system refuses to diagnose without a valid model.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let data = std::fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: Self = serde_json::from_slice(&data)?;
        artifact.validate()?;

        tracing::info!(
            path = %path.display(),
            trees = artifact.metadata.n_trees,
            trained_at = %artifact.metadata.trained_at,
            accuracy = artifact.metadata.test_accuracy,
            "Loaded model artifact"
        );
        Ok(artifact)
    }
}
