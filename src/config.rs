//! Service configuration loaded from TOML.
//!
//! Loading order:
//! 1. `SENTINEL_CONFIG` environment variable (path to a TOML file)
//! 2. `sentinel.toml` in the current working directory
//! 3. Built-in defaults
//!
//! CLI flags override individual fields after loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at the config file.
pub const CONFIG_ENV_VAR: &str = "SENTINEL_CONFIG";

/// Default config file name in the working directory.
pub const CONFIG_FILE: &str = "sentinel.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub training: TrainingConfig,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the HTTP API.
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the trained forest artifact.
    pub artifact_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("compressor_model.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of trees in the ensemble.
    pub trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Minimum samples required to attempt a split.
    pub min_samples_split: usize,
    /// Fraction of rows held out for evaluation.
    pub test_fraction: f64,
    /// RNG seed for the split and the bootstrap.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            trees: 200,
            max_depth: 12,
            min_samples_split: 4,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

impl SentinelConfig {
    /// Load configuration following the documented order.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            tracing::info!(path = %path.display(), "Loading config from {CONFIG_ENV_VAR}");
            return Self::from_file(&path);
        }

        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            tracing::info!(path = %local.display(), "Loading config from working directory");
            return Self::from_file(local);
        }

        tracing::info!("No config file found; using built-in defaults");
        Ok(Self::default())
    }

    /// Parse one TOML file. Unknown keys are ignored; missing sections fall
    /// back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("cannot parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a usable system.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.training.trees > 0, "training.trees must be positive");
        anyhow::ensure!(
            self.training.max_depth > 0,
            "training.max_depth must be positive"
        );
        anyhow::ensure!(
            (0.0..1.0).contains(&self.training.test_fraction),
            "training.test_fraction must be in [0, 1)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SentinelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.training.trees, 200);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[server]\naddr = \"127.0.0.1:9000\"").unwrap();

        let config = SentinelConfig::from_file(&path).unwrap();
        assert_eq!(config.server.addr, "127.0.0.1:9000");
        assert_eq!(config.training.seed, 42);
    }

    #[test]
    fn test_invalid_training_section_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[training]\ntest_fraction = 1.5").unwrap();

        assert!(SentinelConfig::from_file(&path).is_err());
    }
}
