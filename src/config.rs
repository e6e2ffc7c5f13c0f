//! Configuration handling.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::gat::{ForwardContext, ModelConfig};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Run configuration
    #[serde(default)]
    pub run: RunConfig,
}

impl Config {
    /// Load configuration from TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.model.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Forward-pass settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Run with dropout active
    pub training: bool,
    /// Dropout seed when training; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            training: false,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Forward context matching these settings
    pub fn context(&self) -> ForwardContext {
        match (self.training, self.seed) {
            (false, _) => ForwardContext::inference(),
            (true, Some(seed)) => ForwardContext::training(seed),
            (true, None) => ForwardContext::training_from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gat::{LayerKind, Mode};

    #[test]
    fn test_default_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gat.toml");

        let config = Config::default();
        config.to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [model]
            num_of_layers = 2
            num_heads_per_layer = [1, 1]
            num_features_per_layer = [16, 8, 4]
            layer_kind = "edge_index"
            "#,
        )
        .unwrap();

        assert_eq!(config.model.num_of_layers, 2);
        assert_eq!(config.model.dropout, 0.6);
        assert_eq!(config.model.layer_kind, LayerKind::EdgeIndex);
        assert!(!config.run.training);
        assert!(!config.run.context().is_training());
    }

    #[test]
    fn test_invalid_model_rejected() {
        let err = Config::from_toml(
            r#"
            [model]
            num_of_layers = 0
            "#,
        )
        .unwrap_err();
        assert!(err.is_config_error());

        assert!(Config::from_toml("model = 3").is_err());
    }

    #[test]
    fn test_run_context_modes() {
        let seeded = RunConfig { training: true, seed: Some(4) };
        assert_eq!(seeded.context().mode(), Mode::Training);

        let unseeded = Config::from_toml("[run]\ntraining = true\n").unwrap();
        assert_eq!(unseeded.run.seed, None);
        assert_eq!(unseeded.run.context().mode(), Mode::Training);

        assert_eq!(RunConfig::default().context().mode(), Mode::Inference);
    }
}
