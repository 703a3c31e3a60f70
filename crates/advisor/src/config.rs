//! Advisor configuration

use advisor_lib::AssetPaths;
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Optional config file, layered under environment variables
const CONFIG_FILE: &str = "config/advisor";

/// Advisor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorConfig {
    /// Interface to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Serialized classifier (`.json` decision tree or `.onnx`)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Serialized label encoders
    #[serde(default = "default_encoder_path")]
    pub encoder_path: PathBuf,

    /// Expected SHA-256 of the classifier artifact
    #[serde(default)]
    pub model_sha256: Option<String>,

    /// Expected SHA-256 of the encoder artifact
    #[serde(default)]
    pub encoder_sha256: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_model_path() -> PathBuf {
    PathBuf::from("assets/decision_tree_model.json")
}

fn default_encoder_path() -> PathBuf {
    PathBuf::from("assets/label_encoders.json")
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: default_model_path(),
            encoder_path: default_encoder_path(),
            model_sha256: None,
            encoder_sha256: None,
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from environment and config file
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix("ADVISOR").try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths {
            model_path: self.model_path.clone(),
            encoder_path: self.encoder_path.clone(),
            model_sha256: self.model_sha256.clone(),
            encoder_sha256: self.encoder_sha256.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.model_path, PathBuf::from("assets/decision_tree_model.json"));
        assert!(config.model_sha256.is_none());
    }

    #[test]
    fn test_serde_defaults_fill_missing_keys() {
        let config: AdvisorConfig = serde_json::from_str(r#"{"port": 8080}"#).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.encoder_path, PathBuf::from("assets/label_encoders.json"));
    }

    #[test]
    fn test_asset_paths_carry_checksums() {
        let config = AdvisorConfig {
            model_sha256: Some("abc".to_string()),
            ..AdvisorConfig::default()
        };
        let paths = config.asset_paths();
        assert_eq!(paths.model_sha256.as_deref(), Some("abc"));
        assert_eq!(paths.encoder_path, config.encoder_path);
    }
}
