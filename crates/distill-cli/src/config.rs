//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use distill_domain::ModelSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Cache store settings
    #[serde(default)]
    pub store: StoreSettings,

    /// Extraction provider settings
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Class registry: class name to its required fields
    #[serde(default = "default_classes")]
    pub classes: HashMap<String, ClassSpec>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Cache store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// SQLite database path
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

/// Extraction provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Provider endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,
}

/// One registered class: the schema records must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSpec {
    /// Top-level fields every extracted record must contain
    #[serde(default)]
    pub required_fields: Vec<String>,
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".distill").join("config.toml"))
    }

    /// Load configuration from the given path, the default path, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Resolve a class name against the registry.
    pub fn model_spec(&self, class: &str) -> Result<ModelSpec> {
        let class_spec = self
            .classes
            .get(class)
            .ok_or_else(|| CliError::UnknownClass(class.to_string()))?;

        Ok(ModelSpec::new(class).with_required_fields(class_spec.required_fields.clone()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            store: StoreSettings::default(),
            provider: ProviderSettings::default(),
            classes: default_classes(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".distill")
        .join("cache.db")
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama2".to_string()
}

fn default_classes() -> HashMap<String, ClassSpec> {
    let mut classes = HashMap::new();
    classes.insert(
        "ReviewedOpportunity".to_string(),
        ClassSpec {
            required_fields: vec![
                "title".to_string(),
                "customer".to_string(),
                "status".to_string(),
                "summary".to_string(),
            ],
        },
    );
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_registry() {
        let config = Config::default();
        assert!(config.classes.contains_key("ReviewedOpportunity"));
    }

    #[test]
    fn test_model_spec_resolution() {
        let config = Config::default();
        let spec = config.model_spec("ReviewedOpportunity").unwrap();
        assert_eq!(spec.name, "ReviewedOpportunity");
        assert!(spec.required_fields.contains(&"customer".to_string()));
    }

    #[test]
    fn test_unknown_class_is_error() {
        let config = Config::default();
        let result = config.model_spec("NoSuchClass");
        assert!(matches!(result, Err(CliError::UnknownClass(_))));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.provider.endpoint, config.provider.endpoint);
        assert_eq!(parsed.classes.len(), config.classes.len());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[provider]\nendpoint = \"http://example:1234\"\nmodel = \"mistral\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.provider.endpoint, "http://example:1234");
        assert_eq!(config.provider.model, "mistral");
        // Missing sections fall back to defaults
        assert!(config.settings.color);
    }
}
