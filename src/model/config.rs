use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_CONFIG_PATH: &str = "ATTRITION_CONFIG_PATH";
const ENV_MODEL_PATH: &str = "ATTRITION_MODEL_PATH";
const ENV_FEATURE_NAMES_PATH: &str = "ATTRITION_FEATURE_NAMES_PATH";
const ENV_API_KEY: &str = "API_KEY";

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_MODEL_PATH: &str = "models/model.json";
const DEFAULT_FEATURE_NAMES_PATH: &str = "models/feature_names.json";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

/// Locations of the trained model artifacts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelConfig {
    /// Serialized classifier
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
    /// JSON array with the ordered training-time feature names
    #[serde(default = "default_feature_names_path")]
    pub feature_names_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            feature_names_path: default_feature_names_path(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

fn default_feature_names_path() -> PathBuf {
    PathBuf::from(DEFAULT_FEATURE_NAMES_PATH)
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub model: ModelConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    /// Secret expected in the `X-API-Key` header; every key is rejected when unset
    pub api_key: Option<String>,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            api_key: None,
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    ///
    /// Environment variables take precedence over the YAML file.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let api_key = std::env::var(ENV_API_KEY).ok().filter(|k| !k.is_empty());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut model = Self::load_config_file(&config_path)
            .map(|cf| cf.model)
            .unwrap_or_default();

        if let Ok(path) = std::env::var(ENV_MODEL_PATH) {
            model.path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var(ENV_FEATURE_NAMES_PATH) {
            model.feature_names_path = PathBuf::from(path);
        }

        Self {
            model,
            api_key,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => parse_config_file(path, &contents),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_config_file(path: &Path, contents: &str) -> Option<ConfigFile> {
    let contents = contents.trim();
    if contents.is_empty() {
        tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
        return Some(ConfigFile::default());
    }

    match serde_yaml::from_str(contents) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Loaded configuration from file");
            Some(config)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
            None
        }
    }
}
