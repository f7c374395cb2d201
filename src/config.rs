//! Settings: an optional YAML file merged with environment overrides.
//!
//! Endpoints and model name come from the file when one is given; the
//! environment always wins so deployments can override without editing
//! files. Secrets (API keys) are env-only and never read from YAML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{error, info};

#[derive(Debug, Clone, Deserialize)]
pub struct LlamaSettings {
    #[serde(default = "default_llama_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for LlamaSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llama_endpoint(),
            model: default_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStoreSettings {
    #[serde(default = "default_store_endpoint")]
    pub endpoint: String,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for ObjectStoreSettings {
    fn default() -> Self {
        Self {
            endpoint: default_store_endpoint(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSettings {
    #[serde(default = "default_index_endpoint")]
    pub endpoint: String,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            endpoint: default_index_endpoint(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub llama: LlamaSettings,
    #[serde(default)]
    pub object_store: ObjectStoreSettings,
    #[serde(default)]
    pub index: IndexSettings,
}

fn default_llama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_store_endpoint() -> String {
    "http://localhost:9000".to_string()
}

fn default_index_endpoint() -> String {
    "http://localhost:8081".to_string()
}

/// Loads settings from an optional YAML file, then applies env overrides.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => {
            info!(config_path = ?path, "Loading configuration from file");
            let content = fs::read_to_string(path).with_context(|| {
                error!(config_path = ?path, "Failed to read config file");
                format!("Failed to read config file {path:?}")
            })?;
            serde_yaml::from_str(&content).with_context(|| {
                error!(config_path = ?path, "Failed to parse config YAML");
                "Failed to parse config YAML".to_string()
            })?
        }
        None => Settings::default(),
    };

    if let Ok(endpoint) = std::env::var("LLAMA_ENDPOINT") {
        settings.llama.endpoint = endpoint;
    }
    if let Ok(model) = std::env::var("LLAMA_MODEL") {
        settings.llama.model = model;
    }
    if let Ok(endpoint) = std::env::var("OBJECT_STORE_ENDPOINT") {
        settings.object_store.endpoint = endpoint;
    }
    if let Ok(key) = std::env::var("OBJECT_STORE_API_KEY") {
        settings.object_store.api_key = Some(key);
    }
    if let Ok(endpoint) = std::env::var("DOC_INDEX_ENDPOINT") {
        settings.index.endpoint = endpoint;
    }
    if let Ok(key) = std::env::var("DOC_INDEX_API_KEY") {
        settings.index.api_key = Some(key);
    }

    info!(
        llama_endpoint = %settings.llama.endpoint,
        model = %settings.llama.model,
        object_store = %settings.object_store.endpoint,
        index = %settings.index.endpoint,
        "Configuration loaded"
    );
    Ok(settings)
}
