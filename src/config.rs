//! Memloom configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main Memloom configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemloomConfig {
    /// Identity of the single graph owner
    #[serde(default)]
    pub user: UserConfig,

    /// Graph persistence configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Language-model collaborator configuration
    #[serde(default)]
    pub model: ModelConfig,
}

impl MemloomConfig {
    /// Load configuration from a TOML file, or fall back to defaults when no
    /// path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
            }
            None => Ok(Self::default()),
        }
    }
}

/// Identity of the graph owner. The graph holds memories for exactly one
/// user; this id names its central node for the store's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Node id of the user in the knowledge graph
    pub id: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: "user_main".to_string(),
        }
    }
}

/// Graph persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File the knowledge graph is serialized to
    pub graph_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            graph_path: PathBuf::from("data/memory_graph.json"),
        }
    }
}

/// Language-model collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable holding the API credential
    pub api_key_env: String,

    /// API endpoint base URL
    pub endpoint: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl ModelConfig {
    /// Resolve the API credential from the environment.
    ///
    /// A missing or empty credential is a fatal startup condition.
    pub fn resolve_api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(Error::Config(format!(
                "{} not set; add the API credential to the environment",
                self.api_key_env
            ))),
        }
    }
}
