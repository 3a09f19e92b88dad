//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub claude: ClaudeConfig,

    #[serde(default)]
    pub sync: SyncConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Location of the external session host's on-disk layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaudeConfig {
    /// Root holding one directory per project, one JSONL file per session
    #[serde(default = "default_projects_dir")]
    pub projects_dir: String,
}

/// Transcript synchronizer tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Skip subagent transcript files (agent-*.jsonl) during discovery
    #[serde(default = "default_enabled")]
    pub skip_subagents: bool,
}

fn default_database_path() -> String {
    "~/.claude/vault.db".to_string()
}

fn default_projects_dir() -> String {
    "~/.claude/projects".to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            skip_subagents: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./vault.yaml (current directory)
    /// 3. ~/.config/claude-vault/vault.yaml
    pub fn load(path: &str) -> Result<Self> {
        let mut search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "vault.yaml".to_string(),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(
                config_dir
                    .join("claude-vault/vault.yaml")
                    .to_string_lossy()
                    .to_string(),
            );
        }

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.database.path).to_string();
        PathBuf::from(expanded)
    }

    /// Get the session storage root, expanding ~ to home directory
    pub fn projects_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.claude.projects_dir).to_string();
        PathBuf::from(expanded)
    }
}
