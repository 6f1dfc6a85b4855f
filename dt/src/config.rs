//! devtalk configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main devtalk configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Planner (LLM) provider configuration
    pub planner: PlannerConfig,

    /// Session limits and storage
    pub session: SessionConfig,

    /// Progress tracker document
    pub progress: ProgressConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that required environment variables are set. Call this early
    /// in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.planner.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Planner API key not found. Set the {} environment variable.",
                self.planner.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .devtalk.yml
        let local_config = PathBuf::from(".devtalk.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/devtalk/devtalk.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("devtalk").join("devtalk.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Planner provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Provider name (currently only "anthropic" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl PlannerConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .map_err(|_| eyre::eyre!("environment variable {} is not set", self.api_key_env))
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 300_000,
        }
    }
}

/// Session limits and storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory holding session documents
    #[serde(rename = "sessions-dir")]
    pub sessions_dir: PathBuf,

    /// Soft conversation-turn limit; past it an advisory is injected
    #[serde(rename = "max-turns")]
    pub max_turns: u32,

    /// Hard step ceiling; reaching it terminates the loop
    #[serde(rename = "max-steps")]
    pub max_steps: u32,

    /// Save the session automatically when the loop terminates
    #[serde(rename = "auto-save")]
    pub auto_save: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sessions_dir: PathBuf::from("conversations"),
            max_turns: 20,
            max_steps: 50,
            auto_save: true,
        }
    }
}

/// Progress tracker document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Path to the progress document
    pub file: PathBuf,

    /// Project name used when creating a fresh document
    #[serde(rename = "project-name")]
    pub project_name: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(progressstore::DEFAULT_PROGRESS_FILE),
            project_name: progressstore::DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.planner.provider, "anthropic");
        assert_eq!(config.session.max_turns, 20);
        assert_eq!(config.session.max_steps, 50);
        assert!(config.session.auto_save);
        assert_eq!(config.session.sessions_dir, PathBuf::from("conversations"));
    }

    #[test]
    fn test_planner_config_defaults() {
        let config = PlannerConfig::default();

        assert_eq!(config.provider, "anthropic");
        assert!(config.model.contains("sonnet"));
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
planner:
  provider: anthropic
  model: claude-opus-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 4096
  timeout-ms: 60000

session:
  sessions-dir: /tmp/sessions
  max-turns: 10
  max-steps: 30
  auto-save: false

progress:
  file: /tmp/progress.json
  project-name: demo
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.planner.model, "claude-opus-4");
        assert_eq!(config.planner.api_key_env, "MY_API_KEY");
        assert_eq!(config.planner.max_tokens, 4096);
        assert_eq!(config.session.max_turns, 10);
        assert_eq!(config.session.max_steps, 30);
        assert!(!config.session.auto_save);
        assert_eq!(config.progress.project_name, "demo");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
planner:
  model: claude-haiku
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.planner.model, "claude-haiku");

        // Defaults for unspecified
        assert_eq!(config.planner.provider, "anthropic");
        assert_eq!(config.planner.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.session.max_turns, 20);
    }

    #[test]
    fn test_validation_missing_api_key() {
        let mut config = Config::default();
        config.planner.api_key_env = "NONEXISTENT_TEST_API_KEY_12345".to_string();

        let result = config.validate();

        assert!(result.is_err(), "Should fail without API key");
        let err = result.unwrap_err().to_string();
        assert!(
            err.contains("NONEXISTENT_TEST_API_KEY_12345"),
            "Error should mention the env var"
        );
    }
}
