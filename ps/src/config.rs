//! Configuration for progressstore

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the progress document
    #[serde(default = "default_progress_file")]
    pub progress_file: PathBuf,

    /// Project name used when creating a fresh document
    #[serde(default = "default_project_name")]
    pub project_name: String,
}

fn default_progress_file() -> PathBuf {
    PathBuf::from(crate::DEFAULT_PROGRESS_FILE)
}

fn default_project_name() -> String {
    crate::DEFAULT_PROJECT_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            progress_file: default_progress_file(),
            project_name: default_project_name(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("progressstore").join("config.yml")),
            Some(PathBuf::from("progressstore.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
