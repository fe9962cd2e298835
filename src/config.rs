use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub analysis: AnalysisConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// Analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Glob patterns for paths to skip during the scan
    pub exclude: Vec<String>,
    /// Descend into package directories that have no __init__.py
    pub allow_namespace_packages: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            version: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude: vec![
                "tests/**".to_string(),
                "test/**".to_string(),
                "venv/**".to_string(),
                ".venv/**".to_string(),
                "__pycache__/**".to_string(),
                "*.egg-info/**".to_string(),
                "build/**".to_string(),
                "dist/**".to_string(),
            ],
            allow_namespace_packages: true,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, exclude: Vec<String>, no_namespace_packages: bool) {
        if !exclude.is_empty() {
            self.analysis.exclude.extend(exclude);
        }

        if no_namespace_packages {
            self.analysis.allow_namespace_packages = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.analysis.exclude {
            if pattern.trim().is_empty() {
                return Err(Error::config_validation("exclude pattern cannot be empty"));
            }
            glob::Pattern::new(pattern).map_err(|e| {
                Error::config_validation(format!("bad exclude pattern '{}': {}", pattern, e))
            })?;
        }

        Ok(())
    }
}
