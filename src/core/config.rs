use crate::core::record::Investment;
use crate::core::store::DEFAULT_DATE_FORMAT;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Configuration shipped inside the binary, used when no config file exists.
pub const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub investments: Vec<Investment>,
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in example",
                config_path.display()
            );
            return Self::from_yaml(EXAMPLE_CONFIG);
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "iai", "iai-dashboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for investment in &self.investments {
            if investment.id.0 == 0 {
                anyhow::bail!(
                    "Investment id must be positive, got 0 for {}",
                    investment.company
                );
            }
            if investment.iai_score > 100 {
                anyhow::bail!(
                    "IAI score of investment {} must be at most 100, got {}",
                    investment.id,
                    investment.iai_score
                );
            }
            if !seen.insert(investment.id) {
                anyhow::bail!("Duplicate investment id {} in config", investment.id);
            }
        }
        Ok(())
    }
}
