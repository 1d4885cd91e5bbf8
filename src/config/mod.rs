//! Configuration loading
//!
//! Configuration lives in a TOML file with three optional sections (`[analysis]`,
//! `[obsidian]`, `[json]`). Omitted keys take their documented defaults. Unknown keys
//! are rejected so a typo never silently falls back to a default.
//!
//! Lookup order when no path is given on the command line:
//! 1. `./ai-history-analyser.toml`
//! 2. `<config dir>/ai-history-analyser/config.toml`
//! 3. built-in defaults

pub mod analysis;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub use analysis::{AnalysisConfig, ConfidenceWeights, PriorityWeights};

pub const CONFIG_FILE_NAME: &str = "ai-history-analyser.toml";
const CONFIG_DIR_NAME: &str = "ai-history-analyser";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObsidianOptions {
    /// Vault used when `--obsidian` is given without an explicit path
    pub vault_path: Option<String>,
    /// Folder inside the vault that receives the notes
    pub folder: String,
}

impl Default for ObsidianOptions {
    fn default() -> Self {
        Self { vault_path: None, folder: "AI Projects".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsonOptions {
    pub pretty: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub obsidian: ObsidianOptions,
    pub json: JsonOptions,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate().context("Invalid [analysis] configuration")?;
        if self.obsidian.folder.trim().is_empty() {
            bail!("Invalid [obsidian] configuration: folder cannot be empty");
        }
        Ok(())
    }

    /// Render as TOML, the format `init-config` writes
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Parse and validate configuration text
pub fn parse_config(text: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(text).context("Failed to parse configuration")?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from an explicit path, or from the first default location that exists
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("Configuration file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => default_config_paths().into_iter().find(|p| p.is_file()),
    };

    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read configuration: {}", path.display()))?;
            parse_config(&text).with_context(|| format!("In {}", path.display()))
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Candidate configuration files, in lookup order
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(CONFIG_DIR_NAME).join("config.toml"));
    }
    paths
}
