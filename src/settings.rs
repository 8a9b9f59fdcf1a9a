use anyhow::{Context, Result};
use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_true() -> bool {
    true
}

fn default_snapshot_file() -> String {
    "accounts.json".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub custom_parameter_name: String,
    pub add_to_campaign_final_url_suffix: bool,
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
    #[serde(default = "default_true")]
    pub backup_before_write: bool,
}

impl Settings {
    pub fn load(settings_file: &str) -> Result<Self> {
        let path = Path::new(settings_file);
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "settings.json not found at '{}'. Exiting...",
                settings_file
            ));
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", settings_file))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", settings_file))?;

        info!("Settings loaded from '{}'.", settings_file);
        Ok(settings)
    }

    /// Fatal check, run before any account is touched.
    pub fn validate(&self) -> Result<()> {
        if !is_custom_parameter_name_valid(&self.custom_parameter_name) {
            return Err(anyhow::anyhow!(
                "The selected custom parameter name ({}) is not valid!",
                self.custom_parameter_name
            ));
        }
        Ok(())
    }
}

/// Custom parameter names are limited to 1-16 alphanumeric characters.
pub fn is_custom_parameter_name_valid(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9]{1,16}$").unwrap();
    re.is_match(name)
}
