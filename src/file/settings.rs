// src/file/settings.rs
use super::FileHandler;
use crate::config::Settings;
use crate::config::settings::ENV_PREFIX;
use crate::error::{HygieneError, Result};
use config::{Config, Environment, File, FileFormat};
use std::fs;
use std::path::Path;

/// Settings layered as defaults, then the RON file, then `HYGIENE_*` variables.
#[derive(Debug)]
pub struct SettingsFileHandler {
    env_prefix: String,
}

impl SettingsFileHandler {
    pub fn new() -> Self {
        Self {
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    pub fn with_env_prefix(prefix: &str) -> Self {
        Self {
            env_prefix: prefix.to_string(),
        }
    }
}

impl Default for SettingsFileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandler<Settings> for SettingsFileHandler {
    fn load(&self, path: &Path) -> Result<Settings> {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path).format(FileFormat::Ron).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn save(&self, data: &Settings, path: &Path) -> Result<()> {
        data.validate()?;
        let content = ron::ser::to_string_pretty(
            data,
            ron::ser::PrettyConfig::new()
                .new_line("\n".to_string())
                .depth_limit(4)
                .separate_tuple_members(true)
        ).map_err(|e| HygieneError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
