// src/config/settings.rs
use serde::{Serialize, Deserialize};
use std::path::PathBuf;
use crate::analysis::{IntervalMethod, IntervalSettings};
use crate::analysis::stats::DEFAULT_CONFIDENCE_LEVEL;
use crate::chart::ColorScheme;
use crate::error::{HygieneError, Result};

pub const SETTINGS_ENV: &str = "HYGIENE_SETTINGS";
pub const ENV_PREFIX: &str = "HYGIENE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub encoding: String,
    pub confidence_level: f64,
    pub interval_method: IntervalMethod,
    pub colors: ColorScheme,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/hygiene_pme.csv"),
            encoding: "utf-8-sig".to_string(),
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            interval_method: IntervalMethod::default(),
            colors: ColorScheme::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// `$HYGIENE_SETTINGS`, else `<config dir>/hygiene-eda/settings.ron`.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(SETTINGS_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|dir| dir.join("hygiene-eda").join("settings.ron"))
            .unwrap_or_else(|| PathBuf::from("settings.ron"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(HygieneError::Config(format!(
                "confidence_level must lie in (0, 1), got {}",
                self.confidence_level
            )));
        }
        if self.encoding.trim().is_empty() {
            return Err(HygieneError::Config("encoding must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn intervals(&self) -> IntervalSettings {
        IntervalSettings {
            level: self.confidence_level,
            method: self.interval_method,
        }
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
