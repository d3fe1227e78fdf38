// src/file/mod.rs
use log::debug;
use std::path::Path;
use std::sync::Arc;
use crate::error::Result;

pub mod survey;
pub mod settings;

pub use survey::{load_survey, ModificationMarker, SurveyTable};
pub use settings::SettingsFileHandler;

// Core trait for file operations
pub trait FileHandler<T> {
    fn load(&self, path: &Path) -> Result<T>;
    fn save(&self, data: &T, path: &Path) -> Result<()>;
}

/// Memoised survey loads keyed by path, encoding and modification marker.
#[derive(Debug, Default)]
pub struct SurveySource {
    cached: Option<Arc<SurveyTable>>,
    reads: usize,
}

impl SurveySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table while the file is unchanged, else reads it again.
    pub fn load(&mut self, path: &Path, encoding: &str) -> Result<Arc<SurveyTable>> {
        let marker = ModificationMarker::read(path)?;

        if let Some(table) = &self.cached {
            if table.path() == path && table.encoding() == encoding && table.marker() == marker {
                debug!("Reusing cached survey table for {}", path.display());
                return Ok(Arc::clone(table));
            }
        }

        let table = Arc::new(load_survey(path, encoding)?);
        self.reads += 1;
        self.cached = Some(Arc::clone(&table));
        Ok(table)
    }

    pub fn cached(&self) -> Option<Arc<SurveyTable>> {
        self.cached.clone()
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Number of times the file was actually read.
    pub fn reads(&self) -> usize {
        self.reads
    }
}
