// src/state/mod.rs
use std::path::PathBuf;
use std::sync::Arc;
use log::error;

use crate::chart::HygieneVisualizer;
use crate::config::Settings;
use crate::error::Result;
use crate::file::{SurveySource, SurveyTable};
use crate::logging;

pub mod pipeline;

pub use pipeline::{Pipeline, SectionView, ViewQuery};

// Dashboard sections, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Overview,
    DescriptiveStatistics,
    Companies,
    Obstacles,
    Training,
    Comparisons,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Overview,
        Section::DescriptiveStatistics,
        Section::Companies,
        Section::Obstacles,
        Section::Training,
        Section::Comparisons,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Overview => "Vue d'ensemble",
            Section::DescriptiveStatistics => "Statistiques descriptives",
            Section::Companies => "Visualisations par entreprise",
            Section::Obstacles => "Analyse des obstacles",
            Section::Training => "Analyse des formations",
            Section::Comparisons => "Comparaisons inter-entreprises",
        }
    }

    pub fn query(&self, selected_companies: &[String]) -> ViewQuery {
        match self {
            Section::Overview => ViewQuery::Overview,
            Section::DescriptiveStatistics => ViewQuery::DescriptiveStatistics,
            Section::Companies => ViewQuery::Companies(selected_companies.to_vec()),
            Section::Obstacles => ViewQuery::Obstacles,
            Section::Training => ViewQuery::Training,
            Section::Comparisons => ViewQuery::Comparisons,
        }
    }
}

// Core application state
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub current_section: Section,
    pub selected_companies: Vec<String>,
    pub error_message: Option<String>,
    source: SurveySource,
    pipeline: Option<Pipeline>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            current_section: Section::Overview,
            selected_companies: Vec::new(),
            error_message: None,
            source: SurveySource::new(),
            pipeline: None,
        }
    }

    /// Loads the configured data file. On failure the message is kept for
    /// display and every section renders empty.
    pub fn load_data(&mut self) -> Result<()> {
        let path = self.settings.data_path.clone();
        match self.source.load(&path, &self.settings.encoding) {
            Ok(table) => {
                self.install_table(table);
                self.error_message = None;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                self.error_message = Some(e.user_message());
                self.pipeline = None;
                self.selected_companies.clear();
                Err(e)
            }
        }
    }

    pub fn open(&mut self, path: PathBuf) -> Result<()> {
        self.settings.data_path = path;
        self.load_data()
    }

    /// Forgets the cached table and reads the file again.
    pub fn reload(&mut self) -> Result<()> {
        self.source.invalidate();
        self.load_data()
    }

    /// Swaps settings in; cached views are dropped since intervals or colours may differ.
    pub fn apply_settings(&mut self, settings: Settings) {
        let reload = settings.data_path != self.settings.data_path
            || settings.encoding != self.settings.encoding;
        self.settings = settings;

        if reload {
            let _ = self.load_data();
        } else if let Some(table) = self.pipeline.as_ref().map(|p| Arc::clone(p.table())) {
            self.pipeline = Some(self.build_pipeline(table));
        }
    }

    pub fn table(&self) -> Option<&Arc<SurveyTable>> {
        self.pipeline.as_ref().map(|p| p.table())
    }

    pub fn pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }

    pub fn company_ids(&self) -> Vec<String> {
        self.table().map(|t| t.company_ids()).unwrap_or_default()
    }

    pub fn toggle_company(&mut self, company_id: &str) {
        match self.selected_companies.iter().position(|id| id == company_id) {
            Some(index) => {
                self.selected_companies.remove(index);
            }
            None => self.selected_companies.push(company_id.to_string()),
        }
    }

    /// View for the current section, or `None` when no data is loaded.
    pub fn current_view(&mut self) -> Option<Arc<SectionView>> {
        let query = self.current_section.query(&self.selected_companies);
        let pipeline = self.pipeline.as_mut()?;
        match pipeline.view(&query) {
            Ok(view) => Some(view),
            Err(e) => {
                error!("Failed to compute {:?}: {}", query, e);
                self.error_message = Some(e.user_message());
                None
            }
        }
    }

    fn install_table(&mut self, table: Arc<SurveyTable>) {
        let unchanged = self.pipeline.as_ref()
            .map_or(false, |p| Arc::ptr_eq(p.table(), &table));
        if unchanged {
            return;
        }

        logging::log_table_info(&table);
        let known = table.company_ids();
        self.selected_companies.retain(|id| known.contains(id));
        if self.selected_companies.is_empty() {
            if let Some(first) = known.first() {
                self.selected_companies.push(first.clone());
            }
        }
        self.pipeline = Some(self.build_pipeline(table));
    }

    fn build_pipeline(&self, table: Arc<SurveyTable>) -> Pipeline {
        Pipeline::new(
            table,
            self.settings.intervals(),
            HygieneVisualizer::new(self.settings.colors.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BarrierCategory, Indicator};
    use std::fs;

    fn survey_csv(ids: &[&str]) -> String {
        let mut header = vec!["ID_entreprise".to_string(), "Type _de_produit".to_string()];
        header.extend(Indicator::ALL.iter().map(|i| i.column().to_string()));
        header.extend(BarrierCategory::ALL.iter().map(|b| b.column().to_string()));

        let mut lines = vec![header.join(",")];
        for id in ids {
            let mut cells = vec![id.to_string(), "Jus".to_string()];
            cells.extend(std::iter::repeat("Oui".to_string()).take(13));
            lines.push(cells.join(","));
        }
        lines.join("\n")
    }

    fn state_for(path: PathBuf) -> AppState {
        AppState::new(Settings { data_path: path, ..Settings::default() })
    }

    #[test]
    fn test_missing_file_leaves_message_and_no_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_for(dir.path().join("absent.csv"));

        assert!(state.load_data().is_err());
        assert!(state.error_message.is_some());
        assert!(state.current_view().is_none());
        assert!(state.company_ids().is_empty());
    }

    #[test]
    fn test_load_selects_first_company() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        fs::write(&path, survey_csv(&["E1", "E2"])).unwrap();

        let mut state = state_for(path);
        state.load_data().unwrap();
        assert_eq!(state.selected_companies, vec!["E1".to_string()]);
        assert_eq!(state.company_ids(), vec!["E1".to_string(), "E2".to_string()]);

        state.current_section = Section::Companies;
        match state.current_view().as_deref() {
            Some(SectionView::Companies { profiles, .. }) => assert_eq!(profiles.len(), 1),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn test_unchanged_file_keeps_pipeline_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        fs::write(&path, survey_csv(&["E1"])).unwrap();

        let mut state = state_for(path);
        state.load_data().unwrap();
        state.current_view();
        state.load_data().unwrap();
        state.current_view();

        assert_eq!(state.pipeline().map(|p| p.computed()), Some(1));
    }

    #[test]
    fn test_apply_settings_rebuilds_views() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.csv");
        fs::write(&path, survey_csv(&["E1"])).unwrap();

        let mut state = state_for(path);
        state.load_data().unwrap();
        state.current_view();

        let settings = Settings { confidence_level: 0.9, ..state.settings.clone() };
        state.apply_settings(settings);
        assert_eq!(state.pipeline().map(|p| p.computed()), Some(0));
        assert!(state.current_view().is_some());
    }

    #[test]
    fn test_toggle_company() {
        let mut state = AppState::new(Settings::default());
        state.toggle_company("E1");
        state.toggle_company("E2");
        state.toggle_company("E1");
        assert_eq!(state.selected_companies, vec!["E2".to_string()]);
    }

    #[test]
    fn test_section_queries() {
        let selected = vec!["E3".to_string()];
        assert_eq!(Section::Companies.query(&selected), ViewQuery::Companies(selected.clone()));
        assert_eq!(Section::Training.query(&selected), ViewQuery::Training);
        assert_eq!(Section::ALL.len(), 6);
    }
}
