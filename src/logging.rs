// src/logging.rs
use crate::config::Settings;
use crate::file::SurveyTable;
use log::{debug, info};

/// Initialise the logger. `RUST_LOG` still refines the configured level.
pub fn init_logger(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .try_init();

    debug!("Logger initialized with level: {level:?}");
}

/// Log the settings the dashboard starts with
pub fn log_settings(settings: &Settings) {
    info!(
        "Settings: data={}, encoding={}, confidence={}, method={}",
        settings.data_path.display(),
        settings.encoding,
        settings.confidence_level,
        settings.interval_method
    );
}

pub fn log_table_info(table: &SurveyTable) {
    info!(
        "Survey: {} rows, {} columns, {} unknown cells",
        table.records().len(),
        table.column_count(),
        table.unknown_cells()
    );
    if let Some(modified) = table.marker().modified_at() {
        debug!("  modified at {}", modified.to_rfc3339());
    }
}
