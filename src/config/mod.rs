// src/config/mod.rs
pub mod indicator;
pub mod record;
pub mod settings;

// Re-export commonly used types
pub use indicator::{Response, Indicator, BarrierCategory};
pub use record::{Record, UNKNOWN_VALUE};
pub use settings::Settings;
