// src/ui/mod.rs
pub mod charts;
pub mod sections;

pub use sections::show_section;
