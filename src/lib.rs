// src/lib.rs
//! Exploratory analysis of the food-SME hygiene survey: CSV loading,
//! response proportions with confidence intervals, and chart descriptions
//! ready for rendering.

pub mod analysis;
pub mod chart;
pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod state;

pub use error::{HygieneError, Result};
