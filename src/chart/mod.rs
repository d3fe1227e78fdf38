// src/chart/mod.rs
//! Framework-neutral chart descriptions built from analysis results.

use serde::{Serialize, Deserialize};
use std::fmt;
use crate::analysis::Summary;
use crate::config::Response;
use crate::error::{HygieneError, Result};

pub mod builder;

pub use builder::HygieneVisualizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || HygieneError::InvalidArgument(format!("invalid colour '{hex}'"));
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = HygieneError;

    fn try_from(value: String) -> Result<Self> {
        Rgb::from_hex(&value)
    }
}

/// Colours used by every chart. Injected into the visualizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub yes: Rgb,
    pub no: Rgb,
    pub unknown: Rgb,
    pub accent: Rgb,
    pub palette: Vec<Rgb>,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            yes: Rgb(0x2E, 0x8B, 0x57),
            no: Rgb(0xDC, 0x14, 0x3C),
            unknown: Rgb(0xFF, 0xA5, 0x00),
            accent: Rgb(32, 201, 151),
            palette: vec![
                Rgb(0x63, 0x6E, 0xFA),
                Rgb(0xEF, 0x55, 0x3B),
                Rgb(0x00, 0xCC, 0x96),
                Rgb(0xAB, 0x63, 0xFA),
                Rgb(0xFF, 0xA1, 0x5A),
                Rgb(0x19, 0xD3, 0xF3),
                Rgb(0xFF, 0x66, 0x92),
                Rgb(0xB6, 0xE8, 0x80),
            ],
        }
    }
}

impl ColorScheme {
    pub fn for_response(&self, response: Response) -> Rgb {
        match response {
            Response::Yes => self.yes,
            Response::No => self.no,
            Response::Unknown => self.unknown,
        }
    }

    /// Colour for the `index`-th trace, cycling through the palette.
    pub fn trace(&self, index: usize) -> Rgb {
        if self.palette.is_empty() {
            self.accent
        } else {
            self.palette[index % self.palette.len()]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, kind: ChartKind) -> Self {
        Self { title: title.into(), kind }
    }

    pub fn empty(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, ChartKind::Empty { message: message.into() })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ChartKind::Empty { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartKind {
    Empty { message: String },
    Radar(RadarChart),
    Bar(BarChart),
    Box(BoxChart),
    Pie(PieChart),
    Heatmap(Heatmap),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarChart {
    pub axes: Vec<String>,
    pub traces: Vec<RadarTrace>,
    pub radial_ticks: Vec<(f64, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarTrace {
    pub name: String,
    pub values: Vec<f64>,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub orientation: Orientation,
    pub category_label: String,
    pub value_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
    pub value_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub color: Rgb,
    /// One slot per category; `None` leaves the category without a bar.
    pub values: Vec<Option<f64>>,
    pub annotations: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxChart {
    pub category_label: String,
    pub value_label: String,
    pub boxes: Vec<BoxSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSeries {
    pub name: String,
    pub color: Rgb,
    pub summary: Summary,
    pub points: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub labels: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
    pub range: (f64, f64),
}
