// src/config/record.rs
use serde::{Serialize, Deserialize};
use super::{BarrierCategory, Indicator, Response};

pub const UNKNOWN_VALUE: &str = "Inconnu";

/// One surveyed company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub company_id: String,
    pub location: String,
    pub product_type: String,
    pub staff_size: String,
    pub training_received: String,
    pub other_obstacles: Option<String>,
    pub practices: [Response; 9],
    pub barriers: [Response; 4],
}

impl Record {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            location: UNKNOWN_VALUE.to_string(),
            product_type: UNKNOWN_VALUE.to_string(),
            staff_size: UNKNOWN_VALUE.to_string(),
            training_received: UNKNOWN_VALUE.to_string(),
            other_obstacles: None,
            practices: [Response::Unknown; 9],
            barriers: [Response::Unknown; 4],
        }
    }

    pub fn practice(&self, indicator: Indicator) -> Response {
        self.practices[indicator.index()]
    }

    pub fn barrier(&self, category: BarrierCategory) -> Response {
        self.barriers[category.index()]
    }

    pub fn with_practice(mut self, indicator: Indicator, response: Response) -> Self {
        self.practices[indicator.index()] = response;
        self
    }

    pub fn with_barrier(mut self, category: BarrierCategory, response: Response) -> Self {
        self.barriers[category.index()] = response;
        self
    }

    /// Training answer, or `None` when unreported.
    pub fn known_training(&self) -> Option<&str> {
        let training = self.training_received.trim();
        if training.is_empty() || training == UNKNOWN_VALUE {
            None
        } else {
            Some(training)
        }
    }
}
