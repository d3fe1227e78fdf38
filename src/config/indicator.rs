// src/config/indicator.rs
use serde::{Serialize, Deserialize};

/// Tri-state survey answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Response {
    Yes,
    No,
    Unknown,
}

impl Response {
    pub const ALL: [Response; 3] = [Response::Yes, Response::No, Response::Unknown];

    /// Maps a raw cell to a response. Unrecognised values become `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "oui" | "yes" | "o" | "y" => Response::Yes,
            "non" | "no" | "n" => Response::No,
            _ => Response::Unknown,
        }
    }

    /// Whether `raw` belongs to the vocabulary (unknown markers included).
    pub fn is_recognised(raw: &str) -> bool {
        matches!(
            raw.trim().to_lowercase().as_str(),
            "oui" | "yes" | "o" | "y" | "non" | "no" | "n" | "inconnu" | "unknown" | ""
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Response::Yes => "Oui",
            Response::No => "Non",
            Response::Unknown => "Inconnu",
        }
    }

    /// Position on the radar's radial axis.
    pub fn radar_value(&self) -> f64 {
        match self {
            Response::Yes => 1.0,
            Response::No => 0.0,
            Response::Unknown => 0.5,
        }
    }

    /// 1/0 for known answers, `None` for Unknown.
    pub fn as_binary(&self) -> Option<f64> {
        match self {
            Response::Yes => Some(1.0),
            Response::No => Some(0.0),
            Response::Unknown => None,
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Response::Unknown
    }
}

/// The nine hygiene practices evaluated per company.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Indicator {
    GoodHygienePractice,
    GoodManufacturingPractice,
    Haccp,
    WrittenProcedures,
    StaffTraining,
    PersonnelHygiene,
    FacilityHygiene,
    RawMaterialStorage,
    QualityControl,
}

impl Indicator {
    pub const ALL: [Indicator; 9] = [
        Indicator::GoodHygienePractice,
        Indicator::GoodManufacturingPractice,
        Indicator::Haccp,
        Indicator::WrittenProcedures,
        Indicator::StaffTraining,
        Indicator::PersonnelHygiene,
        Indicator::FacilityHygiene,
        Indicator::RawMaterialStorage,
        Indicator::QualityControl,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            Indicator::GoodHygienePractice => "Existence_BPH",
            Indicator::GoodManufacturingPractice => "Existence_BPF",
            Indicator::Haccp => "Existence_HACCP",
            Indicator::WrittenProcedures => "Procedures_ecrites",
            Indicator::StaffTraining => "Formation_du_personnel_en_hygiene",
            Indicator::PersonnelHygiene => "Hygiene_du_personnel",
            Indicator::FacilityHygiene => "Hygiene_des_locaux",
            Indicator::RawMaterialStorage => "Stockage_des_matieres_premieres",
            Indicator::QualityControl => "Controle_qualite_regulier",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Indicator::GoodHygienePractice => "BPH",
            Indicator::GoodManufacturingPractice => "BPF",
            Indicator::Haccp => "HACCP",
            Indicator::WrittenProcedures => "Procédures écrites",
            Indicator::StaffTraining => "Formation personnel",
            Indicator::PersonnelHygiene => "Hygiène personnel",
            Indicator::FacilityHygiene => "Hygiène locaux",
            Indicator::RawMaterialStorage => "Stockage matières",
            Indicator::QualityControl => "Contrôle qualité",
        }
    }

    pub fn index(&self) -> usize {
        Indicator::ALL.iter().position(|i| i == self).unwrap_or(0)
    }
}

/// The four obstacle classes reported by companies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BarrierCategory {
    Technical,
    Financial,
    Organizational,
    Human,
}

impl BarrierCategory {
    pub const ALL: [BarrierCategory; 4] = [
        BarrierCategory::Technical,
        BarrierCategory::Financial,
        BarrierCategory::Organizational,
        BarrierCategory::Human,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            BarrierCategory::Technical => "Obstacle_technique",
            BarrierCategory::Financial => "Obstacle_financier",
            BarrierCategory::Organizational => "Obstacle_organisationnel",
            BarrierCategory::Human => "Obstacle_humain",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BarrierCategory::Technical => "Technique",
            BarrierCategory::Financial => "Financier",
            BarrierCategory::Organizational => "Organisationnel",
            BarrierCategory::Human => "Humain",
        }
    }

    pub fn index(&self) -> usize {
        BarrierCategory::ALL.iter().position(|b| b == self).unwrap_or(0)
    }
}
