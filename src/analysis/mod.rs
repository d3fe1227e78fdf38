// src/analysis/mod.rs
pub mod stats;
pub mod hygiene;
pub mod survey;

// Re-export commonly used types
pub use stats::{
    confidence_interval,
    ConfidenceInterval,
    IntervalMethod,
    IntervalSettings,
    ProportionEstimate,
    Proportions,
    ResponseCounts,
    ResponseShares,
    Summary,
};
pub use hygiene::{
    compare_companies,
    hygiene_score,
    proportions,
    CompanyProfile,
    CompanyScore,
    CorrelationMatrix,
    DataAnalyzer,
    IndicatorStatistics,
    PracticeDistribution,
};
pub use survey::{
    overview,
    BarrierStatistics,
    Overview,
    StaffStatistics,
    TrainingDistribution,
    TrainingStatistics,
};
