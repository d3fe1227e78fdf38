// src/analysis/hygiene.rs

use serde::{Serialize, Deserialize};
use crate::config::{Indicator, Record, Response};
use crate::error::Result;
use super::stats::{
    self, ConfidenceInterval, IntervalSettings, Proportions, ResponseCounts, Summary,
};

/// Tri-state proportions of one indicator across `records`.
pub fn proportions(records: &[Record], indicator: Indicator) -> Proportions {
    Proportions::from_counts(ResponseCounts::tally(
        records.iter().map(|r| r.practice(indicator)),
    ))
}

/// Share of "Oui" among known answers; `None` when every answer is unknown.
pub fn hygiene_score(record: &Record) -> Option<f64> {
    let counts = ResponseCounts::tally(record.practices.iter().copied());
    if counts.known() == 0 {
        None
    } else {
        Some(counts.yes as f64 / counts.known() as f64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyProfile {
    pub company_id: String,
    pub rows: usize,
    pub proportions: Proportions,
    pub indicator_values: Vec<(Indicator, Option<f64>)>,
    pub hygiene_score: Option<f64>,
}

impl CompanyProfile {
    pub fn is_found(&self) -> bool {
        self.rows > 0
    }
}

/// Per-company profiles, in the order of `company_ids`.
pub fn compare_companies<S: AsRef<str>>(records: &[Record], company_ids: &[S]) -> Vec<CompanyProfile> {
    company_ids.iter()
        .map(|id| company_profile(records, id.as_ref()))
        .collect()
}

fn company_profile(records: &[Record], company_id: &str) -> CompanyProfile {
    let rows: Vec<&Record> = records.iter()
        .filter(|r| r.company_id == company_id)
        .collect();

    let counts = ResponseCounts::tally(
        rows.iter().flat_map(|r| r.practices.iter().copied()),
    );

    // Duplicate rows for one company are averaged per axis
    let indicator_values = Indicator::ALL.iter()
        .map(|&indicator| {
            let value = if rows.is_empty() {
                None
            } else {
                let sum: f64 = rows.iter().map(|r| r.practice(indicator).radar_value()).sum();
                Some(sum / rows.len() as f64)
            };
            (indicator, value)
        })
        .collect();

    let hygiene_score = if counts.known() == 0 {
        None
    } else {
        Some(counts.yes as f64 / counts.known() as f64)
    };

    CompanyProfile {
        company_id: company_id.to_string(),
        rows: rows.len(),
        proportions: Proportions::from_counts(counts),
        indicator_values,
        hygiene_score,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseStatistic {
    pub response: Response,
    pub count: usize,
    pub proportion: f64,
    pub confidence_interval: ConfidenceInterval,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorStatistics {
    pub indicator: Indicator,
    pub proportions: Proportions,
    pub responses: Vec<ResponseStatistic>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyScore {
    pub company_id: String,
    pub product_type: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PracticeDistribution {
    pub indicator: Indicator,
    pub values: Vec<(String, f64)>,
    pub summary: Option<Summary>,
}

/// Correlations between training dummies and practice dummies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }
}

pub const TRAINING_TYPES: [&str; 3] = ["BPH", "BPF", "HACCP"];

/// Survey-wide analyses over an immutable record slice.
#[derive(Debug, Clone, Copy)]
pub struct DataAnalyzer<'a> {
    pub(crate) records: &'a [Record],
    pub(crate) intervals: IntervalSettings,
}

impl<'a> DataAnalyzer<'a> {
    pub fn new(records: &'a [Record], intervals: IntervalSettings) -> Self {
        Self { records, intervals }
    }

    pub fn records(&self) -> &'a [Record] {
        self.records
    }

    /// Counts, proportions and intervals of each response for every indicator.
    pub fn hygiene_statistics(&self) -> Result<Vec<IndicatorStatistics>> {
        let total = self.records.len();

        Indicator::ALL.iter()
            .map(|&indicator| -> Result<IndicatorStatistics> {
                let proportions = proportions(self.records, indicator);
                let responses = match proportions.shares() {
                    None => Vec::new(),
                    Some(shares) => Response::ALL.iter()
                        .map(|&response| -> Result<ResponseStatistic> {
                            let count = shares.counts.count(response);
                            Ok(ResponseStatistic {
                                response,
                                count,
                                proportion: shares.share(response),
                                confidence_interval: stats::confidence_interval(
                                    count,
                                    total,
                                    self.intervals.level,
                                    self.intervals.method,
                                )?,
                            })
                        })
                        .collect::<Result<Vec<_>>>()?,
                };
                Ok(IndicatorStatistics { indicator, proportions, responses })
            })
            .collect()
    }

    pub fn company_scores(&self) -> Vec<CompanyScore> {
        self.records.iter()
            .map(|r| CompanyScore {
                company_id: r.company_id.clone(),
                product_type: r.product_type.clone(),
                score: hygiene_score(r),
            })
            .collect()
    }

    /// Mean hygiene score per product type, in first-seen order.
    pub fn product_type_scores(&self) -> Vec<(String, f64)> {
        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();

        for record in self.records {
            let Some(score) = hygiene_score(record) else {
                continue;
            };
            match groups.iter_mut().find(|(product, _)| *product == record.product_type) {
                Some((_, scores)) => scores.push(score),
                None => groups.push((record.product_type.clone(), vec![score])),
            }
        }

        groups.into_iter()
            .map(|(product, scores)| {
                let mean = scores.iter().sum::<f64>() / scores.len() as f64;
                (product, mean)
            })
            .collect()
    }

    /// Known (Oui/Non) answers per indicator as 1/0 values.
    pub fn practice_distributions(&self) -> Vec<PracticeDistribution> {
        Indicator::ALL.iter()
            .map(|&indicator| {
                let values: Vec<(String, f64)> = self.records.iter()
                    .filter_map(|r| {
                        r.practice(indicator).as_binary().map(|v| (r.company_id.clone(), v))
                    })
                    .collect();
                let raw: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
                PracticeDistribution {
                    indicator,
                    summary: stats::describe(&raw),
                    values,
                }
            })
            .collect()
    }

    /// Pearson matrix over training dummies then indicator dummies.
    ///
    /// Unknown practice answers are treated as missing and excluded pairwise.
    pub fn training_correlation(&self) -> CorrelationMatrix {
        let mut labels = Vec::new();
        let mut columns: Vec<Vec<Option<f64>>> = Vec::new();

        for training in TRAINING_TYPES {
            labels.push(format!("Formation_{training}"));
            columns.push(self.records.iter()
                .map(|r| Some(if r.training_received.contains(training) { 1.0 } else { 0.0 }))
                .collect());
        }
        for indicator in Indicator::ALL {
            labels.push(indicator.column().to_string());
            columns.push(self.records.iter()
                .map(|r| r.practice(indicator).as_binary())
                .collect());
        }

        let values = columns.iter()
            .map(|a| {
                columns.iter()
                    .map(|b| {
                        let pairs: Vec<(f64, f64)> = a.iter().zip(b.iter())
                            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                            .collect();
                        stats::pearson(&pairs)
                    })
                    .collect()
            })
            .collect();

        CorrelationMatrix { labels, values }
    }
}
