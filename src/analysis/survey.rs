// src/analysis/survey.rs

use serde::{Serialize, Deserialize};
use std::collections::HashSet;
use crate::config::{BarrierCategory, UNKNOWN_VALUE};
use crate::error::Result;
use crate::file::SurveyTable;
use super::hygiene::{DataAnalyzer, TRAINING_TYPES};
use super::stats::{self, ProportionEstimate, Proportions, ResponseCounts, Summary};

/// Staff-size bands and the midpoint used for numeric summaries.
pub const STAFF_BANDS: [(&str, f64); 2] = [("10 à 20", 15.0), ("20 à 30", 25.0)];

pub const NO_TRAINING: &str = "Aucune";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BarrierStatistics {
    pub category: BarrierCategory,
    pub proportions: Proportions,
    /// "Oui" among Oui/Non answers; `None` when nobody answered.
    pub prevalence: Option<ProportionEstimate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffStatistics {
    pub summary: Summary,
    pub bands: Vec<(String, ProportionEstimate)>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingStatistics {
    pub training: String,
    pub estimate: ProportionEstimate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingDistribution {
    pub bph: usize,
    pub bpf: usize,
    pub haccp: usize,
    pub none: usize,
    pub multiple: usize,
}

impl TrainingDistribution {
    pub fn entries(&self) -> [(&'static str, usize); 5] {
        [
            ("BPH", self.bph),
            ("BPF", self.bpf),
            ("HACCP", self.haccp),
            (NO_TRAINING, self.none),
            ("Multiple", self.multiple),
        ]
    }

    pub fn total(&self) -> usize {
        self.entries().iter().map(|(_, count)| count).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Overview {
    pub companies: usize,
    pub locations: usize,
    pub product_types: usize,
    pub missing_rate: f64,
    pub product_distribution: Vec<(String, usize)>,
}

impl<'a> DataAnalyzer<'a> {
    /// Tri-state shares and prevalence for each barrier category.
    pub fn barrier_summary(&self) -> Result<Vec<BarrierStatistics>> {
        BarrierCategory::ALL.iter()
            .map(|&category| -> Result<BarrierStatistics> {
                let counts = ResponseCounts::tally(
                    self.records.iter().map(|r| r.barrier(category)),
                );
                let prevalence = if counts.known() > 0 {
                    Some(ProportionEstimate::new(counts.yes, counts.known(), self.intervals)?)
                } else {
                    None
                };
                Ok(BarrierStatistics {
                    category,
                    proportions: Proportions::from_counts(counts),
                    prevalence,
                })
            })
            .collect()
    }

    /// Numeric summary of staff bands; `None` when no row maps to a band.
    pub fn staff_statistics(&self) -> Result<Option<StaffStatistics>> {
        let numeric: Vec<f64> = self.records.iter()
            .filter_map(|r| staff_midpoint(&r.staff_size))
            .collect();

        let Some(summary) = stats::describe(&numeric) else {
            return Ok(None);
        };

        let total = self.records.len();
        let bands = value_counts(self.records.iter().map(|r| r.staff_size.as_str()))
            .into_iter()
            .map(|(band, count)| -> Result<(String, ProportionEstimate)> {
                Ok((band, ProportionEstimate::new(count, total, self.intervals)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(StaffStatistics { summary, bands }))
    }

    /// Free-text obstacles, most frequent first.
    pub fn specific_obstacles(&self) -> Vec<(String, usize)> {
        let mut mentions: Vec<(String, usize)> = Vec::new();

        for text in self.records.iter().filter_map(|r| r.other_obstacles.as_deref()) {
            if text.trim().is_empty() || text.trim() == UNKNOWN_VALUE {
                continue;
            }
            for obstacle in text.split(|c: char| c == ',' || c == ';').map(str::trim) {
                // Very short fragments are noise
                if obstacle.chars().count() <= 3 {
                    continue;
                }
                match mentions.iter_mut().find(|(name, _)| name == obstacle) {
                    Some((_, count)) => *count += 1,
                    None => mentions.push((obstacle.to_string(), 1)),
                }
            }
        }

        // Stable sort keeps first-seen order among ties
        mentions.sort_by(|a, b| b.1.cmp(&a.1));
        mentions
    }

    /// Share of companies with a known training answer mentioning each type.
    pub fn training_statistics(&self) -> Result<Vec<TrainingStatistics>> {
        let answers: Vec<&str> = self.records.iter()
            .filter_map(|r| r.known_training())
            .collect();
        if answers.is_empty() {
            return Ok(Vec::new());
        }

        TRAINING_TYPES.iter()
            .copied()
            .chain(std::iter::once(NO_TRAINING))
            .map(|training| -> Result<TrainingStatistics> {
                let count = answers.iter().filter(|a| a.contains(training)).count();
                Ok(TrainingStatistics {
                    training: training.to_string(),
                    estimate: ProportionEstimate::new(count, answers.len(), self.intervals)?,
                })
            })
            .collect()
    }

    pub fn training_distribution(&self) -> TrainingDistribution {
        let mut distribution = TrainingDistribution::default();

        for answer in self.records.iter().filter_map(|r| r.known_training()) {
            let mut named = 0;
            for training in TRAINING_TYPES {
                if answer.contains(training) {
                    named += 1;
                    match training {
                        "BPH" => distribution.bph += 1,
                        "BPF" => distribution.bpf += 1,
                        _ => distribution.haccp += 1,
                    }
                }
            }
            if answer.contains(NO_TRAINING) {
                distribution.none += 1;
            } else if named > 1 {
                distribution.multiple += 1;
            }
        }

        distribution
    }
}

/// Headline figures for the overview section.
pub fn overview(table: &SurveyTable) -> Overview {
    let records = table.records();
    let distinct = |values: Vec<&str>| values.into_iter().collect::<HashSet<_>>().len();

    let cells = records.len() * table.column_count();
    let missing_rate = if cells == 0 {
        0.0
    } else {
        table.unknown_cells() as f64 / cells as f64
    };

    let mut product_distribution = value_counts(records.iter().map(|r| r.product_type.as_str()));
    product_distribution.sort_by(|a, b| b.1.cmp(&a.1));

    Overview {
        companies: distinct(records.iter().map(|r| r.company_id.as_str()).collect()),
        locations: distinct(records.iter().map(|r| r.location.as_str()).collect()),
        product_types: distinct(records.iter().map(|r| r.product_type.as_str()).collect()),
        missing_rate,
        product_distribution,
    }
}

fn staff_midpoint(band: &str) -> Option<f64> {
    STAFF_BANDS.iter()
        .find(|(label, _)| *label == band.trim())
        .map(|(_, midpoint)| *midpoint)
}

// Occurrences per distinct value, in first-seen order.
fn value_counts<'v, I: Iterator<Item = &'v str>>(values: I) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value.to_string(), 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::stats::IntervalSettings;
    use crate::config::{Record, Response};

    fn analyzer(records: &[Record]) -> DataAnalyzer<'_> {
        DataAnalyzer::new(records, IntervalSettings::default())
    }

    #[test]
    fn test_barrier_summary_covers_all_categories() {
        let records = vec![
            Record::new("E1").with_barrier(BarrierCategory::Financial, Response::Yes),
            Record::new("E2").with_barrier(BarrierCategory::Financial, Response::No),
            Record::new("E3"),
        ];
        let summary = analyzer(&records).barrier_summary().unwrap();
        assert_eq!(summary.len(), 4);

        let financial = &summary[1];
        assert_eq!(financial.category, BarrierCategory::Financial);
        let shares = financial.proportions.shares().unwrap();
        assert_eq!(shares.counts.unknown, 1);
        let prevalence = financial.prevalence.unwrap();
        assert_eq!((prevalence.count, prevalence.total), (1, 2));

        // Nobody answered the technical question
        assert!(summary[0].prevalence.is_none());
    }

    #[test]
    fn test_staff_statistics() {
        let mut records = Vec::new();
        for (id, band) in [("E1", "10 à 20"), ("E2", "20 à 30"), ("E3", "20 à 30"), ("E4", "Inconnu")] {
            let mut record = Record::new(id);
            record.staff_size = band.into();
            records.push(record);
        }
        let staff = analyzer(&records).staff_statistics().unwrap().unwrap();
        assert_eq!(staff.summary.count, 3);
        assert_eq!(staff.summary.min, 15.0);
        assert_eq!(staff.summary.max, 25.0);
        assert_eq!(staff.bands.len(), 3);
        assert_eq!(staff.bands[1].0, "20 à 30");
        assert_eq!(staff.bands[1].1.count, 2);

        assert!(analyzer(&[Record::new("E9")]).staff_statistics().unwrap().is_none());
    }

    #[test]
    fn test_specific_obstacles_ranked() {
        let mut a = Record::new("E1");
        a.other_obstacles = Some("Manque de moyens; Coût élevé, abc".into());
        let mut b = Record::new("E2");
        b.other_obstacles = Some("Coût élevé".into());
        let mut c = Record::new("E3");
        c.other_obstacles = Some("Inconnu".into());

        let obstacles = analyzer(&[a, b, c]).specific_obstacles();
        assert_eq!(obstacles, vec![
            ("Coût élevé".to_string(), 2),
            ("Manque de moyens".to_string(), 1),
        ]);
    }

    #[test]
    fn test_training_statistics_and_distribution() {
        let mut records = Vec::new();
        for (id, training) in [("E1", "BPH, HACCP"), ("E2", "Aucune"), ("E3", "BPF"), ("E4", "Inconnu")] {
            let mut record = Record::new(id);
            record.training_received = training.into();
            records.push(record);
        }
        let analyzer = analyzer(&records);

        let stats = analyzer.training_statistics().unwrap();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].training, "BPH");
        assert_eq!((stats[0].estimate.count, stats[0].estimate.total), (1, 3));
        assert_eq!(stats[3].estimate.count, 1);

        let distribution = analyzer.training_distribution();
        assert_eq!(distribution, TrainingDistribution { bph: 1, bpf: 1, haccp: 1, none: 1, multiple: 1 });
    }

    #[test]
    fn test_training_statistics_without_answers() {
        assert!(analyzer(&[Record::new("E1")]).training_statistics().unwrap().is_empty());
    }

    #[test]
    fn test_value_counts_first_seen_order() {
        let counts = value_counts(["b", "a", "b"].into_iter());
        assert_eq!(counts, vec![("b".to_string(), 2), ("a".to_string(), 1)]);
    }
}
