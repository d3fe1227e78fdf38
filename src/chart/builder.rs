// src/chart/builder.rs

use crate::analysis::{
    BarrierStatistics, CompanyProfile, CompanyScore, CorrelationMatrix, IndicatorStatistics,
    PracticeDistribution, TrainingDistribution,
};
use crate::config::{Indicator, Response};
use super::{
    BarChart, BarSeries, BoxChart, BoxSeries, ChartKind, ChartSpec, ColorScheme, Heatmap,
    Orientation, PieChart, PieSlice, RadarChart, RadarTrace,
};

const NO_DATA: &str = "Aucune donnée disponible";

/// Builds chart specifications. Holds nothing but its colour scheme.
#[derive(Debug, Clone, Default)]
pub struct HygieneVisualizer {
    colors: ColorScheme,
}

impl HygieneVisualizer {
    pub fn new(colors: ColorScheme) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }

    /// One axis per indicator, one trace per company found in the data.
    pub fn company_radar(&self, profiles: &[CompanyProfile]) -> ChartSpec {
        let title = match profiles {
            [single] => format!("Profil d'hygiène - {}", single.company_id),
            _ => "Profils d'hygiène".to_string(),
        };

        let traces: Vec<RadarTrace> = profiles.iter()
            .filter(|p| p.is_found())
            .enumerate()
            .map(|(i, profile)| RadarTrace {
                name: profile.company_id.clone(),
                values: profile.indicator_values.iter()
                    .map(|(_, value)| value.unwrap_or(Response::Unknown.radar_value()))
                    .collect(),
                color: if profiles.len() == 1 { self.colors.accent } else { self.colors.trace(i) },
            })
            .collect();

        if traces.is_empty() {
            return ChartSpec::empty(title, "Aucune entreprise sélectionnée");
        }

        ChartSpec::new(title, ChartKind::Radar(RadarChart {
            axes: Indicator::ALL.iter().map(|i| i.label().to_string()).collect(),
            traces,
            radial_ticks: [Response::No, Response::Unknown, Response::Yes].iter()
                .map(|r| (r.radar_value(), r.label().to_string()))
                .collect(),
        }))
    }

    /// Response shares per indicator, one series per response.
    pub fn indicator_breakdown(&self, statistics: &[IndicatorStatistics]) -> ChartSpec {
        let title = "Répartition des réponses par pratique (%)";
        let observed: Vec<_> = statistics.iter()
            .filter_map(|s| s.proportions.shares().map(|shares| (s.indicator, *shares)))
            .collect();

        if observed.is_empty() {
            return ChartSpec::empty(title, NO_DATA);
        }

        let series = Response::ALL.iter()
            .map(|&response| BarSeries {
                name: response.label().to_string(),
                color: self.colors.for_response(response),
                values: observed.iter()
                    .map(|(_, shares)| Some(shares.share(response) * 100.0))
                    .collect(),
                annotations: Some(observed.iter()
                    .map(|(_, shares)| shares.counts.count(response).to_string())
                    .collect()),
            })
            .collect();

        ChartSpec::new(title, ChartKind::Bar(BarChart {
            orientation: Orientation::Vertical,
            category_label: "Pratique d'hygiène".to_string(),
            value_label: "Pourcentage d'entreprises".to_string(),
            categories: observed.iter().map(|(i, _)| i.label().to_string()).collect(),
            series,
            value_range: Some((0.0, 100.0)),
        }))
    }

    pub fn barrier_chart(&self, barriers: &[BarrierStatistics]) -> ChartSpec {
        let title = "Fréquence des obstacles rencontrés (%)";
        let reported: Vec<_> = barriers.iter()
            .filter_map(|b| b.prevalence.map(|p| (b.category, p)))
            .collect();

        if reported.is_empty() {
            return ChartSpec::empty(title, "Aucune donnée d'obstacles disponible");
        }

        ChartSpec::new(title, ChartKind::Bar(BarChart {
            orientation: Orientation::Vertical,
            category_label: "Type d'obstacle".to_string(),
            value_label: "Pourcentage d'entreprises".to_string(),
            categories: reported.iter().map(|(c, _)| c.label().to_string()).collect(),
            series: vec![BarSeries {
                name: "Oui".to_string(),
                color: self.colors.no,
                values: reported.iter().map(|(_, p)| Some(p.proportion * 100.0)).collect(),
                annotations: Some(reported.iter().map(|(_, p)| p.count.to_string()).collect()),
            }],
            value_range: Some((0.0, 100.0)),
        }))
    }

    pub fn specific_obstacles_chart(&self, obstacles: &[(String, usize)]) -> ChartSpec {
        self.ranked_bar(
            "Fréquence des obstacles spécifiques mentionnés",
            "Obstacle",
            "Mentions",
            obstacles.iter().map(|(name, count)| (name.clone(), *count as f64)).collect(),
        )
    }

    pub fn training_chart(&self, distribution: &TrainingDistribution) -> ChartSpec {
        let title = "Distribution des formations reçues";
        if distribution.total() == 0 {
            return ChartSpec::empty(title, "Aucune donnée de formation disponible");
        }

        let slices = distribution.entries().iter()
            .enumerate()
            .map(|(i, (label, count))| PieSlice {
                label: label.to_string(),
                value: *count as f64,
                color: self.colors.trace(i),
            })
            .collect();

        ChartSpec::new(title, ChartKind::Pie(PieChart { slices }))
    }

    pub fn correlation_heatmap(&self, matrix: &CorrelationMatrix) -> ChartSpec {
        let title = "Corrélation entre formations et pratiques d'hygiène";
        let defined = matrix.values.iter().flatten().any(Option::is_some);
        if matrix.labels.is_empty() || !defined {
            return ChartSpec::empty(title, NO_DATA);
        }

        ChartSpec::new(title, ChartKind::Heatmap(Heatmap {
            labels: matrix.labels.clone(),
            cells: matrix.values.clone(),
            range: (-1.0, 1.0),
        }))
    }

    /// Scores per company, one series per product type.
    pub fn company_comparison(&self, scores: &[CompanyScore]) -> ChartSpec {
        let title = "Scores d'hygiène par entreprise";
        if scores.iter().all(|s| s.score.is_none()) {
            return ChartSpec::empty(title, "Aucune donnée de score disponible");
        }

        let mut product_types: Vec<&str> = Vec::new();
        for score in scores {
            if !product_types.contains(&score.product_type.as_str()) {
                product_types.push(&score.product_type);
            }
        }

        let series = product_types.iter()
            .enumerate()
            .map(|(i, product)| BarSeries {
                name: product.to_string(),
                color: self.colors.trace(i),
                values: scores.iter()
                    .map(|s| if s.product_type == *product { s.score } else { None })
                    .collect(),
                annotations: None,
            })
            .collect();

        ChartSpec::new(title, ChartKind::Bar(BarChart {
            orientation: Orientation::Vertical,
            category_label: "Entreprise".to_string(),
            value_label: "Score d'hygiène (0-1)".to_string(),
            categories: scores.iter().map(|s| s.company_id.clone()).collect(),
            series,
            value_range: Some((0.0, 1.0)),
        }))
    }

    pub fn hygiene_boxplot(&self, distributions: &[PracticeDistribution]) -> ChartSpec {
        let title = "Distribution des pratiques d'hygiène";
        let boxes: Vec<BoxSeries> = distributions.iter()
            .filter_map(|d| {
                let summary = d.summary?;
                Some(BoxSeries {
                    name: d.indicator.label().to_string(),
                    color: self.colors.accent,
                    summary,
                    points: d.values.iter().map(|(_, v)| *v).collect(),
                })
            })
            .collect();

        if boxes.is_empty() {
            return ChartSpec::empty(title, "Aucune donnée disponible pour le boxplot");
        }

        ChartSpec::new(title, ChartKind::Box(BoxChart {
            category_label: "Pratique d'hygiène".to_string(),
            value_label: "Conformité (0=Non, 1=Oui)".to_string(),
            boxes,
        }))
    }

    pub fn product_type_chart(&self, product_scores: &[(String, f64)]) -> ChartSpec {
        self.ranked_bar(
            "Score d'hygiène moyen par type de produit",
            "Type de produit",
            "Score moyen",
            product_scores.to_vec(),
        )
    }

    pub fn product_distribution_chart(&self, distribution: &[(String, usize)]) -> ChartSpec {
        self.ranked_bar(
            "Répartition par type de produit",
            "Type de produit",
            "Nombre d'entreprises",
            distribution.iter().map(|(name, count)| (name.clone(), *count as f64)).collect(),
        )
    }

    // Horizontal bars with the largest value drawn on top.
    fn ranked_bar(
        &self,
        title: &str,
        category_label: &str,
        value_label: &str,
        mut entries: Vec<(String, f64)>,
    ) -> ChartSpec {
        if entries.is_empty() {
            return ChartSpec::empty(title, NO_DATA);
        }
        entries.sort_by(|a, b| a.1.total_cmp(&b.1));

        ChartSpec::new(title, ChartKind::Bar(BarChart {
            orientation: Orientation::Horizontal,
            category_label: category_label.to_string(),
            value_label: value_label.to_string(),
            categories: entries.iter().map(|(name, _)| name.clone()).collect(),
            series: vec![BarSeries {
                name: value_label.to_string(),
                color: self.colors.trace(0),
                values: entries.iter().map(|(_, v)| Some(*v)).collect(),
                annotations: None,
            }],
            value_range: None,
        }))
    }
}
