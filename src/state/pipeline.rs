// src/state/pipeline.rs
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use log::debug;
use crate::analysis::{
    self, compare_companies, BarrierStatistics, CompanyProfile, DataAnalyzer,
    IndicatorStatistics, IntervalSettings, Overview, StaffStatistics, TrainingStatistics,
};
use crate::chart::{ChartSpec, HygieneVisualizer};
use crate::config::Record;
use crate::error::Result;
use crate::file::SurveyTable;

/// Inputs that fully determine a section's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewQuery {
    Overview,
    DescriptiveStatistics,
    Companies(Vec<String>),
    Obstacles,
    Training,
    Comparisons,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionView {
    Overview {
        overview: Overview,
        loaded_at: DateTime<Utc>,
        // Raw rows for the data preview
        records: Vec<Record>,
        product_chart: ChartSpec,
    },
    DescriptiveStatistics {
        hygiene: Vec<IndicatorStatistics>,
        staff: Option<StaffStatistics>,
        breakdown_chart: ChartSpec,
    },
    Companies {
        profiles: Vec<CompanyProfile>,
        // First row of each selected company found in the table
        details: Vec<Record>,
        radar: ChartSpec,
    },
    Obstacles {
        barriers: Vec<BarrierStatistics>,
        barrier_chart: ChartSpec,
        specific: Vec<(String, usize)>,
        specific_chart: ChartSpec,
    },
    Training {
        training: Vec<TrainingStatistics>,
        distribution_chart: ChartSpec,
        correlation_chart: ChartSpec,
    },
    Comparisons {
        comparison_chart: ChartSpec,
        boxplot: ChartSpec,
        product_chart: ChartSpec,
    },
}

impl SectionView {
    pub fn charts(&self) -> Vec<&ChartSpec> {
        match self {
            SectionView::Overview { product_chart, .. } => vec![product_chart],
            SectionView::DescriptiveStatistics { breakdown_chart, .. } => vec![breakdown_chart],
            SectionView::Companies { radar, .. } => vec![radar],
            SectionView::Obstacles { barrier_chart, specific_chart, .. } => {
                vec![barrier_chart, specific_chart]
            }
            SectionView::Training { distribution_chart, correlation_chart, .. } => {
                vec![distribution_chart, correlation_chart]
            }
            SectionView::Comparisons { comparison_chart, boxplot, product_chart } => {
                vec![comparison_chart, boxplot, product_chart]
            }
        }
    }
}

/// Memoised `query -> analysis -> charts` over one immutable table.
#[derive(Debug)]
pub struct Pipeline {
    table: Arc<SurveyTable>,
    intervals: IntervalSettings,
    visualizer: HygieneVisualizer,
    cache: HashMap<ViewQuery, Arc<SectionView>>,
    computed: usize,
}

impl Pipeline {
    pub fn new(table: Arc<SurveyTable>, intervals: IntervalSettings, visualizer: HygieneVisualizer) -> Self {
        Self {
            table,
            intervals,
            visualizer,
            cache: HashMap::new(),
            computed: 0,
        }
    }

    pub fn table(&self) -> &Arc<SurveyTable> {
        &self.table
    }

    /// Cached view for `query`, computed on first request.
    pub fn view(&mut self, query: &ViewQuery) -> Result<Arc<SectionView>> {
        if let Some(view) = self.cache.get(query) {
            return Ok(Arc::clone(view));
        }

        debug!("Computing view for {:?}", query);
        let view = Arc::new(self.compute(query)?);
        // Only the latest company selection is kept
        if let ViewQuery::Companies(_) = query {
            self.cache.retain(|cached, _| !matches!(cached, ViewQuery::Companies(_)));
        }
        self.computed += 1;
        self.cache.insert(query.clone(), Arc::clone(&view));
        Ok(view)
    }

    /// Number of views currently cached.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Number of cache misses served so far.
    pub fn computed(&self) -> usize {
        self.computed
    }

    fn compute(&self, query: &ViewQuery) -> Result<SectionView> {
        let records = self.table.records();
        let analyzer = DataAnalyzer::new(records, self.intervals);
        let visualizer = &self.visualizer;

        let view = match query {
            ViewQuery::Overview => {
                let overview = analysis::overview(&self.table);
                SectionView::Overview {
                    product_chart: visualizer.product_distribution_chart(&overview.product_distribution),
                    overview,
                    loaded_at: self.table.loaded_at(),
                    records: records.to_vec(),
                }
            }
            ViewQuery::DescriptiveStatistics => {
                let hygiene = analyzer.hygiene_statistics()?;
                SectionView::DescriptiveStatistics {
                    breakdown_chart: visualizer.indicator_breakdown(&hygiene),
                    hygiene,
                    staff: analyzer.staff_statistics()?,
                }
            }
            ViewQuery::Companies(ids) => {
                let profiles = compare_companies(records, ids);
                let details = ids.iter()
                    .filter_map(|id| records.iter().find(|r| &r.company_id == id).cloned())
                    .collect();
                SectionView::Companies {
                    radar: visualizer.company_radar(&profiles),
                    profiles,
                    details,
                }
            }
            ViewQuery::Obstacles => {
                let barriers = analyzer.barrier_summary()?;
                let specific = analyzer.specific_obstacles();
                SectionView::Obstacles {
                    barrier_chart: visualizer.barrier_chart(&barriers),
                    specific_chart: visualizer.specific_obstacles_chart(&specific),
                    barriers,
                    specific,
                }
            }
            ViewQuery::Training => SectionView::Training {
                training: analyzer.training_statistics()?,
                distribution_chart: visualizer.training_chart(&analyzer.training_distribution()),
                correlation_chart: visualizer.correlation_heatmap(&analyzer.training_correlation()),
            },
            ViewQuery::Comparisons => SectionView::Comparisons {
                comparison_chart: visualizer.company_comparison(&analyzer.company_scores()),
                boxplot: visualizer.hygiene_boxplot(&analyzer.practice_distributions()),
                product_chart: visualizer.product_type_chart(&analyzer.product_type_scores()),
            },
        };

        Ok(view)
    }
}
