// src/analysis/stats.rs

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use statrs::distribution::{Binomial, ContinuousCDF, DiscreteCDF, Normal};
use statrs::statistics::Statistics;
use crate::config::Response;
use crate::error::{HygieneError, Result};

pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "String", try_from = "String")]
pub enum IntervalMethod {
    Wilson,
    Normal,
    ExactBinomial,
}

impl Default for IntervalMethod {
    fn default() -> Self {
        IntervalMethod::Wilson
    }
}

impl fmt::Display for IntervalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntervalMethod::Wilson => "wilson",
            IntervalMethod::Normal => "normal",
            IntervalMethod::ExactBinomial => "exact",
        };
        write!(f, "{name}")
    }
}

impl FromStr for IntervalMethod {
    type Err = HygieneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "wilson" => Ok(IntervalMethod::Wilson),
            "normal" | "wald" => Ok(IntervalMethod::Normal),
            "exact" | "binomial" | "exact_binomial" => Ok(IntervalMethod::ExactBinomial),
            other => Err(HygieneError::InvalidArgument(format!(
                "unknown interval method '{other}'"
            ))),
        }
    }
}

impl From<IntervalMethod> for String {
    fn from(method: IntervalMethod) -> Self {
        method.to_string()
    }
}

impl TryFrom<String> for IntervalMethod {
    type Error = HygieneError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Level and method applied to every interval the analyzer reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalSettings {
    pub level: f64,
    pub method: IntervalMethod,
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_CONFIDENCE_LEVEL,
            method: IntervalMethod::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceInterval {
    pub confidence_level: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Confidence interval for a binomial proportion, clamped to [0, 1].
pub fn confidence_interval(
    successes: usize,
    total: usize,
    level: f64,
    method: IntervalMethod,
) -> Result<ConfidenceInterval> {
    if total == 0 {
        return Err(HygieneError::InsufficientSample);
    }
    if successes > total {
        return Err(HygieneError::InvalidArgument(format!(
            "{successes} successes out of {total} trials"
        )));
    }
    if !(level > 0.0 && level < 1.0) {
        return Err(HygieneError::InvalidArgument(format!(
            "confidence level {level} outside (0, 1)"
        )));
    }

    let n = total as f64;
    let p = successes as f64 / n;

    let (lower, upper) = match method {
        IntervalMethod::Wilson => {
            let z = z_score(level)?;
            let z2 = z * z;
            let denom = 1.0 + z2 / n;
            let centre = (p + z2 / (2.0 * n)) / denom;
            let half = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;
            (centre - half, centre + half)
        }
        IntervalMethod::Normal => {
            let z = z_score(level)?;
            let half = z * (p * (1.0 - p) / n).sqrt();
            (p - half, p + half)
        }
        IntervalMethod::ExactBinomial => {
            if successes == 0 {
                (0.0, 0.0)
            } else {
                let binomial = Binomial::new(p, total as u64)
                    .map_err(|e| HygieneError::Statistics(e.to_string()))?;
                let alpha = (1.0 - level) / 2.0;
                (
                    binomial_quantile(&binomial, total as u64, alpha) as f64 / n,
                    binomial_quantile(&binomial, total as u64, 1.0 - alpha) as f64 / n,
                )
            }
        }
    };

    let lower = lower.clamp(0.0, 1.0);
    let upper = upper.clamp(0.0, 1.0);

    Ok(ConfidenceInterval {
        confidence_level: level,
        lower_bound: lower.min(upper),
        upper_bound: upper,
    })
}

// Smallest k in 0..=trials with cdf(k) >= q.
fn binomial_quantile(binomial: &Binomial, trials: u64, q: f64) -> u64 {
    (0..trials)
        .find(|&k| binomial.cdf(k) >= q)
        .unwrap_or(trials)
}

// Two-sided standard normal quantile.
fn z_score(level: f64) -> Result<f64> {
    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| HygieneError::Statistics(e.to_string()))?;
    Ok(standard.inverse_cdf(1.0 - (1.0 - level) / 2.0))
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseCounts {
    pub yes: usize,
    pub no: usize,
    pub unknown: usize,
}

impl ResponseCounts {
    pub fn tally<I: IntoIterator<Item = Response>>(responses: I) -> Self {
        responses.into_iter().fold(Self::default(), |mut acc, response| {
            acc.add(response);
            acc
        })
    }

    pub fn add(&mut self, response: Response) {
        match response {
            Response::Yes => self.yes += 1,
            Response::No => self.no += 1,
            Response::Unknown => self.unknown += 1,
        }
    }

    pub fn count(&self, response: Response) -> usize {
        match response {
            Response::Yes => self.yes,
            Response::No => self.no,
            Response::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> usize {
        self.yes + self.no + self.unknown
    }

    /// Answers other than Unknown.
    pub fn known(&self) -> usize {
        self.yes + self.no
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ResponseShares {
    pub counts: ResponseCounts,
    pub yes: f64,
    pub no: f64,
    pub unknown: f64,
}

impl ResponseShares {
    pub fn share(&self, response: Response) -> f64 {
        match response {
            Response::Yes => self.yes,
            Response::No => self.no,
            Response::Unknown => self.unknown,
        }
    }
}

/// Tri-state proportions, with an explicit marker for empty input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Proportions {
    NoData,
    Observed(ResponseShares),
}

impl Proportions {
    pub fn from_counts(counts: ResponseCounts) -> Self {
        let total = counts.total();
        if total == 0 {
            return Proportions::NoData;
        }
        let n = total as f64;
        Proportions::Observed(ResponseShares {
            counts,
            yes: counts.yes as f64 / n,
            no: counts.no as f64 / n,
            unknown: counts.unknown as f64 / n,
        })
    }

    pub fn shares(&self) -> Option<&ResponseShares> {
        match self {
            Proportions::NoData => None,
            Proportions::Observed(shares) => Some(shares),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Proportions::NoData)
    }
}

/// A counted proportion with its interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProportionEstimate {
    pub count: usize,
    pub total: usize,
    pub proportion: f64,
    pub confidence_interval: ConfidenceInterval,
}

impl ProportionEstimate {
    pub fn new(count: usize, total: usize, settings: IntervalSettings) -> Result<Self> {
        let confidence_interval =
            confidence_interval(count, total, settings.level, settings.method)?;
        Ok(Self {
            count,
            total,
            proportion: count as f64 / total as f64,
            confidence_interval,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Descriptive summary using linear quantile interpolation.
pub fn describe(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = values.iter().mean();
    // Sample standard deviation is undefined for a single value
    let std_dev = if values.len() > 1 {
        Some(values.iter().std_dev())
    } else {
        None
    };
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);

    Some(Summary {
        count: values.len(),
        mean,
        median: quantile(&sorted, 0.5),
        std_dev,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        q1,
        q3,
        iqr: q3 - q1,
    })
}

/// Quantile of already-sorted data, interpolating between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Pearson correlation; `None` when fewer than two pairs or a constant side.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
