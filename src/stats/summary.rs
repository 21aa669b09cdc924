use statrs::statistics::Statistics;

use super::StatsError;
use crate::data::model::{Dataset, Indicator};

/// Headline metrics of one indicator over a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Number of present (non-null) values the metrics were computed over.
    pub count: usize,
}

/// Max, min and arithmetic mean over the present values of `indicator`.
///
/// Callers are expected to check for an empty dataset first; this still
/// returns [`StatsError::NoValues`] instead of a meaningless result.
pub fn summarize(dataset: &Dataset, indicator: Indicator) -> Result<Summary, StatsError> {
    let values = dataset.values(indicator);
    if values.is_empty() {
        return Err(StatsError::NoValues(indicator));
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    Ok(Summary {
        max,
        min,
        mean: values.iter().mean(),
        count: values.len(),
    })
}
