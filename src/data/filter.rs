use chrono::NaiveDate;

use super::model::{Dataset, DateInterval};

// ---------------------------------------------------------------------------
// Date range filter
// ---------------------------------------------------------------------------

/// Keep only observations whose date lies in `interval` (both ends inclusive).
///
/// An inverted interval (`start > end`) yields an empty dataset.
pub fn filter_range(dataset: &Dataset, interval: DateInterval) -> Dataset {
    Dataset::new(
        dataset
            .observations
            .iter()
            .filter(|obs| interval.contains(obs.date))
            .cloned()
            .collect(),
    )
}

/// Earliest and latest dates present, or `None` for an empty dataset.
pub fn date_bounds(dataset: &Dataset) -> Option<DateInterval> {
    let mut dates = dataset.observations.iter().map(|obs| obs.date);
    let first = dates.next()?;
    let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateInterval::new(start, end))
}

/// Clamp a picked date into `bounds`.
pub fn clamp_date(date: NaiveDate, bounds: DateInterval) -> NaiveDate {
    date.max(bounds.start).min(bounds.end)
}
