//! From the loaded table to everything one dashboard frame shows.
//!
//! [`Session::open`] runs once and halts on missing or empty data;
//! [`render`] runs on every user interaction over the session's dataset.

use thiserror::Error;

use crate::data::filter::{date_bounds, filter_range};
use crate::data::loader::{DatasetLoader, LoadError};
use crate::data::model::{Dataset, DateInterval, Indicator};
use crate::data::normalize::normalize;
use crate::data::series::{select, select_many, IndicatorSeries};
use crate::forecast::{ForecastError, ForecastPoint, Forecaster, Horizon};
use crate::stats::{correlation_matrix, summarize, CorrelationMatrix, StatsError, Summary};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("no data found: the source file has no usable rows")]
    NoData,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("no data in the selected period {0}")]
    EmptyRange(DateInterval),
}

/// The normalized base dataset of one dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub dataset: Dataset,
    /// Full date span of `dataset`; the default and the limits of the filter.
    pub bounds: DateInterval,
    /// Rows dropped because their date did not parse.
    pub dropped_rows: usize,
}

impl Session {
    /// Load through `loader` and normalize. Halts before any filtering when
    /// the file is missing, has zero rows, or has no row with a valid date.
    pub fn open(loader: &DatasetLoader) -> Result<Self, SessionError> {
        let table = loader.load()?;
        if table.is_empty() {
            log::error!("{} has no data rows", loader.path().display());
            return Err(SessionError::NoData);
        }

        let normalized = normalize(table);
        let bounds = date_bounds(&normalized.dataset).ok_or_else(|| {
            log::error!("No row of {} has a valid date", loader.path().display());
            SessionError::NoData
        })?;

        log::info!(
            "Session ready: {} observations from {bounds}",
            normalized.dataset.len()
        );
        Ok(Self {
            dataset: normalized.dataset,
            bounds,
            dropped_rows: normalized.dropped,
        })
    }
}

/// User selections that drive one recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRequest {
    pub interval: DateInterval,
    pub indicator: Indicator,
    pub comparison: Vec<Indicator>,
    pub horizon: Horizon,
}

/// Everything the front end draws for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub interval: DateInterval,
    pub indicator: Indicator,
    /// The filtered rows, shown as the data table.
    pub filtered: Dataset,
    pub series: IndicatorSeries,
    /// Fails when the selected indicator has no values in the period.
    pub summary: Result<Summary, StatsError>,
    pub comparison: Vec<IndicatorSeries>,
    pub correlation: CorrelationMatrix,
    /// A failed forecast does not prevent the rest of the view.
    pub forecast: Result<Vec<ForecastPoint>, ForecastError>,
    pub horizon: Horizon,
}

/// Filter → select → summarize → correlate → forecast.
///
/// An empty filter result stops here with [`PipelineError::EmptyRange`]
/// rather than reaching the aggregator or the forecaster.
pub fn render(
    dataset: &Dataset,
    request: &ViewRequest,
    forecaster: &dyn Forecaster,
) -> Result<ViewModel, PipelineError> {
    let filtered = filter_range(dataset, request.interval);
    if filtered.is_empty() {
        log::warn!("No observations in {}", request.interval);
        return Err(PipelineError::EmptyRange(request.interval));
    }

    let series = select(&filtered, request.indicator);
    let summary = summarize(&filtered, request.indicator);
    if let Err(e) = &summary {
        log::warn!("Summary unavailable: {e}");
    }
    let comparison = select_many(&filtered, &request.comparison);
    let correlation = correlation_matrix(&filtered);

    let forecast = forecaster.forecast(&series.points, request.horizon);
    if let Err(e) = &forecast {
        log::warn!("Forecast for {} unavailable: {e}", request.indicator);
    }

    Ok(ViewModel {
        interval: request.interval,
        indicator: request.indicator,
        filtered,
        series,
        summary,
        comparison,
        correlation,
        forecast,
        horizon: request.horizon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;
    use crate::forecast::TrendSeasonalForecaster;
    use chrono::{Duration, NaiveDate};
    use std::path::PathBuf;

    fn day(i: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i)
    }

    fn dataset(n: i64) -> Dataset {
        Dataset::new(
            (0..n)
                .map(|i| Observation {
                    date: day(i),
                    pollution: Some(10.0 + i as f64),
                    traffic: Some(100.0 - i as f64),
                    green_area: Some(3.0),
                })
                .collect(),
        )
    }

    fn request(interval: DateInterval) -> ViewRequest {
        ViewRequest {
            interval,
            indicator: Indicator::Pollution,
            comparison: vec![Indicator::Pollution, Indicator::Traffic],
            horizon: Horizon::default(),
        }
    }

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "urban-monitor-{name}-{}.csv",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn renders_a_full_view() {
        let ds = dataset(30);
        let view = render(
            &ds,
            &request(DateInterval::new(day(5), day(24))),
            &TrendSeasonalForecaster::default(),
        )
        .unwrap();

        assert_eq!(view.filtered.len(), 20);
        assert_eq!(view.series.points.len(), 20);
        let summary = view.summary.as_ref().unwrap();
        assert_eq!(summary.min, 15.0);
        assert_eq!(summary.max, 34.0);
        assert_eq!(view.comparison.len(), 2);
        assert!((view.correlation.get(Indicator::Pollution, Indicator::Traffic) + 1.0).abs() < 1e-9);
        assert!(view.correlation.get(Indicator::Pollution, Indicator::GreenArea).is_nan());
        assert_eq!(view.forecast.as_ref().unwrap().len(), 20 + 14);
    }

    #[test]
    fn empty_range_halts_before_aggregation() {
        let ds = dataset(10);
        let interval = DateInterval::new(day(50), day(60));
        assert_eq!(
            render(&ds, &request(interval), &TrendSeasonalForecaster::default()),
            Err(PipelineError::EmptyRange(interval))
        );
    }

    #[test]
    fn inverted_range_is_empty() {
        let ds = dataset(10);
        let interval = DateInterval::new(day(8), day(2));
        assert!(matches!(
            render(&ds, &request(interval), &TrendSeasonalForecaster::default()),
            Err(PipelineError::EmptyRange(_))
        ));
    }

    #[test]
    fn single_day_keeps_the_view_but_not_the_forecast() {
        let ds = dataset(10);
        let view = render(
            &ds,
            &request(DateInterval::new(day(3), day(3))),
            &TrendSeasonalForecaster::default(),
        )
        .unwrap();
        assert_eq!(view.summary.as_ref().unwrap().mean, 13.0);
        assert_eq!(view.forecast, Err(ForecastError::InsufficientHistory(1)));
    }

    #[test]
    fn blank_indicator_keeps_the_rest_of_the_view() {
        let mut ds = dataset(20);
        for obs in &mut ds.observations {
            obs.pollution = None;
        }
        let view = render(
            &ds,
            &request(DateInterval::new(day(0), day(19))),
            &TrendSeasonalForecaster::default(),
        )
        .unwrap();

        assert_eq!(view.summary, Err(StatsError::NoValues(Indicator::Pollution)));
        assert!(view.series.is_empty());
        assert_eq!(view.filtered.len(), 20);
        assert_eq!(view.comparison.len(), 2);
        assert_eq!(view.comparison[1].points.len(), 20);
        assert!(view.correlation.get(Indicator::Pollution, Indicator::Traffic).is_nan());
        assert!(view.correlation.get(Indicator::Traffic, Indicator::GreenArea).is_nan());
        assert_eq!(view.correlation.get(Indicator::Traffic, Indicator::Traffic), 1.0);
        assert_eq!(view.forecast, Err(ForecastError::InsufficientHistory(0)));
    }

    #[test]
    fn session_opens_and_reports_dropped_rows() {
        let path = temp_csv(
            "session",
            "dia,poluicao,transito,areas_verdes\n\
             2024-01-02,1,2,3\n\
             bad,1,2,3\n\
             2024-01-01,4,5,6\n",
        );
        let session = Session::open(&DatasetLoader::new(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(session.dataset.len(), 2);
        assert_eq!(session.dropped_rows, 1);
        assert_eq!(session.bounds, DateInterval::new(day(0), day(1)));
    }

    #[test]
    fn zero_rows_halts_the_session() {
        let path = temp_csv("empty", "dia,poluicao,transito,areas_verdes\n");
        let outcome = Session::open(&DatasetLoader::new(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(outcome, Err(SessionError::NoData));
    }

    #[test]
    fn no_valid_dates_halts_the_session() {
        let path = temp_csv("baddates", "dia,poluicao,transito,areas_verdes\nx,1,2,3\n");
        let outcome = Session::open(&DatasetLoader::new(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(outcome, Err(SessionError::NoData));
    }

    #[test]
    fn missing_file_halts_the_session() {
        let outcome = Session::open(&DatasetLoader::new("nowhere/dados.csv"));
        assert!(matches!(outcome, Err(SessionError::Load(LoadError::NotFound(_)))));
    }
}
