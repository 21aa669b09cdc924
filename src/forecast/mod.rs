//! Forecasting collaborator.
//!
//! The dashboard only needs "history in, predictions with bounds out"; the
//! [`Forecaster`] trait is that seam. [`TrendSeasonalForecaster`] is the
//! shipped implementation, with the regression fit delegated to `smartcore`.

mod regression;

use chrono::NaiveDate;
use thiserror::Error;

pub use regression::TrendSeasonalForecaster;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("need at least 2 distinct dates to forecast, got {0}")]
    InsufficientHistory(usize),
    #[error("model fit failed: {0}")]
    Model(String),
}

/// Number of days to forecast past the last observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Horizon(u32);

impl Horizon {
    pub const MIN: u32 = 7;
    pub const MAX: u32 = 60;
    pub const DEFAULT: u32 = 14;

    /// Clamp `days` into `MIN..=MAX`.
    pub fn new(days: u32) -> Self {
        Self(days.clamp(Self::MIN, Self::MAX))
    }

    pub fn days(self) -> u32 {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// One predicted day. Covers both the fitted history and the horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

pub trait Forecaster {
    /// Fit on `history` (date, value) and predict every history date plus
    /// `horizon` days after the last one, in date order.
    fn forecast(
        &self,
        history: &[(NaiveDate, f64)],
        horizon: Horizon,
    ) -> Result<Vec<ForecastPoint>, ForecastError>;
}
