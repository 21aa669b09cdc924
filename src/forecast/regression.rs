use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::TAU;

use chrono::{Datelike, Duration, NaiveDate};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{
    LinearRegression, LinearRegressionParameters, LinearRegressionSolverName,
};
use statrs::distribution::{ContinuousCDF, Normal};

use super::{ForecastError, ForecastPoint, Forecaster, Horizon};

/// Distinct dates required before a weekly term is added to the trend.
const MIN_DATES_FOR_SEASONALITY: usize = 14;

/// Distinct weekdays required so the weekly term is not collinear with the intercept.
const MIN_WEEKDAYS_FOR_SEASONALITY: usize = 3;

/// Linear trend plus an optional weekly sine/cosine term, fitted by least squares.
#[derive(Debug, Clone, Copy)]
pub struct TrendSeasonalForecaster {
    /// Coverage of the uncertainty band, e.g. 0.8 for an 80 % interval.
    pub interval_width: f64,
}

impl Default for TrendSeasonalForecaster {
    fn default() -> Self {
        Self { interval_width: 0.8 }
    }
}

impl TrendSeasonalForecaster {
    fn z_score(&self) -> Result<f64, ForecastError> {
        let normal = Normal::new(0.0, 1.0).map_err(|e| ForecastError::Model(e.to_string()))?;
        Ok(normal.inverse_cdf(0.5 + self.interval_width.clamp(0.0, 0.999) / 2.0))
    }
}

/// Mean value per date, sorted by date.
fn daily_means(history: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, f64)> {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for &(date, value) in history.iter().filter(|(_, v)| v.is_finite()) {
        let entry = sums.entry(date).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (sum, n))| (date, sum / n as f64))
        .collect()
}

fn features(date: NaiveDate, origin: NaiveDate, seasonal: bool) -> Vec<f64> {
    let t = (date - origin).num_days() as f64;
    if seasonal {
        let phase = TAU * t / 7.0;
        vec![t, phase.sin(), phase.cos()]
    } else {
        vec![t]
    }
}

impl Forecaster for TrendSeasonalForecaster {
    fn forecast(
        &self,
        history: &[(NaiveDate, f64)],
        horizon: Horizon,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        let daily = daily_means(history);
        let (origin, last) = match (daily.first(), daily.last()) {
            (Some(&(first, _)), Some(&(last, _))) if daily.len() >= 2 => (first, last),
            _ => return Err(ForecastError::InsufficientHistory(daily.len())),
        };

        let weekdays: BTreeSet<u32> = daily
            .iter()
            .map(|(d, _)| d.weekday().num_days_from_monday())
            .collect();
        let seasonal = daily.len() >= MIN_DATES_FOR_SEASONALITY
            && weekdays.len() >= MIN_WEEKDAYS_FOR_SEASONALITY;

        let rows: Vec<Vec<f64>> = daily
            .iter()
            .map(|&(d, _)| features(d, origin, seasonal))
            .collect();
        let y: Vec<f64> = daily.iter().map(|&(_, v)| v).collect();

        let x = DenseMatrix::from_2d_vec(&rows).map_err(|e| ForecastError::Model(e.to_string()))?;
        let params = LinearRegressionParameters::default()
            .with_solver(LinearRegressionSolverName::QR);
        let model = LinearRegression::fit(&x, &y, params)
            .map_err(|e| ForecastError::Model(e.to_string()))?;

        let fitted = model
            .predict(&x)
            .map_err(|e| ForecastError::Model(e.to_string()))?;

        // Residual spread, with one degree of freedom per coefficient.
        let n_params = rows[0].len() + 1;
        let dof = y.len().saturating_sub(n_params);
        let sigma = if dof == 0 {
            0.0
        } else {
            let sse: f64 = y.iter().zip(&fitted).map(|(a, b)| (a - b).powi(2)).sum();
            (sse / dof as f64).sqrt()
        };
        let half_width = self.z_score()? * sigma;

        let dates: Vec<NaiveDate> = daily
            .iter()
            .map(|&(d, _)| d)
            .chain((1..=horizon.days()).map(|k| last + Duration::days(k as i64)))
            .collect();
        let all_rows: Vec<Vec<f64>> = dates
            .iter()
            .map(|&d| features(d, origin, seasonal))
            .collect();
        let all_x =
            DenseMatrix::from_2d_vec(&all_rows).map_err(|e| ForecastError::Model(e.to_string()))?;
        let predicted = model
            .predict(&all_x)
            .map_err(|e| ForecastError::Model(e.to_string()))?;

        log::debug!(
            "Forecast fitted on {} dates (seasonal: {seasonal}, sigma: {sigma:.3}), {} days ahead",
            daily.len(),
            horizon.days()
        );

        Ok(dates
            .into_iter()
            .zip(predicted)
            .map(|(date, p)| ForecastPoint {
                date,
                predicted: p,
                lower: p - half_width,
                upper: p + half_width,
            })
            .collect())
    }
}
