use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::data::filter::clamp_date;
use crate::data::loader::DatasetLoader;
use crate::data::model::{DateInterval, Indicator};
use crate::forecast::{Horizon, TrendSeasonalForecaster};
use crate::pipeline::{render, PipelineError, Session, SessionError, ViewModel, ViewRequest};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Reads the source file once for the lifetime of the app.
    loader: DatasetLoader,

    /// Loaded session, or the reason the dashboard cannot start.
    pub session: Result<Session, SessionError>,

    /// Indicator shown in the main chart, metrics and forecast.
    pub indicator: Indicator,

    /// Selected period (None until a session is open).
    pub interval: Option<DateInterval>,

    /// Indicators drawn in the comparison chart.
    pub comparison: BTreeSet<Indicator>,

    pub horizon: Horizon,

    forecaster: TrendSeasonalForecaster,

    /// Result of the last recomputation.
    pub view: Option<Result<ViewModel, PipelineError>>,
}

impl AppState {
    /// Open the session through `loader` and compute the first view.
    pub fn new(loader: DatasetLoader) -> Self {
        let session = Session::open(&loader);
        let interval = session.as_ref().ok().map(|s| s.bounds);

        let mut state = Self {
            loader,
            session,
            indicator: Indicator::Pollution,
            interval,
            comparison: [Indicator::Pollution, Indicator::Traffic].into_iter().collect(),
            horizon: Horizon::default(),
            forecaster: TrendSeasonalForecaster::default(),
            view: None,
        };
        state.refresh();
        state
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    /// Current selections as a pipeline request.
    pub fn request(&self) -> Option<ViewRequest> {
        Some(ViewRequest {
            interval: self.interval?,
            indicator: self.indicator,
            comparison: self.comparison.iter().copied().collect(),
            horizon: self.horizon,
        })
    }

    /// Recompute the view after any selection change.
    pub fn refresh(&mut self) {
        let (Ok(session), Some(request)) = (&self.session, self.request()) else {
            self.view = None;
            return;
        };
        self.view = Some(render(&session.dataset, &request, &self.forecaster));
    }

    pub fn set_indicator(&mut self, indicator: Indicator) {
        if self.indicator != indicator {
            self.indicator = indicator;
            self.refresh();
        }
    }

    /// Move the start of the period, kept within the data's date span.
    pub fn set_start(&mut self, date: NaiveDate) {
        self.update_interval(|bounds, interval| interval.start = clamp_date(date, bounds));
    }

    /// Move the end of the period, kept within the data's date span.
    pub fn set_end(&mut self, date: NaiveDate) {
        self.update_interval(|bounds, interval| interval.end = clamp_date(date, bounds));
    }

    /// Back to the full date span.
    pub fn reset_interval(&mut self) {
        self.update_interval(|bounds, interval| *interval = bounds);
    }

    fn update_interval(&mut self, edit: impl FnOnce(DateInterval, &mut DateInterval)) {
        let Ok(session) = &self.session else {
            return;
        };
        let bounds = session.bounds;
        if let Some(interval) = self.interval.as_mut() {
            edit(bounds, interval);
            self.refresh();
        }
    }

    pub fn toggle_comparison(&mut self, indicator: Indicator) {
        if !self.comparison.remove(&indicator) {
            self.comparison.insert(indicator);
        }
        self.refresh();
    }

    pub fn set_horizon(&mut self, days: u32) {
        let horizon = Horizon::new(days);
        if self.horizon != horizon {
            self.horizon = horizon;
            self.refresh();
        }
    }
}
