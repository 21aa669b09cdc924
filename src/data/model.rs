use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Indicator – one of the three tracked numeric series
// ---------------------------------------------------------------------------

/// The tracked urban indicators, in the column order of the source CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Pollution,
    Traffic,
    GreenArea,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Pollution, Indicator::Traffic, Indicator::GreenArea];

    /// Column name in the source CSV.
    pub fn column(self) -> &'static str {
        match self {
            Indicator::Pollution => "poluicao",
            Indicator::Traffic => "transito",
            Indicator::GreenArea => "areas_verdes",
        }
    }

    /// Human-readable label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Pollution => "Pollution",
            Indicator::Traffic => "Traffic",
            Indicator::GreenArea => "Green areas",
        }
    }

    /// Position of this indicator in [`Indicator::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Observation – one day of the dataset
// ---------------------------------------------------------------------------

/// A single daily row. Missing or non-numeric cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub pollution: Option<f64>,
    pub traffic: Option<f64>,
    pub green_area: Option<f64>,
}

impl Observation {
    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Pollution => self.pollution,
            Indicator::Traffic => self.traffic,
            Indicator::GreenArea => self.green_area,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the normalized, immutable table
// ---------------------------------------------------------------------------

/// Observations in source order. Filtering always builds a new `Dataset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Present values of one indicator, in row order.
    pub fn values(&self, indicator: Indicator) -> Vec<f64> {
        self.observations
            .iter()
            .filter_map(|obs| obs.value(indicator))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// DateInterval – inclusive [start, end]
// ---------------------------------------------------------------------------

/// Inclusive date range. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}
