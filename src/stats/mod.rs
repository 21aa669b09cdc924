//! Statistics over a filtered dataset: headline metrics and correlations.

mod correlation;
mod summary;

use thiserror::Error;

use crate::data::model::Indicator;

pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use summary::{summarize, Summary};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("no values for {0} in the selected data")]
    NoValues(Indicator),
}
