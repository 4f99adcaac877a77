//! Stats module - Descriptive insights and regression

mod calculator;
mod regression;

use thiserror::Error;

pub use calculator::{InsightCalculator, Insights};
pub use regression::{linregress, LinearFit};

/// Significance threshold for the regression slope test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Dataset is empty: cannot compute {0}")]
    EmptyDataset(&'static str),
    #[error("Regression needs at least two observations, got {0}")]
    TooFewObservations(usize),
    #[error("Regression is undefined: every x value is identical")]
    ConstantPredictor,
}
