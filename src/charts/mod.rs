//! Charts module - Chart data and static rendering

mod plotter;
mod renderer;

use thiserror::Error;

use crate::stats::StatsError;

pub use renderer::StaticChartRenderer;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Dataset is empty: cannot draw {0}")]
    EmptyDataset(&'static str),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
