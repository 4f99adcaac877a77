//! Data module - CSV loading, typed records and cleaning

mod loader;
mod processor;
mod record;

pub use loader::{DataLoader, ErrorKind, LoaderError};
pub use processor::{DataProcessor, DatasetSummary};
pub use record::AsteroidRecord;
