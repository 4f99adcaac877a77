//! Data Processor Module
//! Handles data cleaning: column pruning and the close-approach year filter.

use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use super::loader::RawDataset;
use super::record::AsteroidRecord;

/// Earliest close-approach year kept by the cleaner (inclusive).
pub const MIN_APPROACH_YEAR: i32 = 2000;

/// Columns carried by the NASA export that play no part in the analysis.
pub const IRRELEVANT_COLUMNS: [&str; 3] = ["Orbiting Body", "Neo Reference ID", "Equinox"];

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Table after cleaning. Row `i` of `frame` is `records[i]`.
#[derive(Debug, Clone)]
pub struct CleanDataset {
    pub frame: DataFrame,
    pub records: Vec<AsteroidRecord>,
}

impl CleanDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> DatasetSummary {
        DataProcessor::summary(&self.frame)
    }
}

/// Shape and column types of a table, for diagnostic printing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: usize,
    pub column_types: Vec<(String, String)>,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} rows x {} columns", self.rows, self.columns)?;
        for (name, dtype) in &self.column_types {
            writeln!(f, "  {name:<32} {dtype}")?;
        }
        Ok(())
    }
}

/// Handles data cleaning operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Drop irrelevant columns and keep approaches from `MIN_APPROACH_YEAR` onward.
    pub fn clean(raw: RawDataset) -> Result<CleanDataset, ProcessorError> {
        let RawDataset { frame, records } = raw;
        let before = records.len();

        let frame = Self::drop_irrelevant_columns(frame)?;

        let keep: Vec<bool> = records
            .iter()
            .map(|r| r.approach_year() >= MIN_APPROACH_YEAR)
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let frame = frame.filter(&mask)?;

        let records: Vec<AsteroidRecord> = records
            .into_iter()
            .zip(keep)
            .filter_map(|(record, kept)| kept.then_some(record))
            .collect();

        log::info!(
            "cleaning kept {} of {} rows ({} before {})",
            records.len(),
            before,
            before - records.len(),
            MIN_APPROACH_YEAR
        );
        if records.is_empty() {
            log::warn!("no close approaches from {MIN_APPROACH_YEAR} onward");
        }

        Ok(CleanDataset { frame, records })
    }

    fn drop_irrelevant_columns(mut df: DataFrame) -> Result<DataFrame, ProcessorError> {
        for name in IRRELEVANT_COLUMNS {
            if df.get_column_index(name).is_some() {
                df = df.drop(name)?;
            } else {
                log::debug!("column '{name}' not present, nothing to drop");
            }
        }
        Ok(df)
    }

    /// Row count, column count and column dtypes of `df`.
    pub fn summary(df: &DataFrame) -> DatasetSummary {
        let (rows, columns) = df.shape();
        let column_types = df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.dtype().to_string()))
            .collect();

        DatasetSummary {
            rows,
            columns,
            column_types,
        }
    }
}
