//! CSV Data Loader Module
//! Validates the input path and loads the asteroid CSV using Polars.

use polars::prelude::*;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::record::{AsteroidRecord, REQUIRED_COLUMNS};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File '{0}' does not exist")]
    FileNotFound(PathBuf),
    #[error("File '{0}' cannot be read: {1}")]
    Unreadable(PathBuf, #[source] io::Error),
    #[error("File '{0}' is not a CSV file")]
    NotCsv(PathBuf),
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Invalid value {value:?} in column '{column}' at line {line}")]
    InvalidValue {
        column: String,
        /// 1-based line in the CSV file, header included.
        line: usize,
        value: String,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Coarse classification of loader failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input file missing or unreadable.
    Path,
    /// Wrong extension, unreadable structure, missing columns or bad cells.
    Format,
}

impl LoaderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoaderError::FileNotFound(_)
            | LoaderError::Unreadable(..)
            | LoaderError::CsvError(PolarsError::IO { .. }) => ErrorKind::Path,
            LoaderError::NotCsv(_)
            | LoaderError::MissingColumns(_)
            | LoaderError::InvalidValue { .. }
            | LoaderError::CsvError(_) => ErrorKind::Format,
        }
    }
}

/// Table as read from disk: every column, every row.
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub frame: DataFrame,
    pub records: Vec<AsteroidRecord>,
}

impl RawDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file and coerce the required columns into typed records.
    pub fn load_csv(file_path: &Path) -> Result<RawDataset, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::FileNotFound(file_path.to_path_buf()));
        }
        if !Self::has_csv_extension(file_path) {
            return Err(LoaderError::NotCsv(file_path.to_path_buf()));
        }
        File::open(file_path).map_err(|e| LoaderError::Unreadable(file_path.to_path_buf(), e))?;

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        Self::check_columns(&df)?;
        log::debug!(
            "read {} rows x {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        let records = AsteroidRecord::from_frame(&df)?;
        Ok(RawDataset { frame: df, records })
    }

    fn has_csv_extension(file_path: &Path) -> bool {
        file_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }

    fn check_columns(df: &DataFrame) -> Result<(), LoaderError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| df.get_column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LoaderError::MissingColumns(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{write_file, SAMPLE_CSV, SAMPLE_HEADER};

    #[test]
    fn loads_every_row_with_typed_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "nasa.csv", SAMPLE_CSV);

        let raw = DataLoader::load_csv(&path).unwrap();
        assert_eq!(raw.len(), 6);
        assert_eq!(raw.frame.height(), 6);

        let first = &raw.records[0];
        assert_eq!(first.name, "3703080");
        assert_eq!(first.orbit_id, "17");
        assert_eq!(first.absolute_magnitude, 21.6);
        assert!(first.hazardous);
        assert_eq!(first.miss_distance_km, 62753692.0);
        assert_eq!(first.est_diameter_min_km, 0.127);
        assert_eq!(first.est_diameter_max_km, 0.285);
        assert_eq!(first.speed_mph, 13326.9);
        assert_eq!(first.min_orbit_intersection, 0.025);
        assert_eq!(first.approach_year(), 1995);

        let hazard: Vec<bool> = raw.records.iter().map(|r| r.hazardous).collect();
        assert_eq!(hazard, vec![true, false, false, true, false, false]);
    }

    #[test]
    fn header_only_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.csv", &format!("{SAMPLE_HEADER}\n"));

        let raw = DataLoader::load_csv(&path).unwrap();
        assert!(raw.is_empty());
        assert_eq!(raw.frame.height(), 0);
    }

    #[test]
    fn missing_file_is_path_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::FileNotFound(_)));
        assert_eq!(err.kind(), ErrorKind::Path);
    }

    #[test]
    fn directory_is_path_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load_csv(dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Path);
    }

    #[test]
    fn read_failures_are_path_errors() {
        let denied = || io::Error::new(io::ErrorKind::PermissionDenied, "denied");

        let err = LoaderError::Unreadable(PathBuf::from("nasa.csv"), denied());
        assert_eq!(err.kind(), ErrorKind::Path);
        assert!(err.to_string().contains("cannot be read"));

        let err = LoaderError::from(PolarsError::from(denied()));
        assert!(matches!(err, LoaderError::CsvError(PolarsError::IO { .. })));
        assert_eq!(err.kind(), ErrorKind::Path);
    }

    #[test]
    fn non_io_polars_failure_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "blank.csv", "");
        if let Err(err) = DataLoader::load_csv(&path) {
            assert_eq!(err.kind(), ErrorKind::Format, "{err}");
        }
    }

    #[test]
    fn wrong_extension_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "nasa.txt", SAMPLE_CSV);
        let err = DataLoader::load_csv(&path).unwrap_err();
        assert!(matches!(err, LoaderError::NotCsv(_)));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn extension_check_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "NASA.CSV", SAMPLE_CSV);
        assert_eq!(DataLoader::load_csv(&path).unwrap().len(), 6);
    }

    #[test]
    fn missing_columns_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "partial.csv", "Name,Orbit ID\n2000433,1\n");
        match DataLoader::load_csv(&path).unwrap_err() {
            LoaderError::MissingColumns(cols) => {
                assert_eq!(cols.len(), REQUIRED_COLUMNS.len() - 2);
                assert!(cols.contains(&"Hazardous".to_string()));
                assert!(!cols.contains(&"Name".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_cell_reports_column_and_line() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{SAMPLE_HEADER}\n\
             1,2000433,10.3,12.0,27.0,2001-02-03,40000.0,1000000.0,Earth,8,0.1,J2000,Maybe\n"
        );
        let path = write_file(&dir, "bad.csv", &body);
        match DataLoader::load_csv(&path).unwrap_err() {
            err @ LoaderError::InvalidValue { .. } => {
                assert_eq!(err.kind(), ErrorKind::Format);
                let msg = err.to_string();
                assert!(msg.contains("Hazardous"), "{msg}");
                assert!(msg.contains("Maybe"), "{msg}");
                assert!(msg.contains("at line 2"), "{msg}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
