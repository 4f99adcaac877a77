//! Asteroid Record Module
//! Typed row model and the column mapping for the NASA close-approach CSV.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::Serialize;

use super::loader::LoaderError;

pub const NAME: &str = "Name";
pub const CLOSE_APPROACH_DATE: &str = "Close Approach Date";
pub const ABSOLUTE_MAGNITUDE: &str = "Absolute Magnitude";
pub const HAZARDOUS: &str = "Hazardous";
pub const MISS_DISTANCE_KM: &str = "Miss Dist.(kilometers)";
pub const EST_DIAMETER_MIN_KM: &str = "Est Dia in KM(min)";
pub const EST_DIAMETER_MAX_KM: &str = "Est Dia in KM(max)";
pub const ORBIT_ID: &str = "Orbit ID";
pub const SPEED_MPH: &str = "Miles per hour";
pub const MIN_ORBIT_INTERSECTION: &str = "Minimum Orbit Intersection";

/// Columns that must be present in the header for a file to be accepted.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    NAME,
    CLOSE_APPROACH_DATE,
    ABSOLUTE_MAGNITUDE,
    HAZARDOUS,
    MISS_DISTANCE_KM,
    EST_DIAMETER_MIN_KM,
    EST_DIAMETER_MAX_KM,
    ORBIT_ID,
    SPEED_MPH,
    MIN_ORBIT_INTERSECTION,
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One close approach of a near-Earth asteroid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsteroidRecord {
    pub name: String,
    pub close_approach_date: NaiveDate,
    pub absolute_magnitude: f64,
    pub hazardous: bool,
    pub miss_distance_km: f64,
    pub est_diameter_min_km: f64,
    pub est_diameter_max_km: f64,
    pub orbit_id: String,
    pub speed_mph: f64,
    pub min_orbit_intersection: f64,
}

impl AsteroidRecord {
    /// Mean of the estimated minimum and maximum diameters.
    pub fn average_diameter_km(&self) -> f64 {
        (self.est_diameter_min_km + self.est_diameter_max_km) / 2.0
    }

    pub fn approach_year(&self) -> i32 {
        self.close_approach_date.year()
    }

    /// Build one record per row from the required columns of `df`.
    ///
    /// Every cell is coerced once here; later stages never look columns up by name.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<AsteroidRecord>, LoaderError> {
        let names = text_column(df, NAME)?;
        let dates = date_column(df)?;
        let magnitudes = float_column(df, ABSOLUTE_MAGNITUDE)?;
        let hazardous = bool_column(df)?;
        let miss_distances = float_column(df, MISS_DISTANCE_KM)?;
        let dia_min = float_column(df, EST_DIAMETER_MIN_KM)?;
        let dia_max = float_column(df, EST_DIAMETER_MAX_KM)?;
        let orbit_ids = text_column(df, ORBIT_ID)?;
        let speeds = float_column(df, SPEED_MPH)?;
        let intersections = float_column(df, MIN_ORBIT_INTERSECTION)?;

        let records = (0..df.height())
            .map(|i| AsteroidRecord {
                name: names[i].clone(),
                close_approach_date: dates[i],
                absolute_magnitude: magnitudes[i],
                hazardous: hazardous[i],
                miss_distance_km: miss_distances[i],
                est_diameter_min_km: dia_min[i],
                est_diameter_max_km: dia_max[i],
                orbit_id: orbit_ids[i].clone(),
                speed_mph: speeds[i],
                min_orbit_intersection: intersections[i],
            })
            .collect();

        Ok(records)
    }
}

/// `row` is the 0-based data row; the header occupies line 1.
fn invalid(column: &str, row: usize, value: impl Into<String>) -> LoaderError {
    LoaderError::InvalidValue {
        column: column.to_string(),
        line: row + 2,
        value: value.into(),
    }
}

/// Read a column as strings, whatever dtype Polars inferred for it.
fn string_cells(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>, LoaderError> {
    let as_text = df.column(column)?.cast(&DataType::String)?;
    let ca = as_text.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

fn text_column(df: &DataFrame, column: &str) -> Result<Vec<String>, LoaderError> {
    string_cells(df, column)?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(invalid(column, row, "")),
        })
        .collect()
}

fn float_column(df: &DataFrame, column: &str) -> Result<Vec<f64>, LoaderError> {
    let raw = string_cells(df, column)?;
    let as_f64 = df.column(column)?.cast(&DataType::Float64)?;
    let ca = as_f64.f64()?;

    ca.into_iter()
        .enumerate()
        .map(|(row, v)| match v {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(invalid(column, row, raw[row].clone().unwrap_or_default())),
        })
        .collect()
}

fn bool_column(df: &DataFrame) -> Result<Vec<bool>, LoaderError> {
    string_cells(df, HAZARDOUS)?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            let cell = cell.unwrap_or_default();
            parse_bool(&cell).ok_or_else(|| invalid(HAZARDOUS, row, cell))
        })
        .collect()
}

fn date_column(df: &DataFrame) -> Result<Vec<NaiveDate>, LoaderError> {
    string_cells(df, CLOSE_APPROACH_DATE)?
        .into_iter()
        .enumerate()
        .map(|(row, cell)| {
            let cell = cell.unwrap_or_default();
            parse_date(&cell).ok_or_else(|| invalid(CLOSE_APPROACH_DATE, row, cell))
        })
        .collect()
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Only the leading `YYYY-MM-DD` is significant; any time part is ignored.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_booleans_case_insensitively() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("FALSE"), Some(false));
        assert_eq!(parse_bool(" true "), Some(true));
        assert_eq!(parse_bool("yes"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn parses_dates_ignoring_time_suffix() {
        let expected = NaiveDate::from_ymd_opt(2001, 3, 14);
        assert_eq!(parse_date("2001-03-14"), expected);
        assert_eq!(parse_date("2001-03-14 00:00:00"), expected);
        assert_eq!(parse_date("14/03/2001"), None);
    }

    #[test]
    fn average_diameter_is_mean_of_bounds() {
        let record = AsteroidRecord {
            name: "3703080".into(),
            close_approach_date: NaiveDate::from_ymd_opt(2005, 1, 1).unwrap(),
            absolute_magnitude: 21.6,
            hazardous: false,
            miss_distance_km: 62_753_692.0,
            est_diameter_min_km: 0.127,
            est_diameter_max_km: 0.285,
            orbit_id: "17".into(),
            speed_mph: 13_326.9,
            min_orbit_intersection: 0.025,
        };
        assert!((record.average_diameter_km() - 0.206).abs() < 1e-12);
        assert_eq!(record.approach_year(), 2005);
    }
}
