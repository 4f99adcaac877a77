//! Shared fixtures for unit tests.

use crate::data::AsteroidRecord;
use chrono::NaiveDate;
use std::path::PathBuf;
use tempfile::TempDir;

pub const SAMPLE_HEADER: &str = "Neo Reference ID,Name,Absolute Magnitude,Est Dia in KM(min),\
Est Dia in KM(max),Close Approach Date,Miles per hour,Miss Dist.(kilometers),Orbiting Body,\
Orbit ID,Minimum Orbit Intersection,Equinox,Hazardous";

/// Six approaches, two of them before 2000 (rows 0 and 2).
pub const SAMPLE_CSV: &str = "Neo Reference ID,Name,Absolute Magnitude,Est Dia in KM(min),\
Est Dia in KM(max),Close Approach Date,Miles per hour,Miss Dist.(kilometers),Orbiting Body,\
Orbit ID,Minimum Orbit Intersection,Equinox,Hazardous
3703080,3703080,21.6,0.127,0.285,1995-01-01,13326.9,62753692.0,Earth,17,0.025,J2000,True
3723955,3723955,21.3,0.146,0.327,2000-01-01,39967.4,57298148.0,Earth,21,0.186,J2000,False
2446862,2446862,20.3,0.231,0.517,1999-12-31,24670.9,7622911.5,Earth,22,0.043,J2000,False
3092506,3092506,27.4,0.009,0.020,2008-01-15,25651.7,42683616.0,Earth,7,0.005,J2000,True
3396514,3396514,21.6,0.127,0.285,2012-06-04,54021.4,61010824.0,Earth,25,0.035,J2000,False
3514593,3514593,19.6,0.320,0.716,2015-11-30,27429.6,8543066.0,Earth,40,0.308,J2000,False
";

pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// A record with neutral values; tests override the fields they care about.
pub fn record(name: &str) -> AsteroidRecord {
    AsteroidRecord {
        name: name.to_string(),
        close_approach_date: NaiveDate::from_ymd_opt(2010, 6, 1).unwrap(),
        absolute_magnitude: 20.0,
        hazardous: false,
        miss_distance_km: 1_000_000.0,
        est_diameter_min_km: 0.1,
        est_diameter_max_km: 0.2,
        orbit_id: "1".to_string(),
        speed_mph: 30_000.0,
        min_orbit_intersection: 0.05,
    }
}
