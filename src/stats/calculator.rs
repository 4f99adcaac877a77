//! Insight Calculator Module
//! Descriptive queries over the cleaned asteroid table.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use super::StatsError;
use crate::data::AsteroidRecord;

/// Asteroid with the highest absolute magnitude.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagnitudeLeader {
    pub name: String,
    pub absolute_magnitude: f64,
}

/// Asteroid that passed nearest to Earth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosestApproach {
    pub name: String,
    pub miss_distance_km: f64,
    pub close_approach_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrbitFrequency {
    pub orbit_id: String,
    pub count: usize,
}

/// How many asteroids exceed the mean estimated maximum diameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiameterThreshold {
    pub mean_max_diameter_km: f64,
    pub above_mean: usize,
    pub total: usize,
}

/// All four insights for one cleaned table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub max_absolute_magnitude: MagnitudeLeader,
    pub closest_approach: ClosestApproach,
    pub common_orbits: Vec<OrbitFrequency>,
    pub above_average_max_diameter: DiameterThreshold,
}

impl fmt::Display for Insights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leader = &self.max_absolute_magnitude;
        writeln!(
            f,
            "Highest absolute magnitude: {} ({:.2})",
            leader.name, leader.absolute_magnitude
        )?;

        let closest = &self.closest_approach;
        writeln!(
            f,
            "Closest approach: {} at {:.1} km on {}",
            closest.name, closest.miss_distance_km, closest.close_approach_date
        )?;

        writeln!(f, "Orbit ID frequencies:")?;
        for entry in &self.common_orbits {
            writeln!(f, "  {:>6}  {}", entry.orbit_id, entry.count)?;
        }

        let diameter = &self.above_average_max_diameter;
        writeln!(
            f,
            "Above-average max diameter: {} of {} (mean {:.4} km)",
            diameter.above_mean, diameter.total, diameter.mean_max_diameter_km
        )
    }
}

/// Side-effect-free queries over a slice of records.
pub struct InsightCalculator;

impl InsightCalculator {
    /// Highest absolute magnitude; the earliest row wins a tie.
    pub fn max_absolute_magnitude(
        records: &[AsteroidRecord],
    ) -> Result<MagnitudeLeader, StatsError> {
        let best = Self::first_extreme(records, "max absolute magnitude", |candidate, best| {
            candidate.absolute_magnitude > best.absolute_magnitude
        })?;

        Ok(MagnitudeLeader {
            name: best.name.clone(),
            absolute_magnitude: best.absolute_magnitude,
        })
    }

    /// Smallest miss distance; the earliest row wins a tie.
    pub fn closest_approach(records: &[AsteroidRecord]) -> Result<ClosestApproach, StatsError> {
        let best = Self::first_extreme(records, "closest approach", |candidate, best| {
            candidate.miss_distance_km < best.miss_distance_km
        })?;

        Ok(ClosestApproach {
            name: best.name.clone(),
            miss_distance_km: best.miss_distance_km,
            close_approach_date: best.close_approach_date,
        })
    }

    /// Occurrences per orbit ID, most frequent first, then by orbit ID.
    pub fn common_orbits(records: &[AsteroidRecord]) -> Result<Vec<OrbitFrequency>, StatsError> {
        if records.is_empty() {
            return Err(StatsError::EmptyDataset("common orbit IDs"));
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *counts.entry(record.orbit_id.as_str()).or_default() += 1;
        }

        let mut frequencies: Vec<OrbitFrequency> = counts
            .into_iter()
            .map(|(orbit_id, count)| OrbitFrequency {
                orbit_id: orbit_id.to_string(),
                count,
            })
            .collect();
        frequencies.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| orbit_order(&a.orbit_id, &b.orbit_id))
        });

        Ok(frequencies)
    }

    /// Count rows whose maximum estimated diameter is strictly above the mean.
    pub fn above_average_max_diameter(
        records: &[AsteroidRecord],
    ) -> Result<DiameterThreshold, StatsError> {
        if records.is_empty() {
            return Err(StatsError::EmptyDataset("above-average max diameter"));
        }

        let total = records.len();
        let mean = records.iter().map(|r| r.est_diameter_max_km).sum::<f64>() / total as f64;
        let above_mean = records
            .iter()
            .filter(|r| r.est_diameter_max_km > mean)
            .count();

        Ok(DiameterThreshold {
            mean_max_diameter_km: mean,
            above_mean,
            total,
        })
    }

    pub fn compute_all(records: &[AsteroidRecord]) -> Result<Insights, StatsError> {
        Ok(Insights {
            max_absolute_magnitude: Self::max_absolute_magnitude(records)?,
            closest_approach: Self::closest_approach(records)?,
            common_orbits: Self::common_orbits(records)?,
            above_average_max_diameter: Self::above_average_max_diameter(records)?,
        })
    }

    fn first_extreme<'a>(
        records: &'a [AsteroidRecord],
        query: &'static str,
        beats: impl Fn(&AsteroidRecord, &AsteroidRecord) -> bool,
    ) -> Result<&'a AsteroidRecord, StatsError> {
        let (first, rest) = records
            .split_first()
            .ok_or(StatsError::EmptyDataset(query))?;

        Ok(rest
            .iter()
            .fold(first, |best, candidate| if beats(candidate, best) { candidate } else { best }))
    }
}

/// Numeric orbit IDs compare by value; anything else falls back to text order.
fn orbit_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}
