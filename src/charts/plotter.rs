//! Chart Plotter Module
//! Builds the data behind each chart: histogram bins, pie slices and the regression overlay.

use std::f64::consts::TAU;

use super::ChartError;
use crate::data::AsteroidRecord;
use crate::stats::{linregress, LinearFit, StatsError};

/// Bins used for the average-diameter histogram
pub const DIAMETER_BINS: usize = 100;
/// Bins used for the minimum-orbit-intersection histogram
pub const ORBIT_INTERSECTION_BINS: usize = 10;
/// Radial offset of the exploded pie slice, as a fraction of the radius
pub const PIE_EXPLODE: f64 = 0.1;

/// Equal-width histogram over the closed range of the input values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bucket `values` into `bins` equal-width bins.
    ///
    /// The last bin includes its right edge. When every value is equal the
    /// range is widened by half a unit on each side.
    pub fn from_values(values: &[f64], bins: usize) -> Result<Histogram, ChartError> {
        if values.is_empty() {
            return Err(ChartError::EmptyDataset("histogram"));
        }
        let bins = bins.max(1);

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Histogram { edges, counts })
    }

    /// `(left edge, right edge, count)` for every bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }

    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Hazardous versus non-hazardous counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardSplit {
    pub hazardous: usize,
    pub non_hazardous: usize,
}

/// One wedge of the hazard pie; angles in radians, counter-clockwise from the +x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: &'static str,
    pub hazardous: bool,
    pub count: usize,
    pub percentage: f64,
    pub start_angle: f64,
    pub sweep: f64,
    pub explode: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep / 2.0
    }
}

impl HazardSplit {
    pub fn total(&self) -> usize {
        self.hazardous + self.non_hazardous
    }

    /// Percentages of `(hazardous, non_hazardous)`.
    pub fn percentages(&self) -> (f64, f64) {
        let total = self.total() as f64;
        if total == 0.0 {
            return (0.0, 0.0);
        }
        (
            100.0 * self.hazardous as f64 / total,
            100.0 * self.non_hazardous as f64 / total,
        )
    }

    /// Non-empty slices in drawing order; the non-hazardous slice is exploded.
    pub fn slices(&self) -> Vec<PieSlice> {
        let (hazardous_pct, safe_pct) = self.percentages();
        let parts = [
            ("Hazardous", true, self.hazardous, hazardous_pct, 0.0),
            ("Non-hazardous", false, self.non_hazardous, safe_pct, PIE_EXPLODE),
        ];

        let mut start = 0.0;
        let mut slices = Vec::with_capacity(parts.len());
        for (label, hazardous, count, percentage, explode) in parts {
            if count == 0 {
                continue;
            }
            let sweep = TAU * percentage / 100.0;
            slices.push(PieSlice {
                label,
                hazardous,
                count,
                percentage,
                start_angle: start,
                sweep,
                explode,
            });
            start += sweep;
        }
        slices
    }
}

/// Scatter points of `(miss distance km, speed mph)` with their least-squares fit.
#[derive(Debug, Clone)]
pub struct RegressionChart {
    pub points: Vec<(f64, f64)>,
    /// `None` when fewer than two rows or a single distinct miss distance.
    pub fit: Option<LinearFit>,
}

impl RegressionChart {
    pub fn x_range(&self) -> (f64, f64) {
        axis_range(self.points.iter().map(|p| p.0))
    }

    pub fn y_range(&self) -> (f64, f64) {
        axis_range(self.points.iter().map(|p| p.1))
    }

    /// Endpoints of the fitted line across the x range.
    pub fn fitted_line(&self) -> Option<[(f64, f64); 2]> {
        let fit = self.fit?;
        let (x0, x1) = self.x_range();
        Some([(x0, fit.predict(x0)), (x1, fit.predict(x1))])
    }
}

fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

/// Creates chart data from the cleaned table without modifying it.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn diameter_histogram(records: &[AsteroidRecord]) -> Result<Histogram, ChartError> {
        Self::require_rows(records, "diameter histogram")?;
        let averages: Vec<f64> = records.iter().map(|r| r.average_diameter_km()).collect();
        Histogram::from_values(&averages, DIAMETER_BINS)
    }

    pub fn orbit_intersection_histogram(
        records: &[AsteroidRecord],
    ) -> Result<Histogram, ChartError> {
        Self::require_rows(records, "orbit intersection histogram")?;
        let values: Vec<f64> = records.iter().map(|r| r.min_orbit_intersection).collect();
        Histogram::from_values(&values, ORBIT_INTERSECTION_BINS)
    }

    pub fn hazard_split(records: &[AsteroidRecord]) -> Result<HazardSplit, ChartError> {
        Self::require_rows(records, "hazard pie chart")?;
        let hazardous = records.iter().filter(|r| r.hazardous).count();
        Ok(HazardSplit {
            hazardous,
            non_hazardous: records.len() - hazardous,
        })
    }

    pub fn regression_chart(records: &[AsteroidRecord]) -> Result<RegressionChart, ChartError> {
        Self::require_rows(records, "miss distance regression")?;
        let points: Vec<(f64, f64)> = records
            .iter()
            .map(|r| (r.miss_distance_km, r.speed_mph))
            .collect();
        let (x, y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        let fit = match linregress(&x, &y) {
            Ok(fit) => Some(fit),
            Err(err @ (StatsError::TooFewObservations(_) | StatsError::ConstantPredictor)) => {
                log::warn!("miss distance regression skipped: {err}");
                None
            }
            Err(err) => return Err(err.into()),
        };
        Ok(RegressionChart { points, fit })
    }

    fn require_rows(records: &[AsteroidRecord], chart: &'static str) -> Result<(), ChartError> {
        if records.is_empty() {
            Err(ChartError::EmptyDataset(chart))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn histogram_counts_every_value() {
        let values = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];
        let hist = Histogram::from_values(&values, 4).unwrap();

        assert_eq!(hist.edges, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(hist.counts, vec![2, 1, 1, 3]);
        assert_eq!(hist.total(), values.len());
        assert_eq!(hist.max_count(), 3);
        assert_eq!(hist.range(), (0.0, 1.0));
    }

    #[test]
    fn histogram_of_constant_values_widens_range() {
        let hist = Histogram::from_values(&[2.0, 2.0, 2.0], 10).unwrap();
        assert_eq!(hist.range(), (1.5, 2.5));
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.counts[5], 3);
    }

    #[test]
    fn histogram_bins_iterate_in_order() {
        let hist = Histogram::from_values(&[1.0, 3.0], 2).unwrap();
        let bins: Vec<(f64, f64, usize)> = hist.bins().collect();
        assert_eq!(bins, vec![(1.0, 2.0, 1), (2.0, 3.0, 1)]);
    }

    #[test]
    fn diameter_histogram_uses_average_diameter() {
        let rows: Vec<AsteroidRecord> = [(1.0, 3.0), (2.0, 2.0), (0.0, 8.0)]
            .iter()
            .map(|&(lo, hi)| AsteroidRecord {
                est_diameter_min_km: lo,
                est_diameter_max_km: hi,
                ..record("d")
            })
            .collect();
        let hist = ChartPlotter::diameter_histogram(&rows).unwrap();
        assert_eq!(hist.counts.len(), DIAMETER_BINS);
        let (lo, hi) = hist.range();
        assert_eq!(lo, 2.0);
        assert!((hi - 4.0).abs() < 1e-9);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn orbit_histogram_has_ten_bins() {
        let rows: Vec<AsteroidRecord> = (0..25)
            .map(|i| AsteroidRecord {
                min_orbit_intersection: i as f64 * 0.01,
                ..record("o")
            })
            .collect();
        let hist = ChartPlotter::orbit_intersection_histogram(&rows).unwrap();
        assert_eq!(hist.counts.len(), ORBIT_INTERSECTION_BINS);
        assert_eq!(hist.total(), 25);
    }

    #[test]
    fn hazard_split_percentages_and_slices() {
        let rows: Vec<AsteroidRecord> = (0..8)
            .map(|i| AsteroidRecord {
                hazardous: i < 2,
                ..record("h")
            })
            .collect();
        let split = ChartPlotter::hazard_split(&rows).unwrap();
        assert_eq!(split, HazardSplit { hazardous: 2, non_hazardous: 6 });
        assert_eq!(split.percentages(), (25.0, 75.0));

        let slices = split.slices();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "Hazardous");
        assert_eq!(slices[0].explode, 0.0);
        assert!((slices[0].sweep - TAU / 4.0).abs() < 1e-12);
        assert!((slices[1].start_angle - TAU / 4.0).abs() < 1e-12);
        assert!((slices[1].start_angle + slices[1].sweep - TAU).abs() < 1e-12);
        assert_eq!(slices[1].explode, PIE_EXPLODE);
    }

    #[test]
    fn empty_slice_is_omitted() {
        let split = HazardSplit { hazardous: 0, non_hazardous: 3 };
        let slices = split.slices();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].percentage, 100.0);
        assert!(!slices[0].hazardous);
        assert_eq!(slices[0].start_angle, 0.0);
    }

    #[test]
    fn regression_chart_fits_miss_distance_against_speed() {
        let rows: Vec<AsteroidRecord> = [(1.0e6, 20_000.0), (2.0e6, 30_000.0), (3.0e6, 40_000.0)]
            .iter()
            .map(|&(miss, speed)| AsteroidRecord {
                miss_distance_km: miss,
                speed_mph: speed,
                ..record("r")
            })
            .collect();
        let chart = ChartPlotter::regression_chart(&rows).unwrap();

        assert_eq!(chart.points.len(), 3);
        let fit = chart.fit.unwrap();
        assert!((fit.slope - 0.01).abs() < 1e-12);
        assert!(fit.is_significant());
        let [(x0, y0), (x1, y1)] = chart.fitted_line().unwrap();
        assert_eq!((x0, x1), (1.0e6, 3.0e6));
        assert!((y0 - 20_000.0).abs() < 1e-6);
        assert!((y1 - 40_000.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_regression_keeps_points_without_fit() {
        let single = ChartPlotter::regression_chart(&[record("one")]).unwrap();
        assert_eq!(single.points.len(), 1);
        assert!(single.fit.is_none());
        assert!(single.fitted_line().is_none());
        assert_eq!(single.x_range(), (1.0e6 - 1.0, 1.0e6 + 1.0));

        let same_distance: Vec<AsteroidRecord> = [10_000.0, 20_000.0, 30_000.0]
            .iter()
            .map(|&speed| AsteroidRecord {
                speed_mph: speed,
                ..record("s")
            })
            .collect();
        let chart = ChartPlotter::regression_chart(&same_distance).unwrap();
        assert_eq!(chart.points.len(), 3);
        assert!(chart.fit.is_none());
    }

    #[test]
    fn every_chart_rejects_empty_table() {
        let empty: Vec<AsteroidRecord> = Vec::new();
        assert!(matches!(
            ChartPlotter::diameter_histogram(&empty),
            Err(ChartError::EmptyDataset(_))
        ));
        assert!(matches!(
            ChartPlotter::orbit_intersection_histogram(&empty),
            Err(ChartError::EmptyDataset(_))
        ));
        assert!(matches!(
            ChartPlotter::hazard_split(&empty),
            Err(ChartError::EmptyDataset(_))
        ));
        assert!(matches!(
            ChartPlotter::regression_chart(&empty),
            Err(ChartError::EmptyDataset(_))
        ));
    }
}
