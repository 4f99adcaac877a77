//! Static Chart Renderer
//! Draws the four asteroid charts as PNG files with plotters.
//!
//! Charts:
//! 1. Distribution of average diameter (histogram)
//! 2. Distribution of minimum orbit intersection (histogram)
//! 3. Hazardous vs non-hazardous share (pie)
//! 4. Miss distance vs speed (scatter + least-squares line, p-value annotation)

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use super::plotter::{ChartPlotter, HazardSplit, Histogram, PieSlice, RegressionChart};
use super::ChartError;
use crate::data::AsteroidRecord;
use crate::stats::{LinearFit, SIGNIFICANCE_THRESHOLD};

pub const DIAMETER_FILE: &str = "diameter_histogram.png";
pub const ORBIT_INTERSECTION_FILE: &str = "orbit_intersection_histogram.png";
pub const HAZARD_FILE: &str = "hazard_pie.png";
pub const REGRESSION_FILE: &str = "miss_distance_vs_speed.png";

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 700;
const FONT: &str = "sans-serif";

// Colors
const BAR_COLOR: RGBColor = RGBColor(0x99, 0x0f, 0x02); // Histogram bars, hazardous slice
const ACCENT_COLOR: RGBColor = RGBColor(0xd4, 0xa0, 0x17); // Non-hazardous slice
const POINT_COLOR: RGBColor = RGBColor(31, 119, 180); // Scatter points

fn draw_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Drawing(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render all four charts into `out_dir`, creating it if needed.
    ///
    /// Every chart's data is built first, so a failure leaves no partial output.
    pub fn render_all(
        records: &[AsteroidRecord],
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>, ChartError> {
        if records.is_empty() {
            return Err(ChartError::EmptyDataset("charts"));
        }
        let diameters = ChartPlotter::diameter_histogram(records)?;
        let intersections = ChartPlotter::orbit_intersection_histogram(records)?;
        let split = ChartPlotter::hazard_split(records)?;
        let regression = ChartPlotter::regression_chart(records)?;

        fs::create_dir_all(out_dir)?;

        let diameter_path = out_dir.join(DIAMETER_FILE);
        Self::draw_histogram(
            &diameter_path,
            &diameters,
            "Distribution of Average Diameter",
            "Average diameter (km)",
            "Count",
        )?;
        log::info!("wrote {}", diameter_path.display());

        let intersection_path = out_dir.join(ORBIT_INTERSECTION_FILE);
        Self::draw_histogram(
            &intersection_path,
            &intersections,
            "Distribution of Asteroids by Minimum Orbit Intersection",
            "Minimum orbit intersection (AU)",
            "Number of asteroids",
        )?;
        log::info!("wrote {}", intersection_path.display());

        let hazard_path = out_dir.join(HAZARD_FILE);
        Self::draw_hazard_pie(&hazard_path, &split)?;
        log::info!("wrote {}", hazard_path.display());

        let regression_path = out_dir.join(REGRESSION_FILE);
        Self::draw_regression(&regression_path, &regression)?;
        match regression.fit {
            Some(fit) => log::info!(
                "wrote {} (p = {:.3e}, {})",
                regression_path.display(),
                fit.p_value,
                verdict(&fit)
            ),
            None => log::info!("wrote {} (no fit)", regression_path.display()),
        }

        Ok(vec![diameter_path, intersection_path, hazard_path, regression_path])
    }

    fn draw_hazard_pie(path: &Path, split: &HazardSplit) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        let root = root
            .titled(
                "Percentage of Hazardous and Non-Hazardous Asteroids",
                (FONT, 28),
            )
            .map_err(draw_err)?;

        let (w, h) = root.dim_in_pixel();
        let center = (w as f64 / 2.0, h as f64 / 2.0);
        let radius = w.min(h) as f64 * 0.36;

        let centered = TextStyle::from((FONT, 22).into_font()).pos(Pos::new(HPos::Center, VPos::Center));

        for slice in split.slices() {
            let color = if slice.hazardous { BAR_COLOR } else { ACCENT_COLOR };
            let origin = polar(center, slice.explode * radius, slice.mid_angle());

            root.draw(&Polygon::new(wedge(origin, radius, &slice), color.filled()))
                .map_err(draw_err)?;
            root.draw(&Text::new(
                format!("{:.1}%", slice.percentage),
                to_pixel(polar(origin, radius * 0.6, slice.mid_angle())),
                centered.color(&WHITE),
            ))
            .map_err(draw_err)?;
            root.draw(&Text::new(
                slice.label,
                to_pixel(polar(origin, radius * 1.15, slice.mid_angle())),
                centered.color(&BLACK),
            ))
            .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_regression(path: &Path, data: &RegressionChart) -> Result<(), ChartError> {
        let line = data.fitted_line();

        let (x_lo, x_hi) = data.x_range();
        let (mut y_lo, mut y_hi) = data.y_range();
        if let Some([(_, y0), (_, y1)]) = line {
            y_lo = y_lo.min(y0).min(y1);
            y_hi = y_hi.max(y0).max(y1);
        }
        let x_pad = (x_hi - x_lo) * 0.05;
        let y_pad = (y_hi - y_lo) * 0.05;

        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Linear Regression: Miss Distance vs Speed", (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((x_lo - x_pad)..(x_hi + x_pad), (y_lo - y_pad)..(y_hi + y_pad))
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_desc("Miss distance (km)")
            .y_desc("Speed (mph)")
            .axis_desc_style((FONT, 18))
            .x_label_formatter(&|v: &f64| format!("{v:.1e}"))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                data.points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, POINT_COLOR.mix(0.5).filled())),
            )
            .map_err(draw_err)?
            .label("Data points")
            .legend(|(x, y)| Circle::new((x, y), 4, POINT_COLOR.filled()));

        if let Some(line) = line {
            chart
                .draw_series(LineSeries::new(line, RED.stroke_width(2)))
                .map_err(draw_err)?
                .label("Regression line")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;

        for (i, note) in regression_notes(data).iter().enumerate() {
            root.draw(&Text::new(
                note.as_str(),
                (110, 70 + 24 * i as i32),
                (FONT, 18).into_font(),
            ))
            .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }

    fn draw_histogram(
        path: &Path,
        hist: &Histogram,
        title: &str,
        x_desc: &str,
        y_desc: &str,
    ) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (x_min, x_max) = hist.range();
        let y_max = (hist.max_count() as f64 * 1.05).max(1.0);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)
            .map_err(draw_err)?;

        // Grid on the count axis only
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc(y_desc)
            .axis_desc_style((FONT, 18))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(hist.bins().map(|(lo, hi, count)| {
                Rectangle::new([(lo, 0.0), (hi, count as f64)], BAR_COLOR.filled())
            }))
            .map_err(draw_err)?;
        chart
            .draw_series(hist.bins().filter(|&(_, _, count)| count > 0).map(
                |(lo, hi, count)| {
                    Rectangle::new([(lo, 0.0), (hi, count as f64)], BLACK.stroke_width(1))
                },
            ))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

fn verdict(fit: &LinearFit) -> &'static str {
    if fit.is_significant() {
        "significant"
    } else {
        "not significant"
    }
}

/// Annotation lines drawn in the top-left corner of the regression chart.
fn regression_notes(data: &RegressionChart) -> Vec<String> {
    match &data.fit {
        Some(fit) => vec![
            format!("slope = {:.3e} mph/km, r = {:.3}", fit.slope, fit.r_value),
            format!(
                "p = {:.3e} ({} at p < {SIGNIFICANCE_THRESHOLD})",
                fit.p_value,
                verdict(fit)
            ),
        ],
        None => vec![format!(
            "Regression undefined for {} point(s) with one distinct miss distance",
            data.points.len()
        )],
    }
}

/// Point at `distance` from `origin` along `angle` (y grows downward in pixel space).
fn polar(origin: (f64, f64), distance: f64, angle: f64) -> (f64, f64) {
    (
        origin.0 + distance * angle.cos(),
        origin.1 - distance * angle.sin(),
    )
}

fn to_pixel(point: (f64, f64)) -> (i32, i32) {
    (point.0.round() as i32, point.1.round() as i32)
}

/// Outline of one pie wedge: apex followed by the arc, one vertex per degree.
fn wedge(origin: (f64, f64), radius: f64, slice: &PieSlice) -> Vec<(i32, i32)> {
    let steps = ((slice.sweep / TAU) * 360.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(to_pixel(origin));
    points.extend((0..=steps).map(|i| {
        let angle = slice.start_angle + slice.sweep * i as f64 / steps as f64;
        to_pixel(polar(origin, radius, angle))
    }));
    points
}
