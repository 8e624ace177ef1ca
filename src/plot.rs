//! Mass error histograms.
//!
//! Each plot is an SVG histogram of an error distribution with the median
//! drawn as a vertical reference line. Only built with the `plot` feature.

use std::path::{Path, PathBuf};

use log::info;
use plotters::prelude::*;

use crate::calibration::{CalibrationStatus, Estimate};

/// Visible x-range of the fragment error plot (ppm)
pub const MS2_PLOT_RANGE: (f64, f64) = (-20.0, 20.0);

const PLOT_SIZE: (u32, u32) = (1000, 600);
const MAX_BINS: usize = 100;
const MEDIAN_DASHES: usize = 20;

/// Errors that can occur while drawing plots
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Drawing backend failure
    #[error("Failed to draw {}: {}", .path.display(), .message)]
    Drawing {
        /// Output file
        path: PathBuf,
        /// Backend message
        message: String,
    },

    /// Nothing to plot
    #[error("No values to plot")]
    Empty,
}

/// Appearance of one histogram
#[derive(Debug, Clone)]
pub struct HistogramStyle {
    /// Plot title, the median follows on a second line
    pub title: String,
    /// x-axis label
    pub x_label: String,
    /// Visible x-range, data range when `None`
    pub x_range: Option<(f64, f64)>,
}

/// One histogram bin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Left edge (inclusive)
    pub start: f64,
    /// Right edge
    pub end: f64,
    /// Number of values in the bin
    pub count: u32,
}

/// Bin `values` with Sturges' rule over their full range.
pub fn histogram(values: &[f64]) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let n_bins = ((finite.len() as f64).log2().ceil() as usize + 1).clamp(1, MAX_BINS);
    let width = if hi > lo { (hi - lo) / n_bins as f64 } else { 1.0 };

    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - lo) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

/// Draw a histogram of `values` with a median line into an SVG file.
pub fn plot_distribution(
    path: &Path,
    values: &[f64],
    median: f64,
    style: &HistogramStyle,
) -> Result<(), PlotError> {
    let bins = histogram(values);
    if bins.is_empty() {
        return Err(PlotError::Empty);
    }
    draw_histogram(path, &bins, median, style).map_err(|e| PlotError::Drawing {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Vertical dashed segments from 0 to `top` at `x`
fn dashed_vline(x: f64, top: f64) -> Vec<PathElement<(f64, f64)>> {
    let step = top / MEDIAN_DASHES as f64;
    (0..MEDIAN_DASHES)
        .map(|i| {
            let start = i as f64 * step;
            PathElement::new(
                vec![(x, start), (x, start + step / 2.0)],
                RED.stroke_width(2),
            )
        })
        .collect()
}

fn draw_histogram(
    path: &Path,
    bins: &[Bin],
    median: f64,
    style: &HistogramStyle,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x_min, x_max) = match style.x_range {
        Some(range) => range,
        None => {
            let lo = bins.first().map(|b| b.start).unwrap_or(-1.0);
            let hi = bins.last().map(|b| b.end).unwrap_or(1.0);
            (lo.min(median), hi.max(median))
        }
    };
    let visible: Vec<Bin> = bins
        .iter()
        .filter(|b| b.end > x_min && b.start < x_max)
        .map(|b| Bin {
            start: b.start.max(x_min),
            end: b.end.min(x_max),
            count: b.count,
        })
        .collect();
    let y_max = visible.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let y_max = (y_max * 1.1).ceil().max(1.0);
    let median_label = format!("Median: {:.2} ppm", median);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root
        .titled(&style.title, ("sans-serif", 24))?
        .titled(&median_label, ("sans-serif", 18))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(style.x_label.as_str())
        .y_desc("# of Identifications")
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart.draw_series(visible.iter().map(|b| {
        Rectangle::new(
            [(b.start, 0.0), (b.end, b.count as f64)],
            BLUE.mix(0.5).filled(),
        )
    }))?;

    if median >= x_min && median <= x_max {
        chart
            .draw_series(dashed_vline(median, y_max))?
            .label(median_label.as_str())
            .legend(|(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(0, 0), (8, 0)], RED.stroke_width(2))
                    + PathElement::new(vec![(12, 0), (20, 0)], RED.stroke_width(2))
            });

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Draw the precursor and fragment error plots of an estimate into `dir`.
///
/// Files are named `MS1_Error_<prefix>.svg` and `MS2_Error_<prefix>.svg`.
/// Nothing is drawn for a skipped estimate, and the fragment plot is omitted
/// when no fragment errors survived. Returns the files written.
pub fn plot_estimate(dir: &Path, prefix: &str, estimate: &Estimate) -> Result<Vec<PathBuf>, PlotError> {
    let mut written = Vec::new();
    if estimate.status != CalibrationStatus::Calibrated {
        return Ok(written);
    }

    if !estimate.precursor_errors.is_empty() {
        let path = dir.join(format!("MS1_Error_{}.svg", prefix));
        plot_distribution(
            &path,
            &estimate.precursor_errors,
            estimate.calibration.precursor_error_ppm,
            &HistogramStyle {
                title: "MS1 Precursor Error Distribution".to_string(),
                x_label: "Precursor Error (ppm)".to_string(),
                x_range: None,
            },
        )?;
        info!("Wrote {}", path.display());
        written.push(path);
    }

    if !estimate.ms2_errors.is_empty() {
        let path = dir.join(format!("MS2_Error_{}.svg", prefix));
        plot_distribution(
            &path,
            &estimate.ms2_errors,
            estimate.calibration.ms2_error_ppm,
            &HistogramStyle {
                title: "MS2 Fragment Ion Error Distribution".to_string(),
                x_label: "Mass Error (ppm)".to_string(),
                x_range: Some(MS2_PLOT_RANGE),
            },
        )?;
        info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CalibrationResult;

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [-3.0, -1.0, 0.0, 0.5, 2.0, 2.0, 7.0];
        let bins = histogram(&values);
        let total: u32 = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, values.len() as u32);
        assert_eq!(bins.first().unwrap().start, -3.0);
        assert!((bins.last().unwrap().end - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_single_value() {
        let bins = histogram(&[4.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn test_dashed_vline_spans_axis() {
        let dashes = dashed_vline(1.5, 10.0);
        assert_eq!(dashes.len(), MEDIAN_DASHES);
    }

    #[test]
    fn test_plot_titles_and_median_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.svg");
        plot_distribution(
            &path,
            &[0.5, 1.0, 1.0, 1.5],
            1.0,
            &HistogramStyle {
                title: "MS1 Precursor Error Distribution".to_string(),
                x_label: "Precursor Error (ppm)".to_string(),
                x_range: None,
            },
        )
        .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("MS1 Precursor Error Distribution"));
        assert!(svg.contains("Median: 1.00 ppm"));
        assert!(svg.matches("#FF0000").count() >= MEDIAN_DASHES);
    }

    #[test]
    fn test_plot_estimate_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let estimate = Estimate {
            calibration: CalibrationResult::new(1.0, 2.0),
            status: CalibrationStatus::Calibrated,
            precursor_errors: vec![0.5, 1.0, 1.5],
            ms2_errors: vec![1.0, 2.0, 3.0, 40.0],
        };

        let written = plot_estimate(dir.path(), "test", &estimate).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("MS1_Error_test.svg").exists());
        assert!(dir.path().join("MS2_Error_test.svg").exists());
    }

    #[test]
    fn test_skipped_estimate_draws_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let estimate = Estimate {
            calibration: CalibrationResult::NEUTRAL,
            status: CalibrationStatus::InsufficientPrecursors {
                found: 1,
                required: 50,
            },
            precursor_errors: vec![1.0],
            ms2_errors: Vec::new(),
        };
        assert!(plot_estimate(dir.path(), "test", &estimate).unwrap().is_empty());
    }
}
