use anyhow::{Context, Result};
use log::info;
#[cfg(not(feature = "plot"))]
use log::warn;
use std::fmt;
use std::path::{Path, PathBuf};

use mzrecal::calibration::{
    estimate, CalibrationParams, CalibrationResult, Estimate, Ms2ErrorBounds,
    DEFAULT_MIN_PRECURSOR_COUNT, DEFAULT_MIN_SCORE, DEFAULT_MS2_ERROR_BOUND,
};
use mzrecal::correction::{correct_with_stats, CorrectionStats};
use mzrecal::report::ErrorReport;
use mzrecal::spectra::{read_mgf, write_mgf};
use mzrecal::tables::{IdentificationRecord, PeakRecord};

use super::{Cli, Config};

const DEFAULT_PREFIX: &str = "sample";

/// Effective settings after merging flags, config file and defaults
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    params: CalibrationParams,
    prefix: String,
    plot: bool,
}

impl Settings {
    fn resolve(cli: &Cli, config: &Config) -> Self {
        let file = &config.calibration;
        let params = CalibrationParams::default()
            .with_min_score(cli.min_score.or(file.min_score).unwrap_or(DEFAULT_MIN_SCORE))
            .with_min_precursor_count(
                cli.min_precursors
                    .or(file.min_precursors)
                    .unwrap_or(DEFAULT_MIN_PRECURSOR_COUNT),
            )
            .with_ms2_bounds(Ms2ErrorBounds::symmetric(
                cli.ms2_error_bound
                    .or(file.ms2_error_bound)
                    .unwrap_or(DEFAULT_MS2_ERROR_BOUND),
            ));

        Self {
            params,
            prefix: cli
                .prefix
                .clone()
                .or_else(|| file.prefix.clone())
                .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            plot: cli.plot || file.plot.unwrap_or(false),
        }
    }
}

/// Fail on the first input path that does not exist
fn check_inputs(inputs: &[(&Path, &str)]) -> Result<()> {
    for (path, name) in inputs {
        if !path.exists() {
            anyhow::bail!("{} file not found: {}", name, path.display());
        }
    }
    Ok(())
}

/// Estimate mass errors, write the report and the recalibrated MGF
pub fn run(cli: Cli) -> Result<()> {
    check_inputs(&[
        (cli.linear_results.as_path(), "linear results"),
        (cli.peaks.as_path(), "peaks"),
        (cli.mgf.as_path(), "MGF"),
    ])?;

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let settings = Settings::resolve(&cli, &config);

    info!("mzrecal - MGF mass recalibration");
    info!("================================");
    info!("Linear results: {}", cli.linear_results.display());
    info!("Peaks:          {}", cli.peaks.display());
    info!("MGF:            {}", cli.mgf.display());
    info!("Min score: {}", settings.params.min_score);
    info!("Min precursors: {}", settings.params.min_precursor_count);
    info!(
        "MS2 error window: [{}, {}] ppm",
        settings.params.ms2_bounds.lower(),
        settings.params.ms2_bounds.upper()
    );

    // Calculate mass errors
    info!("Calculating mass errors from {}...", cli.linear_results.display());
    let identifications = IdentificationRecord::from_csv_file(&cli.linear_results)
        .with_context(|| {
            format!(
                "Failed to read identification table: {}",
                cli.linear_results.display()
            )
        })?;
    let peaks = PeakRecord::from_tsv_file(&cli.peaks)
        .with_context(|| format!("Failed to read peak table: {}", cli.peaks.display()))?;
    let estimate = estimate(&identifications, &peaks, &settings.params);

    // Write error report
    ErrorReport::new(&settings.prefix, &estimate.calibration)
        .write_csv(&cli.error_report)
        .with_context(|| {
            format!(
                "Failed to write error report: {}",
                cli.error_report.display()
            )
        })?;
    info!("Wrote error report to {}", cli.error_report.display());

    // Recalibrate MGF
    info!("Recalibrating {}...", cli.mgf.display());
    let spectra = read_mgf(&cli.mgf)
        .with_context(|| format!("Failed to read MGF: {}", cli.mgf.display()))?;
    let (corrected, stats) = correct_with_stats(spectra, &estimate.calibration)
        .context("Failed to recalibrate spectra")?;
    write_mgf(&cli.output, &corrected).with_context(|| {
        format!("Failed to write recalibrated MGF: {}", cli.output.display())
    })?;
    info!("Wrote recalibrated MGF to {}", cli.output.display());

    let plots = if settings.plot {
        draw_plots(&cli.plot_dir, &settings.prefix, &estimate)?
    } else {
        Vec::new()
    };

    let summary = Summary {
        calibration: estimate.calibration,
        skipped: estimate.is_skipped(),
        stats,
        report: cli.error_report.clone(),
        output: cli.output.clone(),
        plots,
    };

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", summary.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", summary);
    }

    Ok(())
}

#[cfg(feature = "plot")]
fn draw_plots(dir: &Path, prefix: &str, estimate: &Estimate) -> Result<Vec<PathBuf>> {
    if estimate.is_skipped() {
        info!("Recalibration skipped, no plots drawn");
        return Ok(Vec::new());
    }
    info!("Generating mass error plots...");
    mzrecal::plot::plot_estimate(dir, prefix, estimate).context("Failed to generate plots")
}

#[cfg(not(feature = "plot"))]
fn draw_plots(_dir: &Path, _prefix: &str, _estimate: &Estimate) -> Result<Vec<PathBuf>> {
    warn!("Plots requested but binary was built without the plot feature; skipping.");
    Ok(Vec::new())
}

/// What the run produced, printed on completion
struct Summary {
    calibration: CalibrationResult,
    skipped: bool,
    stats: CorrectionStats,
    report: PathBuf,
    output: PathBuf,
    plots: Vec<PathBuf>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Calculated mass errors:")?;
        writeln!(
            f,
            "  Precursor (MS1): {:.4} ppm",
            self.calibration.precursor_error_ppm
        )?;
        writeln!(f, "  Fragment (MS2):  {:.4} ppm", self.calibration.ms2_error_ppm)?;
        if self.skipped {
            writeln!(f, "Recalibration skipped: not enough precursors")?;
        }
        writeln!(f, "Recalibrated {}", self.stats)?;
        writeln!(f, "Error report: {}", self.report.display())?;
        write!(f, "Output:       {}", self.output.display())?;
        for plot in &self.plots {
            write!(f, "\nPlot:         {}", plot.display())?;
        }
        Ok(())
    }
}

impl Summary {
    #[cfg(feature = "colorized_output")]
    fn format_colored(&self) -> String {
        use console::style;

        let mut output = String::new();
        output.push_str(&format!("{}\n", style("Calculated mass errors:").bold().cyan()));
        output.push_str(&format!(
            "  Precursor (MS1): {} ppm\n",
            style(format!("{:.4}", self.calibration.precursor_error_ppm)).bold()
        ));
        output.push_str(&format!(
            "  Fragment (MS2):  {} ppm\n",
            style(format!("{:.4}", self.calibration.ms2_error_ppm)).bold()
        ));
        if self.skipped {
            output.push_str(&format!(
                "{}\n",
                style("Recalibration skipped: not enough precursors").yellow().bold()
            ));
        }
        output.push_str(&format!("{} {}\n", style("Recalibrated").green(), self.stats));
        output.push_str(&format!(
            "{}: {}\n",
            style("Error report").bold(),
            self.report.display()
        ));
        output.push_str(&format!("{}:       {}", style("Output").bold(), self.output.display()));
        for plot in &self.plots {
            output.push_str(&format!("\n{}:         {}", style("Plot").bold(), plot.display()));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(extra: &[&str]) -> Cli {
        let mut args = vec![
            "mzrecal",
            "--linear-results",
            "ids.csv",
            "--peaks",
            "peaks.tsv",
            "--mgf",
            "in.mgf",
            "--output",
            "out.mgf",
            "--error-report",
            "errors.csv",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&cli(&[]), &Config::default());
        assert_eq!(settings.params, CalibrationParams::default());
        assert_eq!(settings.prefix, "sample");
        assert!(!settings.plot);
    }

    #[test]
    fn test_config_fills_unset_flags() {
        let config = Config::from_str(
            r#"
            [calibration]
            min_score = 9.0
            min_precursors = 10
            prefix = "from_config"
            plot = true
        "#,
        )
        .unwrap();
        let settings = Settings::resolve(&cli(&["--min-score", "7.0"]), &config);

        assert_eq!(settings.params.min_score, 7.0);
        assert_eq!(settings.params.min_precursor_count, 10);
        assert_eq!(settings.params.ms2_bounds, Ms2ErrorBounds::symmetric(30.0));
        assert_eq!(settings.prefix, "from_config");
        assert!(settings.plot);
    }

    #[test]
    fn test_check_inputs_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("ids.csv");
        std::fs::write(&present, "decoy\n").unwrap();
        let missing = dir.path().join("peaks.tsv");

        assert!(check_inputs(&[(present.as_path(), "linear results")]).is_ok());

        let err = check_inputs(&[
            (present.as_path(), "linear results"),
            (missing.as_path(), "peaks"),
        ])
        .unwrap_err();
        assert!(err.to_string().starts_with("peaks file not found"));
    }

    #[test]
    fn test_summary_text() {
        let summary = Summary {
            calibration: CalibrationResult::new(2.5, -1.25),
            skipped: false,
            stats: CorrectionStats {
                spectra: 2,
                precursors: 2,
                peaks: 10,
            },
            report: PathBuf::from("errors.csv"),
            output: PathBuf::from("out.mgf"),
            plots: Vec::new(),
        };
        let text = summary.to_string();
        assert!(text.contains("Precursor (MS1): 2.5000 ppm"));
        assert!(text.contains("Fragment (MS2):  -1.2500 ppm"));
        assert!(!text.contains("skipped"));
    }
}
