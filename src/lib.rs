//! # mzrecal - Mass Recalibration of MGF Spectra
//!
//! `mzrecal` removes systematic mass measurement errors from a peak list file
//! using the errors observed in a prior peptide identification search.
//!
//! ## Pipeline
//!
//! ```text
//! identification CSV ─┐
//!                     ├─ tables ─ calibration::estimate ─ (precursor ppm, fragment ppm)
//! peak annotation TSV ┘                                           │
//!                                                                 ▼
//! input MGF ── spectra::read_mgf ── correction::correct ── spectra::write_mgf ── output MGF
//! ```
//!
//! 1. [`tables`] reads both tables into typed records, stripping thousands
//!    separators and mapping empty run identifiers to `None`.
//! 2. [`calibration::estimate`] keeps confident target identifications, takes the
//!    median precursor error, joins primary peak annotations on
//!    `(scan, run)` and takes the median fragment ppm error inside a window.
//! 3. [`correction::correct`] divides every precursor and fragment m/z by
//!    `1 + error / 1e6`.
//!
//! With too few confident identifications the calibration is `(0.0, 0.0)`
//! and the correction is an exact pass-through.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mzrecal::calibration::{estimate, CalibrationParams};
//! use mzrecal::correction::correct;
//! use mzrecal::report::ErrorReport;
//! use mzrecal::spectra::{read_mgf, write_mgf};
//! use mzrecal::tables::{IdentificationRecord, PeakRecord};
//!
//! let ids = IdentificationRecord::from_csv_file("linear_results.csv")?;
//! let peaks = PeakRecord::from_tsv_file("peaks.tsv")?;
//!
//! let estimate = estimate(&ids, &peaks, &CalibrationParams::default());
//! ErrorReport::new("sample", &estimate.calibration).write_csv("errors.csv")?;
//!
//! let spectra = read_mgf("input.mgf")?;
//! let corrected = correct(spectra, &estimate.calibration)?;
//! write_mgf("recalibrated.mgf", &corrected)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Resource Model
//!
//! Processing is a single-threaded batch: both tables and the full spectrum
//! collection are held in memory at once. Inputs larger than available memory
//! are not supported.
//!
//! ## Modules
//!
//! - [`tables`]: identification and peak table readers
//! - [`calibration`]: error estimation stages and result types
//! - [`correction`]: m/z correction of spectra
//! - [`spectra`]: MGF reading and writing through `mzdata`
//! - [`report`]: one-row mass error report
//! - `plot`: error histograms (feature `plot`)

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod calibration;
pub mod correction;
#[cfg(feature = "plot")]
pub mod plot;
pub mod report;
pub mod spectra;
pub mod tables;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::calibration::{
        estimate, CalibrationParams, CalibrationResult, CalibrationStatus, Estimate,
        Ms2ErrorBounds,
    };
    pub use crate::correction::{
        correct, correct_with_stats, CorrectionError, CorrectionStats, MzCorrection, Recalibrate,
    };
    #[cfg(feature = "plot")]
    pub use crate::plot::{plot_estimate, PlotError};
    pub use crate::report::{ErrorReport, ReportError};
    pub use crate::spectra::{read_mgf, write_mgf, SpectraError};
    pub use crate::tables::{IdentificationRecord, PeakRecord, TableError};
}
