//! Calibration estimation from identification and peak tables.
//!
//! The estimator derives two systematic errors from a prior search:
//!
//! - the **precursor error**: median `Precursor Error` of confident target
//!   identifications;
//! - the **fragment error**: median relative error (ppm) of primary peak
//!   annotations belonging to those identifications, restricted to a window.
//!
//! When fewer confident identifications than required are available, the
//! neutral calibration `(0.0, 0.0)` is returned and recalibration degrades to a
//! pass-through.
//!
//! ```rust
//! use mzrecal::calibration::{estimate, CalibrationParams};
//! use mzrecal::tables::{IdentificationRecord, PeakRecord};
//!
//! let ids: Vec<IdentificationRecord> = (0..60)
//!     .map(|i| IdentificationRecord {
//!         decoy: 0,
//!         match_score: 10.0,
//!         scan: i,
//!         run: None,
//!         precursor_error: 2.0,
//!     })
//!     .collect();
//! let peaks = vec![PeakRecord {
//!     calc_mz: 500.0,
//!     ms2_error: 0.0025,
//!     scan: 3,
//!     run: None,
//!     is_primary_match: 1,
//! }];
//!
//! let estimate = estimate(&ids, &peaks, &CalibrationParams::default());
//! assert_eq!(estimate.calibration.precursor_error_ppm, 2.0);
//! assert!((estimate.calibration.ms2_error_ppm - 5.0).abs() < 1e-9);
//! ```

pub mod stages;
mod stats;

use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::tables::{IdentificationRecord, PeakRecord};

pub use stats::{median, median_of};

/// Parts-per-million scale factor
pub const PPM: f64 = 1e6;

/// Default minimum match score (exclusive)
pub const DEFAULT_MIN_SCORE: f64 = 6.0;

/// Default minimum number of admissible precursors
pub const DEFAULT_MIN_PRECURSOR_COUNT: usize = 50;

/// Default half-width of the fragment error window (ppm)
pub const DEFAULT_MS2_ERROR_BOUND: f64 = 30.0;

/// Systematic mass errors used for recalibration, in ppm
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    /// Precursor (MS1) error
    pub precursor_error_ppm: f64,
    /// Fragment (MS2) error
    pub ms2_error_ppm: f64,
}

impl CalibrationResult {
    /// No correction
    pub const NEUTRAL: Self = Self {
        precursor_error_ppm: 0.0,
        ms2_error_ppm: 0.0,
    };

    /// Create a calibration from both errors
    pub fn new(precursor_error_ppm: f64, ms2_error_ppm: f64) -> Self {
        Self {
            precursor_error_ppm,
            ms2_error_ppm,
        }
    }

    /// Whether applying this calibration leaves m/z values unchanged
    pub fn is_neutral(&self) -> bool {
        self.precursor_error_ppm == 0.0 && self.ms2_error_ppm == 0.0
    }
}

impl fmt::Display for CalibrationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "precursor {:.4} ppm, fragment {:.4} ppm",
            self.precursor_error_ppm, self.ms2_error_ppm
        )
    }
}

/// Inclusive window of admissible fragment errors (ppm)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ms2ErrorBounds {
    lower: f64,
    upper: f64,
}

impl Ms2ErrorBounds {
    /// Build a window from two limits given in either order.
    ///
    /// `new(30.0, -30.0)` and `new(-30.0, 30.0)` are the same window.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    /// Window `[-|half_width|, |half_width|]`
    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width.abs(), half_width.abs())
    }

    /// Lower limit (inclusive)
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper limit (inclusive)
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Whether `ppm` lies inside the window, limits included
    pub fn contains(&self, ppm: f64) -> bool {
        ppm >= self.lower && ppm <= self.upper
    }
}

impl Default for Ms2ErrorBounds {
    fn default() -> Self {
        Self::symmetric(DEFAULT_MS2_ERROR_BOUND)
    }
}

/// Filtering thresholds for [`estimate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationParams {
    /// Identifications must score strictly above this
    pub min_score: f64,
    /// Minimum admissible precursors required to calibrate
    pub min_precursor_count: usize,
    /// Fragment error window
    pub ms2_bounds: Ms2ErrorBounds,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            min_precursor_count: DEFAULT_MIN_PRECURSOR_COUNT,
            ms2_bounds: Ms2ErrorBounds::default(),
        }
    }
}

impl CalibrationParams {
    /// Set the minimum match score
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Set the minimum admissible precursor count
    pub fn with_min_precursor_count(mut self, count: usize) -> Self {
        self.min_precursor_count = count;
        self
    }

    /// Set the fragment error window
    pub fn with_ms2_bounds(mut self, bounds: Ms2ErrorBounds) -> Self {
        self.ms2_bounds = bounds;
        self
    }
}

/// Outcome of an estimation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStatus {
    /// Both errors were estimated from the data
    Calibrated,
    /// Too few admissible precursors; the neutral calibration was returned
    InsufficientPrecursors {
        /// Admissible precursors found
        found: usize,
        /// Precursors required
        required: usize,
    },
}

/// Calibration together with the value sets it was computed from
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Estimated errors, neutral when skipped
    pub calibration: CalibrationResult,
    /// Whether recalibration was skipped
    pub status: CalibrationStatus,
    /// Precursor errors of admissible identifications
    pub precursor_errors: Vec<f64>,
    /// Fragment ppm errors inside the window; empty when skipped
    pub ms2_errors: Vec<f64>,
}

impl Estimate {
    /// Whether recalibration was skipped for lack of data
    pub fn is_skipped(&self) -> bool {
        !matches!(self.status, CalibrationStatus::Calibrated)
    }
}

/// Estimate precursor and fragment errors.
///
/// Never fails: insufficient precursors yield the neutral calibration with a
/// warning, and an empty fragment set yields a fragment error of `0.0`.
pub fn estimate(
    identifications: &[IdentificationRecord],
    peaks: &[PeakRecord],
    params: &CalibrationParams,
) -> Estimate {
    let admissible = stages::admissible_identifications(identifications, params.min_score);
    let precursor_errors = stages::precursor_errors(&admissible);
    debug!(
        "{} of {} identifications are targets scoring above {}",
        admissible.len(),
        identifications.len(),
        params.min_score
    );

    if precursor_errors.len() < params.min_precursor_count {
        warn!(
            "Only {} precursors found, below threshold of {}. Skipping recalibration.",
            precursor_errors.len(),
            params.min_precursor_count
        );
        return Estimate {
            calibration: CalibrationResult::NEUTRAL,
            status: CalibrationStatus::InsufficientPrecursors {
                found: precursor_errors.len(),
                required: params.min_precursor_count,
            },
            precursor_errors,
            ms2_errors: Vec::new(),
        };
    }

    // Empty only when min_precursor_count is 0
    let precursor_error_ppm = median_of(&precursor_errors).unwrap_or(0.0);

    let joined = stages::join_on_scan(stages::primary_peaks(peaks), &admissible);
    let fragment_errors = stages::fragment_errors(&joined);
    let ms2_errors = stages::within_bounds(fragment_errors, &params.ms2_bounds);
    debug!(
        "{} joined primary peak rows, {} within [{}, {}] ppm",
        joined.len(),
        ms2_errors.len(),
        params.ms2_bounds.lower(),
        params.ms2_bounds.upper()
    );

    let ms2_error_ppm = median_of(&ms2_errors).unwrap_or(0.0);
    let calibration = CalibrationResult::new(precursor_error_ppm, ms2_error_ppm);
    info!("Estimated {}", calibration);

    Estimate {
        calibration,
        status: CalibrationStatus::Calibrated,
        precursor_errors,
        ms2_errors,
    }
}
