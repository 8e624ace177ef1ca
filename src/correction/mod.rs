//! Recalibration of spectra.
//!
//! Every precursor m/z is divided by `1 + precursor_error_ppm / 1e6` and every
//! fragment peak m/z by `1 + ms2_error_ppm / 1e6`. Intensities, peak count and
//! peak order are untouched. The neutral calibration divides by exactly `1.0`
//! and is therefore an identity transform on the same code path.

mod spectrum;

use std::fmt;

use log::debug;

use crate::calibration::{CalibrationResult, PPM};

/// Errors that can occur while correcting spectra
#[derive(Debug, thiserror::Error)]
pub enum CorrectionError {
    /// The m/z array of a spectrum could not be decoded
    #[error("Failed to access m/z array of spectrum {id}: {source}")]
    ArrayError {
        /// Spectrum identifier
        id: String,
        /// Underlying decoding error
        #[source]
        source: mzdata::spectrum::bindata::ArrayRetrievalError,
    },
}

/// Multiplicative m/z correction derived from a ppm error
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MzCorrection {
    ppm: f64,
    divisor: f64,
}

impl MzCorrection {
    /// Correction removing a systematic error of `ppm`
    pub fn from_ppm(ppm: f64) -> Self {
        Self {
            ppm,
            divisor: 1.0 + ppm / PPM,
        }
    }

    /// The ppm error being removed
    pub fn ppm(&self) -> f64 {
        self.ppm
    }

    /// Corrected m/z
    #[inline]
    pub fn apply(&self, mz: f64) -> f64 {
        mz / self.divisor
    }
}

/// A spectrum whose precursor and fragment m/z values can be recalibrated
pub trait Recalibrate {
    /// Correct every precursor m/z, returning how many were corrected
    fn correct_precursors(&mut self, correction: &MzCorrection) -> usize;

    /// Correct every fragment peak m/z, returning how many were corrected
    fn correct_peaks(&mut self, correction: &MzCorrection) -> Result<usize, CorrectionError>;
}

/// Counts gathered while correcting a spectrum collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionStats {
    /// Spectra processed
    pub spectra: usize,
    /// Precursor m/z values corrected
    pub precursors: usize,
    /// Fragment peak m/z values corrected
    pub peaks: usize,
}

impl fmt::Display for CorrectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} spectra, {} precursors, {} peaks",
            self.spectra, self.precursors, self.peaks
        )
    }
}

/// Recalibrate a spectrum collection, preserving order.
pub fn correct<S: Recalibrate>(
    spectra: Vec<S>,
    calibration: &CalibrationResult,
) -> Result<Vec<S>, CorrectionError> {
    correct_with_stats(spectra, calibration).map(|(spectra, _)| spectra)
}

/// Recalibrate a spectrum collection and report what was touched.
pub fn correct_with_stats<S: Recalibrate>(
    mut spectra: Vec<S>,
    calibration: &CalibrationResult,
) -> Result<(Vec<S>, CorrectionStats), CorrectionError> {
    let precursor = MzCorrection::from_ppm(calibration.precursor_error_ppm);
    let fragment = MzCorrection::from_ppm(calibration.ms2_error_ppm);

    let mut stats = CorrectionStats::default();
    for spectrum in spectra.iter_mut() {
        stats.precursors += spectrum.correct_precursors(&precursor);
        stats.peaks += spectrum.correct_peaks(&fragment)?;
        stats.spectra += 1;
    }

    debug!("Corrected {}", stats);
    Ok((spectra, stats))
}

#[cfg(test)]
mod tests;
