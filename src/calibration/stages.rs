//! Named stages of the calibration pipeline.
//!
//! `filter → join → compute → bounds`; the final reduction to a median lives
//! in [`super::estimate`]. Each stage is a plain function over ordered record
//! slices so it can be exercised on its own.

use std::collections::HashMap;

use crate::tables::{IdentificationRecord, PeakRecord};

use super::{Ms2ErrorBounds, PPM};

/// Join key between identifications and peaks.
///
/// The run identifier is nullable and a missing run matches only another
/// missing run: `Option`'s `Eq`/`Hash` give exactly that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanKey {
    /// Scan number
    pub scan: i64,
    /// Run identifier
    pub run: Option<i64>,
}

impl From<&IdentificationRecord> for ScanKey {
    fn from(record: &IdentificationRecord) -> Self {
        Self {
            scan: record.scan,
            run: record.run,
        }
    }
}

impl From<&PeakRecord> for ScanKey {
    fn from(record: &PeakRecord) -> Self {
        Self {
            scan: record.scan,
            run: record.run,
        }
    }
}

/// Keep target identifications scoring strictly above `min_score`.
pub fn admissible_identifications(
    identifications: &[IdentificationRecord],
    min_score: f64,
) -> Vec<&IdentificationRecord> {
    identifications
        .iter()
        .filter(|id| id.is_target() && id.match_score > min_score)
        .collect()
}

/// Precursor errors of the admissible identifications, in input order.
pub fn precursor_errors(admissible: &[&IdentificationRecord]) -> Vec<f64> {
    admissible.iter().map(|id| id.precursor_error).collect()
}

/// Drop secondary annotations of the same peak.
pub fn primary_peaks(peaks: &[PeakRecord]) -> impl Iterator<Item = &PeakRecord> {
    peaks.iter().filter(|p| p.is_primary())
}

/// Inner join of peaks against admissible identifications on [`ScanKey`].
///
/// A peak is emitted once per matching identification, so a scan carrying two
/// admissible matches contributes its peaks twice. Peak order is preserved.
pub fn join_on_scan<'a, I>(peaks: I, admissible: &[&IdentificationRecord]) -> Vec<&'a PeakRecord>
where
    I: IntoIterator<Item = &'a PeakRecord>,
{
    let mut multiplicity: HashMap<ScanKey, usize> = HashMap::with_capacity(admissible.len());
    for id in admissible {
        *multiplicity.entry(ScanKey::from(*id)).or_default() += 1;
    }

    let mut joined = Vec::new();
    for peak in peaks {
        if let Some(&count) = multiplicity.get(&ScanKey::from(peak)) {
            joined.extend(std::iter::repeat(peak).take(count));
        }
    }
    joined
}

/// Relative fragment error of a single peak in ppm.
///
/// Returns `None` when the result is not finite (zero calculated m/z).
pub fn fragment_ppm_error(peak: &PeakRecord) -> Option<f64> {
    let ppm = peak.ms2_error * PPM / peak.calc_mz;
    ppm.is_finite().then_some(ppm)
}

/// Fragment ppm errors of the joined rows, in join order.
pub fn fragment_errors(joined: &[&PeakRecord]) -> Vec<f64> {
    joined.iter().filter_map(|p| fragment_ppm_error(p)).collect()
}

/// Keep errors inside the inclusive bounds.
pub fn within_bounds(errors: Vec<f64>, bounds: &Ms2ErrorBounds) -> Vec<f64> {
    errors.into_iter().filter(|e| bounds.contains(*e)).collect()
}
