use mzdata::spectrum::bindata::ArrayRetrievalError;
use mzdata::spectrum::MultiLayerSpectrum;

use super::{CorrectionError, MzCorrection, Recalibrate};

const PROTON: f64 = 1.007_276_466_77;

fn charge_or_one(z: i32) -> f64 {
    if z == 0 {
        1.0
    } else {
        z as f64
    }
}

impl Recalibrate for MultiLayerSpectrum {
    fn correct_precursors(&mut self, correction: &MzCorrection) -> usize {
        let mut corrected = 0;
        for precursor in self.description.precursor.iter_mut() {
            for ion in precursor.ions.iter_mut() {
                ion.mz = correction.apply(ion.mz);
                corrected += 1;
            }
        }
        corrected
    }

    fn correct_peaks(&mut self, correction: &MzCorrection) -> Result<usize, CorrectionError> {
        let mut corrected = 0;

        if let Some(arrays) = self.arrays.as_mut() {
            match arrays.mzs_mut() {
                Ok(mzs) => {
                    for mz in mzs.iter_mut() {
                        *mz = correction.apply(*mz);
                    }
                    corrected += mzs.len();
                }
                Err(ArrayRetrievalError::NotFound(_)) => {}
                Err(source) => {
                    return Err(CorrectionError::ArrayError {
                        id: self.description.id.clone(),
                        source,
                    })
                }
            }
        }

        if let Some(peaks) = self.peaks.as_mut() {
            for peak in peaks.iter_mut() {
                peak.mz = correction.apply(peak.mz);
                corrected += 1;
            }
        }

        // Charge-annotated MGF peaks are held as neutral masses
        if let Some(peaks) = self.deconvoluted_peaks.as_mut() {
            for peak in peaks.iter_mut() {
                let z = charge_or_one(peak.charge);
                let mz = (peak.neutral_mass + z * PROTON) / z;
                peak.neutral_mass = correction.apply(mz) * z - z * PROTON;
                corrected += 1;
            }
        }

        Ok(corrected)
    }
}
