use super::*;
use mzdata::mzpeaks::{CentroidPeak, PeakSet};
use mzdata::spectrum::{MultiLayerSpectrum, Precursor, SelectedIon};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct PeakList {
    precursor_mzs: Vec<f64>,
    mzs: Vec<f64>,
    intensities: Vec<f32>,
}

impl Recalibrate for PeakList {
    fn correct_precursors(&mut self, correction: &MzCorrection) -> usize {
        self.precursor_mzs
            .iter_mut()
            .for_each(|mz| *mz = correction.apply(*mz));
        self.precursor_mzs.len()
    }

    fn correct_peaks(&mut self, correction: &MzCorrection) -> Result<usize, CorrectionError> {
        self.mzs.iter_mut().for_each(|mz| *mz = correction.apply(*mz));
        Ok(self.mzs.len())
    }
}

fn single_peak_list() -> PeakList {
    PeakList {
        precursor_mzs: vec![1000.0],
        mzs: vec![500.0],
        intensities: vec![1234.5],
    }
}

#[test]
fn test_known_correction() {
    let calibration = CalibrationResult::new(10.0, 5.0);
    let corrected = correct(vec![single_peak_list()], &calibration).unwrap();

    assert_eq!(corrected[0].precursor_mzs[0], 1000.0 / (1.0 + 10.0 / 1e6));
    assert_eq!(corrected[0].mzs[0], 500.0 / (1.0 + 5.0 / 1e6));
    assert!((corrected[0].precursor_mzs[0] - 999.990_000_1).abs() < 1e-6);
    assert!((corrected[0].mzs[0] - 499.997_500_012_5).abs() < 1e-6);
    assert_eq!(corrected[0].intensities, vec![1234.5]);
}

#[test]
fn test_stats() {
    let spectra = vec![
        single_peak_list(),
        PeakList {
            precursor_mzs: vec![],
            mzs: vec![100.0, 200.0, 300.0],
            intensities: vec![1.0, 2.0, 3.0],
        },
    ];
    let (_, stats) = correct_with_stats(spectra, &CalibrationResult::new(1.0, 1.0)).unwrap();
    assert_eq!(
        stats,
        CorrectionStats {
            spectra: 2,
            precursors: 1,
            peaks: 4
        }
    );
}

#[test]
fn test_correction_from_ppm() {
    let c = MzCorrection::from_ppm(-20.0);
    assert_eq!(c.ppm(), -20.0);
    assert!(c.apply(1000.0) > 1000.0);
    assert_eq!(MzCorrection::from_ppm(0.0).apply(123.456), 123.456);
}

#[test]
fn test_multilayer_spectrum_correction() {
    let mut spectrum = MultiLayerSpectrum::default();
    let mut precursor = Precursor::default();
    precursor.ions.push(SelectedIon {
        mz: 1000.0,
        ..Default::default()
    });
    spectrum.description.precursor = vec![precursor];
    spectrum.peaks = Some(PeakSet::new(vec![
        CentroidPeak::new(200.0, 10.0, 0),
        CentroidPeak::new(500.0, 20.0, 1),
    ]));

    let (corrected, stats) =
        correct_with_stats(vec![spectrum], &CalibrationResult::new(10.0, 5.0)).unwrap();

    let spectrum = &corrected[0];
    assert_eq!(spectrum.description.precursor[0].ions[0].mz, 1000.0 / (1.0 + 10.0 / 1e6));
    let peaks = spectrum.peaks.as_ref().unwrap();
    let mzs: Vec<f64> = peaks.iter().map(|p| p.mz).collect();
    let intensities: Vec<f32> = peaks.iter().map(|p| p.intensity).collect();
    assert_eq!(mzs, vec![200.0 / (1.0 + 5.0 / 1e6), 500.0 / (1.0 + 5.0 / 1e6)]);
    assert_eq!(intensities, vec![10.0, 20.0]);
    assert_eq!(stats.precursors, 1);
    assert_eq!(stats.peaks, 2);
}

#[test]
fn test_spectrum_without_peaks() {
    let spectrum = MultiLayerSpectrum::default();
    let (_, stats) = correct_with_stats(vec![spectrum], &CalibrationResult::new(3.0, 3.0)).unwrap();
    assert_eq!(stats.peaks, 0);
    assert_eq!(stats.precursors, 0);
    assert_eq!(stats.spectra, 1);
}

fn peak_list_strategy() -> impl Strategy<Value = PeakList> {
    (
        prop::collection::vec(100.0f64..2000.0, 0..3),
        prop::collection::vec((50.0f64..2000.0, 0.0f32..1e7), 0..50),
    )
        .prop_map(|(precursor_mzs, peaks)| {
            let (mzs, intensities) = peaks.into_iter().unzip();
            PeakList {
                precursor_mzs,
                mzs,
                intensities,
            }
        })
}

proptest! {
    #[test]
    fn prop_neutral_calibration_is_identity(spectra in prop::collection::vec(peak_list_strategy(), 0..8)) {
        let corrected = correct(spectra.clone(), &CalibrationResult::NEUTRAL).unwrap();
        prop_assert_eq!(corrected, spectra);
    }

    #[test]
    fn prop_correction_preserves_shape(
        spectra in prop::collection::vec(peak_list_strategy(), 0..8),
        precursor_ppm in -50.0f64..50.0,
        ms2_ppm in -50.0f64..50.0,
    ) {
        let calibration = CalibrationResult::new(precursor_ppm, ms2_ppm);
        let corrected = correct(spectra.clone(), &calibration).unwrap();

        prop_assert_eq!(corrected.len(), spectra.len());
        for (before, after) in spectra.iter().zip(&corrected) {
            prop_assert_eq!(before.mzs.len(), after.mzs.len());
            prop_assert_eq!(&before.intensities, &after.intensities);
            // Division by a positive constant keeps peak order
            for (a, b) in before.mzs.iter().zip(&after.mzs) {
                prop_assert_eq!(*b, a / (1.0 + ms2_ppm / 1e6));
            }
            for (a, b) in before.precursor_mzs.iter().zip(&after.precursor_mzs) {
                prop_assert_eq!(*b, a / (1.0 + precursor_ppm / 1e6));
            }
        }
    }
}
