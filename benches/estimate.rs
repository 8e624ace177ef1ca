use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mzdata::mzpeaks::{CentroidPeak, PeakSet};
use mzdata::spectrum::{MultiLayerSpectrum, Precursor, SelectedIon};
use mzrecal::calibration::{estimate, CalibrationParams, CalibrationResult};
use mzrecal::correction::correct;
use mzrecal::tables::{IdentificationRecord, PeakRecord};

/// Synthetic search tables with `peaks_per_scan` annotations per identification
fn create_tables(
    num_scans: usize,
    peaks_per_scan: usize,
) -> (Vec<IdentificationRecord>, Vec<PeakRecord>) {
    let identifications = (0..num_scans)
        .map(|i| IdentificationRecord {
            decoy: (i % 20 == 0) as i64,
            match_score: 4.0 + (i % 8) as f64,
            scan: i as i64,
            run: Some((i % 3) as i64),
            precursor_error: (i % 11) as f64 - 5.0,
        })
        .collect();

    let peaks = (0..num_scans)
        .flat_map(|i| {
            (0..peaks_per_scan).map(move |j| PeakRecord {
                calc_mz: 200.0 + j as f64 * 25.0,
                ms2_error: ((i + j) % 13) as f64 * 0.001 - 0.006,
                scan: i as i64,
                run: Some((i % 3) as i64),
                is_primary_match: (j % 4 != 0) as i64,
            })
        })
        .collect();

    (identifications, peaks)
}

fn create_spectra(num_spectra: usize, peaks_per_spectrum: usize) -> Vec<MultiLayerSpectrum> {
    (0..num_spectra)
        .map(|i| {
            let mut spectrum = MultiLayerSpectrum::default();
            spectrum.description.ms_level = 2;
            let mut precursor = Precursor::default();
            precursor.ions.push(SelectedIon {
                mz: 400.0 + (i % 500) as f64,
                ..Default::default()
            });
            spectrum.description.precursor = vec![precursor];
            spectrum.peaks = Some(PeakSet::new(
                (0..peaks_per_spectrum)
                    .map(|j| CentroidPeak::new(100.0 + j as f64 * 10.0, 1000.0, j as u32))
                    .collect(),
            ));
            spectrum
        })
        .collect()
}

/// Benchmark the full estimation on tables of increasing size
fn bench_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate");
    let params = CalibrationParams::default();

    for num_scans in [1_000, 10_000, 50_000] {
        let (identifications, peaks) = create_tables(num_scans, 20);
        group.throughput(Throughput::Elements(peaks.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}scans", num_scans)),
            &num_scans,
            |b, _| b.iter(|| black_box(estimate(&identifications, &peaks, &params))),
        );
    }

    group.finish();
}

/// Benchmark m/z correction of in-memory spectra
fn bench_correct(c: &mut Criterion) {
    let mut group = c.benchmark_group("correct");
    let calibration = CalibrationResult::new(3.5, -1.25);

    for num_spectra in [1_000, 10_000] {
        let peaks_per_spectrum = 100;
        let spectra = create_spectra(num_spectra, peaks_per_spectrum);
        group.throughput(Throughput::Elements((num_spectra * peaks_per_spectrum) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}spectra", num_spectra)),
            &num_spectra,
            |b, _| {
                b.iter_batched(
                    || spectra.clone(),
                    |spectra| black_box(correct(spectra, &calibration).unwrap()),
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_estimate, bench_correct);
criterion_main!(benches);
