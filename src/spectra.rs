//! MGF input and output.
//!
//! Parsing and formatting are delegated to the [`mzdata`] MGF reader and
//! writer; this module only moves whole spectrum collections between files
//! and memory.
//!
//! Header entries read from the source file are written back as they were:
//! the source `TITLE` is kept as the spectrum title term and
//! [`SourceHeaderStyle`] emits the remaining entries without adding any of
//! its own. Charge-annotated peaks are held by mzdata as neutral masses and
//! come out sorted by m/z.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, warn};
use mzdata::io::mgf::{MGFError, MGFHeaderStyle, MGFParserState, MGFReader, MGFWriterType};
use mzdata::mzpeaks::{CentroidLike, CentroidPeak, DeconvolutedCentroidLike, DeconvolutedPeak};
use mzdata::params::{ControlledVocabulary, Param, ParamDescribed};
use mzdata::prelude::SpectrumLike;
use mzdata::spectrum::MultiLayerSpectrum;

/// MS:1000796 spectrum title
const TITLE_ACCESSION: u32 = 1000796;
/// MS:1000580 MSn spectrum
const MSN_SPECTRUM_ACCESSION: u32 = 1000580;
/// MS:1000511 ms level
const MS_LEVEL_ACCESSION: u32 = 1000511;

/// Errors that can occur while reading or writing spectra
#[derive(Debug, thiserror::Error)]
pub enum SpectraError {
    /// I/O error reading or writing a spectrum file
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Spectrum the MGF parser rejected
    #[error("Malformed MGF spectrum #{}: {}", .index + 1, .source)]
    Mgf {
        /// 0-based position of the spectrum in the file
        index: usize,
        /// Parser error
        #[source]
        source: MGFError,
    },
}

/// Header style that writes back the entries read from the source file.
///
/// `TITLE`, `RTINSECONDS` and `PEPMASS` are written by the mzdata writer
/// itself; every other parsed entry (`SCANS`, `SEQ`, ...) follows in file
/// order. No index-derived entries are added.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceHeaderStyle;

impl MGFHeaderStyle for SourceHeaderStyle {
    fn write_header<
        W: io::Write,
        C: CentroidLike,
        D: DeconvolutedCentroidLike,
        S: SpectrumLike<C, D>,
    >(
        writer: &mut MGFWriterType<W, C, D, Self>,
        spectrum: &S,
    ) -> io::Result<()> {
        for param in spectrum
            .description()
            .params()
            .iter()
            .filter(|p| !is_generated_term(p))
        {
            writer.write_param(param)?;
        }
        Ok(())
    }
}

fn is_ms_term(param: &Param, accession: u32) -> bool {
    param.controlled_vocabulary == Some(ControlledVocabulary::MS)
        && param.accession == Some(accession)
}

/// Terms the writer emits elsewhere or the reader adds on its own
fn is_generated_term(param: &Param) -> bool {
    [TITLE_ACCESSION, MSN_SPECTRUM_ACCESSION, MS_LEVEL_ACCESSION]
        .into_iter()
        .any(|accession| is_ms_term(param, accession))
}

/// Record the source `TITLE` (parsed into the spectrum id) as the title term
/// the writer looks up, so it is not replaced by a generated one.
fn keep_source_title(spectrum: &mut MultiLayerSpectrum) {
    let description = &mut spectrum.description;
    if description.id.is_empty()
        || description
            .params()
            .iter()
            .any(|p| is_ms_term(p, TITLE_ACCESSION))
    {
        return;
    }
    let mut title = Param::new();
    title.name = "spectrum title".to_string();
    title.accession = Some(TITLE_ACCESSION);
    title.controlled_vocabulary = Some(ControlledVocabulary::MS);
    title.value = description.id.clone().into();
    description.add_param(title);
}

/// Read every spectrum of an MGF file, in file order
pub fn read_mgf<P: AsRef<Path>>(path: P) -> Result<Vec<MultiLayerSpectrum>, SpectraError> {
    let file = File::open(path.as_ref())?;
    let spectra = read_mgf_from(BufReader::new(file))?;
    debug!(
        "Read {} spectra from {}",
        spectra.len(),
        path.as_ref().display()
    );
    Ok(spectra)
}

/// Read every spectrum from an MGF stream, in stream order.
///
/// The first spectrum the parser rejects fails the whole read; no spectrum
/// is dropped silently.
pub fn read_mgf_from<R: Read>(reader: R) -> Result<Vec<MultiLayerSpectrum>, SpectraError> {
    let mut reader: MGFReader<R> = MGFReader::new(reader);
    let mut spectra = Vec::new();
    loop {
        let mut spectrum = MultiLayerSpectrum::default();
        match reader.read_into(&mut spectrum) {
            Ok(_) => {
                keep_source_title(&mut spectrum);
                spectra.push(spectrum);
            }
            // End of input with no further BEGIN IONS
            Err(_) if reader.state == MGFParserState::Done => break,
            Err(source) => {
                return Err(SpectraError::Mgf {
                    index: spectra.len(),
                    source,
                })
            }
        }
    }
    Ok(spectra)
}

/// Write spectra to an MGF file, returning the number written
pub fn write_mgf<P: AsRef<Path>>(
    path: P,
    spectra: &[MultiLayerSpectrum],
) -> Result<usize, SpectraError> {
    let file = File::create(path.as_ref())?;
    let mut buffer = BufWriter::new(file);
    let written = write_mgf_to(&mut buffer, spectra)?;
    buffer.flush()?;
    debug!("Wrote {} spectra to {}", written, path.as_ref().display());
    Ok(written)
}

/// Write spectra to an MGF stream, returning the number written.
///
/// MGF holds MSn spectra only; MS1 spectra are skipped and not counted.
pub fn write_mgf_to<W: Write>(
    writer: W,
    spectra: &[MultiLayerSpectrum],
) -> Result<usize, SpectraError> {
    let mut writer: MGFWriterType<W, CentroidPeak, DeconvolutedPeak, SourceHeaderStyle> =
        MGFWriterType::new(writer);
    let mut written = 0;
    for spectrum in spectra {
        if spectrum.description.ms_level == 1 {
            warn!(
                "Skipping MS1 spectrum {}, MGF holds MSn spectra only",
                spectrum.description.id
            );
            continue;
        }
        writer.write(spectrum)?;
        written += 1;
    }
    writer.into_inner().flush()?;
    Ok(written)
}
