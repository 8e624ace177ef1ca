//! Mass error report.
//!
//! A one-row CSV table recording the calibration applied to a sample:
//!
//! ```text
//! sample,precursor_error_ppm,ms2_error_ppm
//! sample,2.75,-1.5
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationResult;

/// Errors that can occur while writing or reading the report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error on the report file
    #[error("Failed to access report file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Report file contained no data row
    #[error("Report contains no rows")]
    Empty,
}

/// One row of the mass error report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Sample label (output prefix)
    pub sample: String,
    /// Precursor error applied (ppm)
    pub precursor_error_ppm: f64,
    /// Fragment error applied (ppm)
    pub ms2_error_ppm: f64,
}

impl ErrorReport {
    /// Report for `sample` recording `calibration`
    pub fn new(sample: impl Into<String>, calibration: &CalibrationResult) -> Self {
        Self {
            sample: sample.into(),
            precursor_error_ppm: calibration.precursor_error_ppm,
            ms2_error_ppm: calibration.ms2_error_ppm,
        }
    }

    /// The calibration recorded in this report
    pub fn calibration(&self) -> CalibrationResult {
        CalibrationResult::new(self.precursor_error_ppm, self.ms2_error_ppm)
    }

    /// Write the report as CSV to `path`, replacing any existing file
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    /// Write the report as CSV (header plus one row)
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.serialize(self)?;
        csv_writer.flush()?;
        Ok(())
    }

    /// Read the first row of a CSV report
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        match csv_reader.deserialize().next() {
            Some(row) => Ok(row?),
            None => Err(ReportError::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_layout() {
        let report = ErrorReport::new("run_01", &CalibrationResult::new(2.75, -1.5));
        let mut buffer = Vec::new();
        report.write_to(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "sample,precursor_error_ppm,ms2_error_ppm\nrun_01,2.75,-1.5\n"
        );
    }

    #[test]
    fn test_report_read_back() {
        let report = ErrorReport::new("sample", &CalibrationResult::NEUTRAL);
        let mut buffer = Vec::new();
        report.write_to(&mut buffer).unwrap();

        let restored = ErrorReport::from_reader(buffer.as_slice()).unwrap();
        assert_eq!(restored, report);
        assert!(restored.calibration().is_neutral());
    }

    #[test]
    fn test_empty_report() {
        let err = ErrorReport::from_reader("sample,precursor_error_ppm,ms2_error_ppm\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, ReportError::Empty));
    }
}
