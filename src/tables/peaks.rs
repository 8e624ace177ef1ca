use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use super::numeric::{parse_float, parse_int, parse_run};
use super::{locate_columns, TableError};

/// Column names of the peak annotation table
pub mod peak_columns {
    /// Calculated fragment m/z
    pub const CALC_MZ: &str = "CalcMZ";
    /// Absolute fragment mass error
    pub const MS2_ERROR: &str = "MS2Error";
    /// Scan number
    pub const SCAN_NUMBER: &str = "ScanNumber";
    /// Run identifier, may be empty
    pub const RUN: &str = "Run";
    /// Primary match flag, 1 for the primary annotation of a peak
    pub const IS_PRIMARY_MATCH: &str = "IsPrimaryMatch";
}

use peak_columns as cols;

/// One annotated fragment peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakRecord {
    /// Calculated m/z of the annotated fragment
    pub calc_mz: f64,
    /// Raw mass error in absolute (m/z) units
    pub ms2_error: f64,
    /// Scan number
    pub scan: i64,
    /// Run identifier, `None` when the field was empty
    pub run: Option<i64>,
    /// Primary match flag
    pub is_primary_match: i64,
}

impl PeakRecord {
    /// Whether this row is the primary annotation of its peak
    pub fn is_primary(&self) -> bool {
        self.is_primary_match == 1
    }

    /// Read all peak records from a tab-delimited file
    pub fn from_tsv_file<P: AsRef<Path>>(path: P) -> Result<Vec<Self>, TableError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Read all peak records from a tab-delimited reader.
    ///
    /// Ragged rows are tolerated: fields beyond the header are ignored, and rows
    /// too short to reach a required column are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Vec<Self>, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let [calc_mz, ms2_error, scan, run, primary] = locate_columns(
            csv_reader.headers()?,
            [
                cols::CALC_MZ,
                cols::MS2_ERROR,
                cols::SCAN_NUMBER,
                cols::RUN,
                cols::IS_PRIMARY_MATCH,
            ],
        )?;
        let last_required = calc_mz.max(ms2_error).max(scan).max(run).max(primary);

        let mut records = Vec::new();
        let mut short_rows = 0usize;
        for (i, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = i + 1;

            if record.len() <= last_required {
                short_rows += 1;
                continue;
            }

            records.push(PeakRecord {
                calc_mz: parse_float(&record[calc_mz], cols::CALC_MZ, row)?,
                ms2_error: parse_float(&record[ms2_error], cols::MS2_ERROR, row)?,
                scan: parse_int(&record[scan], cols::SCAN_NUMBER, row)?,
                run: parse_run(&record[run], cols::RUN, row)?,
                is_primary_match: parse_int(&record[primary], cols::IS_PRIMARY_MATCH, row)?,
            });
        }

        if short_rows > 0 {
            debug!("Skipped {} truncated peak rows", short_rows);
        }
        debug!("Read {} peak rows", records.len());
        Ok(records)
    }
}
