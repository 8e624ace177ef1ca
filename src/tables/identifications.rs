use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use super::numeric::{parse_float, parse_int, parse_run};
use super::{locate_columns, TableError};

/// Column names of the identification results table
pub mod identification_columns {
    /// Decoy flag, 0 for target matches
    pub const DECOY: &str = "decoy";
    /// Match score
    pub const MATCH_SCORE: &str = "match score";
    /// Scan number
    pub const SCAN: &str = "Scan";
    /// Run identifier, may be empty
    pub const RUN: &str = "Run";
    /// Precursor mass error in ppm
    pub const PRECURSOR_ERROR: &str = "Precursor Error";
}

use identification_columns as cols;

/// One peptide-spectrum match candidate from a linear search result table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentificationRecord {
    /// Decoy flag (0 = target)
    pub decoy: i64,
    /// Match score
    pub match_score: f64,
    /// Scan number
    pub scan: i64,
    /// Run identifier, `None` when the field was empty
    pub run: Option<i64>,
    /// Observed precursor mass error (ppm)
    pub precursor_error: f64,
}

impl IdentificationRecord {
    /// Whether this is a target (non-decoy) match
    pub fn is_target(&self) -> bool {
        self.decoy == 0
    }

    /// Read all identification records from a comma-delimited file
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Vec<Self>, TableError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Read all identification records from a comma-delimited reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Vec<Self>, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let [decoy, score, scan, run, precursor_error] = locate_columns(
            csv_reader.headers()?,
            [
                cols::DECOY,
                cols::MATCH_SCORE,
                cols::SCAN,
                cols::RUN,
                cols::PRECURSOR_ERROR,
            ],
        )?;

        let mut records = Vec::new();
        for (i, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = i + 1;
            let field = |idx: usize, column: &'static str| {
                record.get(idx).ok_or_else(|| TableError::MissingField {
                    row,
                    column: column.to_string(),
                })
            };

            records.push(IdentificationRecord {
                decoy: parse_int(field(decoy, cols::DECOY)?, cols::DECOY, row)?,
                match_score: parse_float(field(score, cols::MATCH_SCORE)?, cols::MATCH_SCORE, row)?,
                scan: parse_int(field(scan, cols::SCAN)?, cols::SCAN, row)?,
                run: parse_run(field(run, cols::RUN)?, cols::RUN, row)?,
                precursor_error: parse_float(
                    field(precursor_error, cols::PRECURSOR_ERROR)?,
                    cols::PRECURSOR_ERROR,
                    row,
                )?,
            });
        }

        debug!("Read {} identification rows", records.len());
        Ok(records)
    }
}
