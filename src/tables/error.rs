/// Errors that can occur while reading identification or peak tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error reading a table file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Required column absent from the header line
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Row too short to carry a required column
    #[error("Row {row}: missing value for column '{column}'")]
    MissingField {
        /// 1-based data row (header excluded)
        row: usize,
        /// Column name
        column: String,
    },

    /// Value that does not parse as a number after separator stripping
    #[error("Row {row}: cannot parse '{value}' in column '{column}' as a number")]
    MalformedNumber {
        /// 1-based data row (header excluded)
        row: usize,
        /// Column name
        column: String,
        /// Raw field text
        value: String,
    },
}
