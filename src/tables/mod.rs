//! Identification and peak annotation tables.
//!
//! Both tables are read fully into memory as ordered vectors of typed records.
//! Reading performs the normalization stage of the calibration pipeline:
//! separator stripping, numeric parsing and nullable run identifiers.

mod error;
mod identifications;
pub mod numeric;
mod peaks;

pub use error::TableError;
pub use identifications::{identification_columns, IdentificationRecord};
pub use peaks::{peak_columns, PeakRecord};

/// Resolve the positions of the required columns in a header row.
///
/// Header names are compared after trimming surrounding whitespace.
pub(crate) fn locate_columns<const N: usize>(
    headers: &csv::StringRecord,
    required: [&str; N],
) -> Result<[usize; N], TableError> {
    let mut positions = [0usize; N];
    for (slot, name) in positions.iter_mut().zip(required) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;
    }
    Ok(positions)
}
