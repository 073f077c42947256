//! Geometry extraction from survey field files
//!
//! Two source formats produce receiver coordinates: spreadsheet
//! station-coordinate tables and SEG-Y trace headers. Both extractors
//! are pure functions over their input and all-or-nothing: a malformed
//! file yields an error, never partial results.

pub mod segy;
pub mod spreadsheet;

use thiserror::Error;

/// Extraction failure kinds.
///
/// The HTTP layer maps all of these to one 400 response, but the kinds
/// stay distinct so library callers and tests can tell them apart.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No sheet name matched the station-coordinates pattern.
    #[error("no station coordinate sheet found in workbook")]
    NoMatchingSheet,

    /// The matched sheet does not have the expected column layout.
    #[error("unexpected sheet layout: {0}")]
    SchemaMismatch(String),

    /// A trace header ended before an expected field.
    #[error("trace header missing field: {0}")]
    MissingField(&'static str),

    /// The binary header declares a sample format this reader cannot size.
    #[error("unsupported SEG-Y sample format code: {0}")]
    UnsupportedSampleFormat(i16),

    /// The workbook container itself could not be opened or read.
    #[error("unreadable workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// Unreadable file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
