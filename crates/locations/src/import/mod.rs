//! Bulk import of locations from an uploaded ZIP archive.
//!
//! The archive has to contain exactly one `.txt` file. Its first line is a
//! header and is ignored, every other non-blank line is `name,latitude,longitude`.
//! Broken lines are collected as [`LineError`]s and do not stop the import,
//! unless not a single line could be used.

use model::location::NewLocation;

mod archive;
mod parse;

pub use archive::read_payload;
pub use parse::{parse_line, parse_payload};

#[cfg(test)]
pub(crate) use archive::tests::zip_archive;

/// Largest archive accepted for a single upload.
pub const MAX_ARCHIVE_SIZE: usize = 10 * 1024 * 1024;

/// Largest decompressed payload read out of an archive.
pub const MAX_PAYLOAD_SIZE: u64 = 64 * 1024 * 1024;

pub const TEXT_EXTENSION: &str = ".txt";

/// Folder macOS adds to archives created with Finder.
pub const METADATA_PREFIX: &str = "__MACOSX";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("File too large (maximum is 10 MB)")]
    TooLarge,
    #[error("Invalid ZIP file")]
    InvalidArchive(#[source] zip::result::ZipError),
    #[error("ZIP file must contain at least one .txt file")]
    NoTextFile,
    #[error("ZIP file must contain exactly one .txt file")]
    MultipleTextFiles,
    #[error("Text file is empty or has no data")]
    Empty,
    #[error("No valid locations found in file")]
    NoValidLocations(Vec<LineError>),
}

impl ImportError {
    /// Per line messages, only present if every line of the file was rejected.
    pub fn details(&self) -> Option<Vec<String>> {
        match self {
            Self::NoValidLocations(errors) => {
                Some(errors.iter().map(ToString::to_string).collect())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LineErrorKind {
    #[error("Invalid format (expected 3 columns)")]
    InvalidFormat,
    #[error("Missing location name")]
    MissingName,
    #[error("Invalid coordinates")]
    InvalidCoordinates,
    #[error("Coordinates out of range")]
    OutOfRange,
}

/// A rejected line. `line` is 1-based and counts the header, so it matches
/// what an editor shows for the file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Line {line}: {kind}")]
pub struct LineError {
    pub line: usize,
    pub kind: LineErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub line: usize,
    pub location: NewLocation,
}

/// Outcome of parsing a payload which contained at least one usable line.
#[derive(Debug, Clone, Default)]
pub struct ParsedPayload {
    pub candidates: Vec<Candidate>,
    pub errors: Vec<LineError>,
}

/// Reads and validates an uploaded archive. Nothing is stored yet.
pub fn prepare(archive: &[u8]) -> Result<ParsedPayload, ImportError> {
    let text = read_payload(archive)?;
    parse_payload(&text)
}
