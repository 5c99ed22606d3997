use std::path::PathBuf;

use thiserror::Error;

/// Structural problems: missing sections or keys, unusable values.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("missing section [{0}]")]
    MissingSection(&'static str),

    #[error("missing key {key} in section [{section}]")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("line {line}: unsupported object type (flags {flags:#010b})")]
    UnsupportedObjectType { line: usize, flags: i32 },
}

/// A hit object line that cannot be split into the expected fields.
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("line {line}: expected at least {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: field {field} is not an integer: {value:?}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum BeatmapError {
    #[error("Failed to read beatmap file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse beatmap: {0}")]
    Parse(#[from] ParseError),

    #[error("Malformed hit object: {0}")]
    Format(#[from] FormatError),
}
