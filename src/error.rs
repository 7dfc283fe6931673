use thiserror::Error;

use crate::coerce::BoxError;

/// Result type alias for mapping operations
pub type Result<T> = std::result::Result<T, CsvMapError>;

/// Errors that can occur while mapping CSV rows to records and back
#[derive(Error, Debug)]
pub enum CsvMapError {
    /// A declared field has a value type with no coercion rule
    #[error("Unsupported field kind for {field}: {kind}")]
    UnsupportedFieldKind { field: String, kind: String },

    /// The record type declares no mappable field
    #[error("No csv tags found on {type_name}")]
    NoTags { type_name: &'static str },

    /// Strict mode: a declared tag never matched a header
    #[error("Found unmatched struct tag(s): {}", .tags.join(", "))]
    UnmatchedTag { tags: Vec<String> },

    /// The input does not even contain a header row
    #[error("CSV input is empty, no header row found")]
    EmptyInput,

    /// Fixed-size destination too small to hold every data row
    #[error("Capacity problem: cannot store {needed} {type_name} in a destination of length {capacity}")]
    Capacity {
        needed: usize,
        capacity: usize,
        type_name: &'static str,
    },

    /// Cell text could not be parsed as the declared kind
    #[error("Cannot parse '{text}' as {kind} for field {field} (line {line}, column {column})")]
    Coercion {
        line: usize,
        column: usize,
        field: String,
        text: String,
        kind: String,
    },

    /// A custom codec failed to render a value
    #[error("{message}")]
    Marshal {
        field: String,
        message: String,
        source: BoxError,
    },

    /// A custom codec failed to parse a cell, the codec's message is kept as is
    #[error("{source}")]
    Unmarshal {
        line: usize,
        field: String,
        source: BoxError,
    },

    /// A record implementation rejected an access path from its own descriptor
    #[error("Invalid access path {path:?} for field {field}")]
    InvalidAccessPath { field: String, path: Vec<usize> },

    /// The row sink failed
    #[error("Row writer error: {0}")]
    RowWriter(#[source] csv::Error),

    /// Streaming encode received no record at all
    #[error("Empty stream, nothing to encode")]
    EmptyStream,

    /// CSV tokenizer error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// String encoding error
    #[error("String encoding error: {0}")]
    EncodingError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
