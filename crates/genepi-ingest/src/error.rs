//! Error types for ingestion.

use std::path::PathBuf;

use genepi_model::MetadataField;
use thiserror::Error;

/// Errors reading an import file from disk.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read import file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Structural reasons a file cannot be turned into rows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("file is not UTF-8 text")]
    NotText,
    #[error("file has no header row")]
    NoHeader,
    #[error("malformed record at line {line}: {message}")]
    Malformed { line: u64, message: String },
    #[error("missing required columns: {}", header_list(.0))]
    MissingHeaders(Vec<MetadataField>),
}

fn header_list(fields: &[MetadataField]) -> String {
    fields
        .iter()
        .map(|field| field.header())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, IngestError>;
