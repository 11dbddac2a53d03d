//! Reading sample metadata files into rows keyed by template column.

pub mod delimiter;
pub mod error;
pub mod header;
pub mod table;

use std::path::Path;

pub use delimiter::Delimiter;
pub use error::{IngestError, Result, TableError};
pub use header::{match_header, missing_headers, normalize_header, resolve_headers};
pub use table::{ParsedTable, RawRow, decode_text, parse_bytes, parse_table};

/// A file selected for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImportFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Read a file from disk, keeping only its file name.
pub fn read_import_file(path: &Path) -> Result<ImportFile> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    tracing::debug!(%filename, bytes = bytes.len(), "read import file");
    Ok(ImportFile { filename, bytes })
}
