//! Delimited text to header-keyed rows.

use csv::ReaderBuilder;
use genepi_model::{Column, MetadataField, Schema};
use tracing::debug;

use crate::delimiter::Delimiter;
use crate::error::TableError;
use crate::header::{missing_headers, normalize_header, resolve_headers};

/// One data row, cells paired with their column in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub cells: Vec<(Column, String)>,
}

impl RawRow {
    /// Cell for a known field; `None` when the column is absent.
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.cells.iter().find_map(|(column, value)| match column {
            Column::Known(known) if *known == field => Some(value.as_str()),
            _ => None,
        })
    }

    /// Passthrough cells from columns outside the template.
    pub fn unknown(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().filter_map(|(column, value)| match column {
            Column::Unknown(name) => Some((name.as_str(), value.as_str())),
            Column::Known(_) => None,
        })
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    /// Header cells as written, trailing blanks removed.
    pub raw_headers: Vec<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<RawRow>,
}

impl ParsedTable {
    pub fn has_unknown_fields(&self) -> bool {
        self.columns.iter().any(Column::is_unknown)
    }

    pub fn unknown_headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| column.is_unknown())
            .map(ToString::to_string)
            .collect()
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Decode bytes as text, rejecting anything that looks binary.
pub fn decode_text(bytes: &[u8]) -> Result<&str, TableError> {
    let text = std::str::from_utf8(bytes).map_err(|_| TableError::NotText)?;
    if text.contains('\0') {
        return Err(TableError::NotText);
    }
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// A line whose first non-blank character is `#`.
fn is_comment(cells: &[String]) -> bool {
    cells.first().is_some_and(|cell| cell.starts_with('#'))
}

/// Parse delimited text against a workflow schema.
///
/// The first non-comment, non-blank record is the header row. Required
/// headers missing from it fail the whole table. Below the header, a `#`
/// line that still carries values in later cells is a data row, so an
/// identifier such as `#42` is reported rather than dropped.
pub fn parse_table(
    text: &str,
    delimiter: Delimiter,
    schema: &Schema,
) -> Result<ParsedTable, TableError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        // Template TSVs are unquoted; a stray quote must not swallow later lines.
        .quoting(delimiter == Delimiter::Comma)
        .from_reader(text.as_bytes());

    let mut header: Option<(Vec<String>, Vec<Column>)> = None;
    let mut rows = Vec::new();
    let mut comments = 0usize;
    for record in reader.records() {
        let record = record.map_err(|error| TableError::Malformed {
            line: error.position().map_or(0, csv::Position::line),
            message: error.to_string(),
        })?;
        let line = record.position().map_or(0, csv::Position::line);
        let cells: Vec<String> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(String::is_empty) {
            continue;
        }
        if is_comment(&cells) && (header.is_none() || cells[1..].iter().all(String::is_empty)) {
            comments += 1;
            continue;
        }
        if record.iter().any(|cell| cell.contains(['\n', '\r'])) {
            return Err(TableError::Malformed {
                line,
                message: "quoted value spans several lines".to_string(),
            });
        }
        let Some((_, columns)) = header.as_ref() else {
            let mut raw_headers: Vec<String> =
                cells.iter().map(String::as_str).map(normalize_header).collect();
            while raw_headers.last().is_some_and(String::is_empty) {
                raw_headers.pop();
            }
            let columns = resolve_headers(&raw_headers, schema);
            header = Some((raw_headers, columns));
            continue;
        };
        let row = RawRow {
            line,
            cells: columns
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let value = cells.get(idx).cloned().unwrap_or_default();
                    (column.clone(), value)
                })
                .collect(),
        };
        if !row.is_blank() {
            rows.push(row);
        }
    }

    let Some((raw_headers, columns)) = header else {
        return Err(TableError::NoHeader);
    };
    let missing = missing_headers(&columns, schema);
    if !missing.is_empty() {
        return Err(TableError::MissingHeaders(missing));
    }
    debug!(
        columns = columns.len(),
        rows = rows.len(),
        comments,
        ?delimiter,
        "parsed delimited table"
    );
    Ok(ParsedTable {
        raw_headers,
        columns,
        rows,
    })
}

/// Decode and parse raw file bytes, picking the delimiter from `filename`.
pub fn parse_bytes(
    filename: &str,
    bytes: &[u8],
    schema: &Schema,
) -> Result<ParsedTable, TableError> {
    let text = decode_text(bytes)?;
    let delimiter = Delimiter::detect(filename, text);
    parse_table(text, delimiter, schema)
}
