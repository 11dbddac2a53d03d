//! Header normalization and matching against a workflow's template.

use genepi_model::{Column, MetadataField, OPTIONAL_SUFFIX, Schema};

/// Trim, drop a BOM and collapse internal whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased header without the template's optional marker.
fn header_key(raw: &str) -> String {
    let normalized = normalize_header(raw).to_lowercase();
    let suffix = OPTIONAL_SUFFIX.trim().to_lowercase();
    match normalized.strip_suffix(&suffix) {
        Some(stripped) => stripped.trim_end().to_string(),
        None => normalized,
    }
}

/// Resolve one header cell to a column of `schema`.
pub fn match_header(raw: &str, schema: &Schema) -> Column {
    let key = header_key(raw);
    schema
        .columns
        .iter()
        .map(|column| column.field)
        .find(|field| {
            field.header().to_lowercase() == key || field.key().to_lowercase() == key
        })
        .map_or_else(|| Column::Unknown(normalize_header(raw)), Column::Known)
}

/// Map a header row to columns; repeated known headers keep the first match.
pub fn resolve_headers(raw_headers: &[String], schema: &Schema) -> Vec<Column> {
    let mut seen: Vec<MetadataField> = Vec::new();
    raw_headers
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            if normalize_header(raw).is_empty() {
                return Column::Unknown(format!("Column {}", idx + 1));
            }
            match match_header(raw, schema) {
                Column::Known(field) if seen.contains(&field) => {
                    Column::Unknown(normalize_header(raw))
                }
                Column::Known(field) => {
                    seen.push(field);
                    Column::Known(field)
                }
                unknown => unknown,
            }
        })
        .collect()
}

/// Required headers of `schema` absent from `columns`.
pub fn missing_headers(columns: &[Column], schema: &Schema) -> Vec<MetadataField> {
    schema
        .required_headers()
        .filter(|field| !columns.contains(&Column::Known(*field)))
        .collect()
}
