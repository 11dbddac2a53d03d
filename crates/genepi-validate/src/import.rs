//! Turn an import file into a [`ParseResult`].

use std::collections::{BTreeMap, BTreeSet};

use genepi_ingest::{ParsedTable, RawRow, TableError, parse_bytes};
use genepi_model::{
    Column, ErrorCode, FieldValue, Metadata, MetadataField, ParseResult, Value, WarningCode,
    WarningMessage,
};
use tracing::{debug, info, info_span, warn};

use crate::context::ValidationContext;
use crate::rules::{convert_cell, validate_name};

/// Parse, convert and check one file. Never fails: every problem is
/// recorded in the returned result.
pub fn import_file(ctx: &ValidationContext<'_>, filename: &str, bytes: &[u8]) -> ParseResult {
    let span = info_span!("import", %filename, workflow = %ctx.schema.workflow);
    let _guard = span.enter();
    let mut result = ParseResult::new(filename);
    match parse_bytes(filename, bytes, &ctx.schema) {
        Ok(table) => import_table(ctx, table, &mut result),
        Err(TableError::MissingHeaders(fields)) => {
            warn!(missing = fields.len(), "import file is missing required columns");
            for field in fields {
                result.add_error(ErrorCode::MissingField, field.header());
            }
        }
        Err(TableError::Malformed { line, message }) => {
            warn!(line, %message, "import file has a malformed record");
            result.add_error(ErrorCode::Default, format!("line {line}: {message}"));
        }
        Err(error) => {
            warn!(%error, "import file could not be parsed");
            for column in &ctx.schema.columns {
                result.add_error(ErrorCode::MissingField, column.field.header());
            }
        }
    }
    result
}

/// Counts of each value seen in one column, for duplicate detection.
#[derive(Default)]
struct Occurrences(BTreeMap<String, usize>);

impl Occurrences {
    fn record(&mut self, value: &str) {
        *self.0.entry(value.to_string()).or_default() += 1;
    }

    fn duplicates(&self) -> impl Iterator<Item = &String> {
        self.0
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(value, _)| value)
    }
}

fn import_table(ctx: &ValidationContext<'_>, table: ParsedTable, result: &mut ParseResult) {
    result.has_unknown_fields = table.has_unknown_fields();
    result.unknown_headers = table.unknown_headers();
    let identifier = ctx.schema.identifier;

    let rows: Vec<RawRow> = table
        .rows
        .into_iter()
        .filter(|row| {
            let id = row.get(identifier).unwrap_or_default();
            !ctx.options.is_example_identifier(id.trim())
        })
        .collect();
    if rows.len() > ctx.options.max_samples {
        warn!(
            rows = rows.len(),
            max = ctx.options.max_samples,
            "import exceeds sample limit"
        );
        result.add_error(ErrorCode::OverMaxSamples, rows.len().to_string());
        return;
    }

    let mut identifiers = Occurrences::default();
    let mut public_ids = Occurrences::default();
    let mut new_private_ids = Occurrences::default();
    for row in &rows {
        let Some((id, metadata, complete)) = import_row(ctx, row, result) else {
            continue;
        };
        identifiers.record(&id);
        if identifier != MetadataField::PublicId
            && let Some(public_id) = metadata.public_id.as_set()
        {
            public_ids.record(public_id);
        }
        if let Some(new_id) = metadata.new_private_id.as_set() {
            new_private_ids.record(new_id);
        }
        if complete {
            // Last row in file order wins for repeated identifiers.
            result.data.insert(id, metadata);
        }
    }

    let identifier_code = if identifier == MetadataField::PublicId {
        ErrorCode::DuplicatePublicIds
    } else {
        ErrorCode::DuplicatePrivateIds
    };
    for id in identifiers.duplicates() {
        result.add_error(identifier_code, id.clone());
    }
    for id in public_ids.duplicates() {
        result.add_error(ErrorCode::DuplicatePublicIds, id.clone());
    }
    for id in new_private_ids.duplicates() {
        result.add_error(ErrorCode::DuplicatePrivateIds, id.clone());
    }

    info!(
        rows = rows.len(),
        imported = result.data.len(),
        errors = result.error_messages.values().map(BTreeSet::len).sum::<usize>(),
        warnings = result.warning_messages.values().map(BTreeMap::len).sum::<usize>(),
        "import parsed"
    );
}

/// Convert one row. Returns `None` when the row has no identifier, otherwise
/// the identifier, its metadata and whether every required value is present.
fn import_row(
    ctx: &ValidationContext<'_>,
    row: &RawRow,
    result: &mut ParseResult,
) -> Option<(String, Metadata, bool)> {
    let identifier = ctx.schema.identifier;
    let id_conversion = convert_cell(ctx, identifier, row.get(identifier).unwrap_or_default());
    let Some(Value::Text(id)) = id_conversion.value.as_set().cloned() else {
        debug!(line = row.line, "row has no identifier");
        result.add_error(ErrorCode::Default, format!("row {}", row.line));
        return None;
    };
    if let Some(warning) = id_conversion.warning {
        result.add_warning(&id, warning);
    }

    let mut metadata = Metadata::default();
    set_value(&mut metadata, identifier, id_conversion.value);
    for (column, raw) in &row.cells {
        match column {
            Column::Known(field) if *field != identifier => {
                let conversion = convert_cell(ctx, *field, raw);
                if let Some(warning) = conversion.warning {
                    result.add_warning(&id, warning);
                }
                set_value(&mut metadata, *field, conversion.value);
            }
            Column::Known(_) => {}
            Column::Unknown(name) => {
                if !raw.is_empty() {
                    metadata.unknown.insert(name.clone(), raw.clone());
                }
            }
        }
    }

    for field in [MetadataField::PrivateId, MetadataField::NewPrivateId] {
        if let Some(name) = field_text(&metadata, field)
            && validate_name(&name).is_err()
        {
            result.add_error(ErrorCode::InvalidName, name);
        }
    }

    let mut complete = true;
    for column in &ctx.schema.columns {
        if !column.value_required || column.field == identifier {
            continue;
        }
        if !metadata.get(column.field).is_set() {
            let original = row.get(column.field).unwrap_or_default();
            result.add_warning(
                &id,
                WarningMessage::new(WarningCode::MissingData, column.field, original, ""),
            );
            complete = false;
        }
    }
    if !complete {
        debug!(line = row.line, "row skipped for missing required data");
    }
    Some((id, metadata, complete))
}

fn set_value(metadata: &mut Metadata, field: MetadataField, value: FieldValue<Value>) {
    if let Err(error) = metadata.set(field, value) {
        warn!(%error, "converted value does not fit its field");
    }
}

fn field_text(metadata: &Metadata, field: MetadataField) -> Option<String> {
    match metadata.get(field) {
        FieldValue::Set(Value::Text(text)) => Some(text),
        _ => None,
    }
}
