//! Per-field conversion, auto-correction and validation rules.
//!
//! Conversion turns one raw cell into a typed value and, when the value had
//! to be changed, a warning carrying the original. Validation checks a typed
//! value against the schema without changing it. The importer and the row
//! form share both.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use genepi_model::{
    FieldValue, Metadata, MetadataField, Schema, Value, ValueKind, WarningCode, WarningMessage,
    Workflow,
};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::context::ValidationContext;

/// Keyword that clears a value in the edit workflow.
pub const DELETE_KEYWORD: &str = "delete";

pub const MAX_NAME_LENGTH: usize = 120;

/// Prefix GISAID prepends to public IDs; we store IDs without it.
pub const PUBLIC_ID_PREFIX: &str = "hcov-19/";

const DATE_LENGTH: usize = 10;

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex"));

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 _\-./]+$").expect("Invalid name regex"));

const TRUE_TOKENS: &[&str] = &["true", "yes", "y", "1", "private"];
const FALSE_TOKENS: &[&str] = &["false", "no", "n", "0", "public"];

/// Why a field value is not acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FieldError {
    #[error("required")]
    Required,
    #[error("expected YYYY-MM-DD")]
    DateFormat,
    #[error("not a calendar date")]
    InvalidDate,
    #[error("date cannot be in the future")]
    FutureDate,
    #[error("must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("only letters, numbers, spaces and _ - . / are allowed")]
    NameCharacters,
    #[error("no matching location for \"{0}\"")]
    UnresolvedLocation(String),
}

/// Result of converting one raw cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub value: FieldValue<Value>,
    pub warning: Option<WarningMessage>,
    /// Set when the raw text could not be turned into a value at all.
    pub error: Option<FieldError>,
}

impl Conversion {
    fn value(value: FieldValue<Value>) -> Self {
        Self {
            value,
            warning: None,
            error: None,
        }
    }

    fn corrected(value: FieldValue<Value>, warning: WarningMessage) -> Self {
        Self {
            value,
            warning: Some(warning),
            error: None,
        }
    }
}

pub fn is_delete_keyword(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(DELETE_KEYWORD)
}

pub fn parse_bool_token(raw: &str) -> Option<bool> {
    let token = raw.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&token.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&token.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Public ID with any GISAID prefix removed, if one was present.
pub fn strip_public_id_prefix(raw: &str) -> Option<&str> {
    let prefix = raw.get(..PUBLIC_ID_PREFIX.len())?;
    if prefix.eq_ignore_ascii_case(PUBLIC_ID_PREFIX) {
        raw.get(PUBLIC_ID_PREFIX.len()..)
    } else {
        None
    }
}

pub fn validate_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, FieldError> {
    if raw.len() != DATE_LENGTH || !DATE_REGEX.is_match(raw) {
        return Err(FieldError::DateFormat);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| FieldError::InvalidDate)?;
    if date > today {
        return Err(FieldError::FutureDate);
    }
    Ok(date)
}

pub fn validate_name(raw: &str) -> Result<(), FieldError> {
    if raw.chars().count() > MAX_NAME_LENGTH {
        return Err(FieldError::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    if !NAME_REGEX.is_match(raw) {
        return Err(FieldError::NameCharacters);
    }
    Ok(())
}

/// Convert one raw cell (or one typed-in form value) for `field`.
pub fn convert_cell(ctx: &ValidationContext<'_>, field: MetadataField, raw: &str) -> Conversion {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Conversion::value(empty_value(&ctx.schema, field));
    }
    if ctx.schema.allows_delete(field) && is_delete_keyword(trimmed) {
        return Conversion::value(FieldValue::Cleared);
    }
    match field.kind() {
        ValueKind::Text => convert_text(field, trimmed),
        ValueKind::Date => Conversion::value(FieldValue::Set(Value::Text(trimmed.to_string()))),
        ValueKind::Bool => convert_bool(field, trimmed),
        ValueKind::Location => convert_location(ctx, field, trimmed),
    }
}

fn empty_value(schema: &Schema, field: MetadataField) -> FieldValue<Value> {
    match (field, schema.workflow) {
        (MetadataField::KeepPrivate, Workflow::Upload) => {
            FieldValue::Set(Value::Bool(false))
        }
        _ => FieldValue::Unset,
    }
}

fn convert_text(field: MetadataField, trimmed: &str) -> Conversion {
    if field == MetadataField::PublicId
        && let Some(stripped) = strip_public_id_prefix(trimmed)
    {
        let stripped = stripped.trim();
        let value = if stripped.is_empty() {
            FieldValue::Unset
        } else {
            FieldValue::Set(Value::Text(stripped.to_string()))
        };
        return Conversion::corrected(
            value,
            WarningMessage::new(WarningCode::AutoCorrect, field, trimmed, stripped),
        );
    }
    Conversion::value(FieldValue::Set(Value::Text(trimmed.to_string())))
}

fn convert_bool(field: MetadataField, trimmed: &str) -> Conversion {
    match parse_bool_token(trimmed) {
        Some(flag) => Conversion::value(FieldValue::Set(Value::Bool(flag))),
        None => Conversion::corrected(
            FieldValue::Set(Value::Bool(false)),
            WarningMessage::new(WarningCode::AutoCorrect, field, trimmed, "false"),
        ),
    }
}

fn convert_location(ctx: &ValidationContext<'_>, field: MetadataField, trimmed: &str) -> Conversion {
    match ctx.finder.find(trimmed) {
        Some(location) if location.is_exact_match(trimmed) => {
            Conversion::value(FieldValue::Set(Value::Location(location)))
        }
        Some(location) => {
            let updated = location.path();
            Conversion::corrected(
                FieldValue::Set(Value::Location(location)),
                WarningMessage::new(WarningCode::BadFormatData, field, trimmed, updated),
            )
        }
        None => Conversion {
            value: FieldValue::Unset,
            warning: Some(WarningMessage::new(
                WarningCode::BadFormatData,
                field,
                trimmed,
                "",
            )),
            error: Some(FieldError::UnresolvedLocation(trimmed.to_string())),
        },
    }
}

/// Check one typed value against the schema.
pub fn validate_field(
    schema: &Schema,
    field: MetadataField,
    value: &FieldValue<Value>,
    today: NaiveDate,
) -> Result<(), FieldError> {
    let value = match value {
        FieldValue::Set(value) => value,
        FieldValue::Unset | FieldValue::Cleared => {
            return if schema.is_value_required(field) {
                Err(FieldError::Required)
            } else {
                Ok(())
            };
        }
    };
    match (field.kind(), value) {
        (ValueKind::Date, Value::Text(text)) => validate_date(text, today).map(|_| ()),
        (ValueKind::Text, Value::Text(text)) if field.is_identifier() => validate_name(text),
        _ => Ok(()),
    }
}

/// Every failing field of `metadata`, for the columns of `schema`.
pub fn validate_metadata(
    schema: &Schema,
    metadata: &Metadata,
    today: NaiveDate,
) -> BTreeMap<MetadataField, FieldError> {
    schema
        .columns
        .iter()
        .filter_map(|column| {
            validate_field(schema, column.field, &metadata.get(column.field), today)
                .err()
                .map(|error| (column.field, error))
        })
        .collect()
}
