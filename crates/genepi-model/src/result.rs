//! Output of parsing one import file.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::codes::{ErrorCode, WarningCode};
use crate::field::MetadataField;
use crate::metadata::Metadata;

/// One value the importer changed or could not use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningMessage {
    pub code: WarningCode,
    pub field: MetadataField,
    pub original_value: String,
    pub updated_value: String,
}

impl WarningMessage {
    pub fn new(
        code: WarningCode,
        field: MetadataField,
        original: impl Into<String>,
        updated: impl Into<String>,
    ) -> Self {
        Self {
            code,
            field,
            original_value: original.into(),
            updated_value: updated.into(),
        }
    }
}

pub type WarningMessages = BTreeMap<WarningCode, BTreeMap<String, Vec<WarningMessage>>>;
pub type ErrorMessages = BTreeMap<ErrorCode, BTreeSet<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Rows that passed the required-field checks, keyed by identifier.
    pub data: BTreeMap<String, Metadata>,
    pub warning_messages: WarningMessages,
    pub error_messages: ErrorMessages,
    pub filename: String,
    pub has_unknown_fields: bool,
    /// Headers that did not match the template, in file order.
    #[serde(default)]
    pub unknown_headers: Vec<String>,
}

impl ParseResult {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn add_error(&mut self, code: ErrorCode, value: impl Into<String>) {
        self.error_messages
            .entry(code)
            .or_default()
            .insert(value.into());
    }

    pub fn add_warning(&mut self, identifier: &str, warning: WarningMessage) {
        self.warning_messages
            .entry(warning.code)
            .or_default()
            .entry(identifier.to_string())
            .or_default()
            .push(warning);
    }

    pub fn has_errors(&self) -> bool {
        self.error_messages.values().any(|values| !values.is_empty())
    }

    pub fn identifiers(&self) -> BTreeSet<String> {
        self.data.keys().cloned().collect()
    }

    pub fn warnings_for(&self, identifier: &str) -> Vec<&WarningMessage> {
        self.warning_messages
            .values()
            .filter_map(|by_id| by_id.get(identifier))
            .flatten()
            .collect()
    }
}
