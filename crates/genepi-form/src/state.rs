//! Per-row form state and its validation transitions.

use std::collections::{BTreeMap, BTreeSet};

use genepi_model::{Metadata, MetadataField, WarningMessage};
use genepi_validate::{FieldError, ValidationContext, validate_metadata};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Nothing entered or imported for this row yet.
    Pristine,
    Touched,
    Validating,
    Valid,
    Invalid,
}

impl RowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pristine => "pristine",
            Self::Touched => "touched",
            Self::Validating => "validating",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFormState {
    pub values: Metadata,
    pub touched: BTreeSet<MetadataField>,
    pub status: RowStatus,
    pub is_valid: bool,
    pub errors: BTreeMap<MetadataField, FieldError>,
    /// Corrections applied to typed-in values, with the original text.
    pub warnings: BTreeMap<MetadataField, WarningMessage>,
    /// Errors from input that could not be converted at all (e.g. an
    /// unknown location); they outlive revalidation until the field changes.
    #[serde(skip)]
    pub(crate) input_errors: BTreeMap<MetadataField, FieldError>,
}

impl RowFormState {
    pub(crate) fn new(values: Metadata) -> Self {
        Self {
            values,
            touched: BTreeSet::new(),
            status: RowStatus::Pristine,
            is_valid: false,
            errors: BTreeMap::new(),
            warnings: BTreeMap::new(),
            input_errors: BTreeMap::new(),
        }
    }

    pub fn is_touched(&self, field: MetadataField) -> bool {
        self.touched.contains(&field)
    }

    pub fn error(&self, field: MetadataField) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn warning(&self, field: MetadataField) -> Option<&WarningMessage> {
        self.warnings.get(&field)
    }

    pub(crate) fn touch(&mut self, field: MetadataField) {
        self.touched.insert(field);
        self.status = RowStatus::Touched;
    }

    pub(crate) fn record_input_error(&mut self, field: MetadataField, error: Option<FieldError>) {
        match error {
            Some(error) => {
                self.input_errors.insert(field, error);
            }
            None => {
                self.input_errors.remove(&field);
            }
        }
    }

    pub(crate) fn record_warning(&mut self, field: MetadataField, warning: Option<WarningMessage>) {
        match warning {
            Some(warning) => {
                self.warnings.insert(field, warning);
            }
            None => {
                self.warnings.remove(&field);
            }
        }
    }

    /// Recompute errors. Touched rows settle in `Valid` or `Invalid`;
    /// pristine rows keep their status but still report validity.
    pub(crate) fn revalidate(&mut self, ctx: &ValidationContext<'_>) {
        let pristine = self.status == RowStatus::Pristine;
        if !pristine {
            self.status = RowStatus::Validating;
        }
        let mut errors = validate_metadata(&ctx.schema, &self.values, ctx.today());
        for (field, error) in &self.input_errors {
            errors.insert(*field, error.clone());
        }
        self.is_valid = errors.is_empty();
        self.errors = errors;
        if !pristine {
            self.status = if self.is_valid {
                RowStatus::Valid
            } else {
                RowStatus::Invalid
            };
        }
    }
}
