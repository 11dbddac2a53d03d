//! Validation, reconciliation and aggregation for sample metadata imports.

pub mod context;
pub mod import;
pub mod reconcile;
pub mod rules;
pub mod summary;

use std::collections::BTreeSet;

use genepi_model::ParseResult;

pub use context::{DEFAULT_MAX_SAMPLES, EXAMPLE_IDENTIFIERS, ImportOptions, ValidationContext};
pub use import::import_file;
pub use reconcile::{Reconciliation, reconcile};
pub use rules::{
    Conversion, DELETE_KEYWORD, FieldError, MAX_NAME_LENGTH, convert_cell, is_delete_keyword,
    parse_bool_token, validate_date, validate_field, validate_metadata, validate_name,
};
pub use summary::{ErrorGroup, ImportSummary, WarningDetail, WarningGroup, summarize};

/// Everything produced from one selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub result: ParseResult,
    pub reconciliation: Reconciliation,
    pub summary: ImportSummary,
}

/// Import a file and compare its identifiers with `known`.
pub fn run_import(
    ctx: &ValidationContext<'_>,
    filename: &str,
    bytes: &[u8],
    known: &BTreeSet<String>,
) -> ImportOutcome {
    let result = import_file(ctx, filename, bytes);
    let reconciliation = reconcile(&result.identifiers(), known);
    tracing::debug!(
        extraneous = reconciliation.extraneous.len(),
        absent = reconciliation.absent.len(),
        "reconciled identifiers"
    );
    let summary = summarize(&result, &reconciliation);
    ImportOutcome {
        result,
        reconciliation,
        summary,
    }
}
