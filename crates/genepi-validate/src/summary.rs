//! Group import signals into the error/warning taxonomy shown to users.
//!
//! [`summarize`] is a pure function of its inputs: calling it twice on the
//! same result yields the same groups in the same order.

use genepi_model::{ErrorCode, ParseResult, WarningCode};
use serde::Serialize;

use crate::reconcile::Reconciliation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorGroup {
    pub code: ErrorCode,
    pub headline: &'static str,
    pub count: usize,
    pub values: Vec<String>,
}

/// One row of a warning's detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarningDetail {
    pub identifier: String,
    pub column: &'static str,
    pub original: String,
    pub corrected: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarningGroup {
    pub code: WarningCode,
    pub headline: &'static str,
    /// Number of samples affected.
    pub count: usize,
    pub details: Vec<WarningDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub filename: String,
    pub imported: usize,
    pub errors: Vec<ErrorGroup>,
    pub warnings: Vec<WarningGroup>,
    /// Set when the file had columns outside the template.
    pub unknown_fields: Option<Vec<String>>,
    pub extraneous: Vec<String>,
    pub absent: Vec<String>,
    pub completely_unused: bool,
}

impl ImportSummary {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether to tell the user the import succeeded.
    pub fn show_success_notice(&self) -> bool {
        self.is_clean() && !self.completely_unused
    }

    pub fn error_count(&self) -> usize {
        self.errors.iter().map(|group| group.count).sum()
    }

    pub fn warning_count(&self) -> usize {
        let flagged = usize::from(self.unknown_fields.is_some());
        self.warnings.iter().map(|group| group.count).sum::<usize>() + flagged
    }

    pub fn error(&self, code: ErrorCode) -> Option<&ErrorGroup> {
        self.errors.iter().find(|group| group.code == code)
    }

    pub fn warning(&self, code: WarningCode) -> Option<&WarningGroup> {
        self.warnings.iter().find(|group| group.code == code)
    }
}

pub fn summarize(result: &ParseResult, reconciliation: &Reconciliation) -> ImportSummary {
    let errors = result
        .error_messages
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(code, values)| ErrorGroup {
            code: *code,
            headline: code.headline(),
            count: values.len(),
            values: values.iter().cloned().collect(),
        })
        .collect();

    let warnings = result
        .warning_messages
        .iter()
        .filter(|(_, by_id)| !by_id.is_empty())
        .map(|(code, by_id)| WarningGroup {
            code: *code,
            headline: code.headline(),
            count: by_id.len(),
            details: by_id
                .iter()
                .flat_map(|(identifier, messages)| {
                    messages.iter().map(move |message| WarningDetail {
                        identifier: identifier.clone(),
                        column: message.field.header(),
                        original: message.original_value.clone(),
                        corrected: message.updated_value.clone(),
                    })
                })
                .collect(),
        })
        .collect();

    ImportSummary {
        filename: result.filename.clone(),
        imported: result.data.len(),
        errors,
        warnings,
        unknown_fields: result
            .has_unknown_fields
            .then(|| result.unknown_headers.clone()),
        extraneous: reconciliation.extraneous.clone(),
        absent: reconciliation.absent.clone(),
        completely_unused: reconciliation.is_completely_unused(),
    }
}
