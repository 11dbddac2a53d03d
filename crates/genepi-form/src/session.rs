//! One import session: the latest selected file and the form built from it.

use std::collections::BTreeSet;

use genepi_ingest::ImportFile;
use genepi_model::MetadataField;
use genepi_validate::{ImportOutcome, ValidationContext, run_import};
use tracing::info;

use crate::error::Result;
use crate::form::{FormOutput, MetadataHandler, RowForm};
use crate::state::RowFormState;

#[derive(Debug)]
pub struct ImportSession<'a> {
    ctx: ValidationContext<'a>,
    known: BTreeSet<String>,
    outcome: Option<ImportOutcome>,
    form: RowForm,
}

impl<'a> ImportSession<'a> {
    pub fn new(ctx: ValidationContext<'a>, known: BTreeSet<String>) -> Self {
        let mut session = Self {
            ctx,
            known,
            outcome: None,
            form: RowForm::default(),
        };
        session.reseed();
        session
    }

    pub fn context(&self) -> &ValidationContext<'a> {
        &self.ctx
    }

    pub fn outcome(&self) -> Option<&ImportOutcome> {
        self.outcome.as_ref()
    }

    pub fn form(&self) -> &RowForm {
        &self.form
    }

    /// Import `file`, replacing whatever the previous selection produced.
    /// Values already in the form survive unless the new file overrides them.
    pub fn select_file(&mut self, file: &ImportFile) -> &ImportOutcome {
        let outcome = run_import(&self.ctx, &file.filename, &file.bytes, &self.known);
        info!(
            filename = %file.filename,
            imported = outcome.summary.imported,
            errors = outcome.summary.error_count(),
            warnings = outcome.summary.warning_count(),
            "file selected"
        );
        let outcome = self.outcome.insert(outcome);
        let prior = self.form.values();
        let parsed = &outcome.result.data;
        let display: Vec<String> = if self.known.is_empty() {
            parsed.keys().cloned().collect()
        } else {
            self.known.iter().cloned().collect()
        };
        self.form = RowForm::seed(&self.ctx, display, parsed, &prior);
        outcome
    }

    pub fn set_field(
        &mut self,
        identifier: &str,
        field: MetadataField,
        raw: &str,
        handler: &mut impl MetadataHandler,
    ) -> Result<&RowFormState> {
        self.form
            .set_field(&self.ctx, identifier, field, raw, handler)
    }

    pub fn apply_to_all(
        &mut self,
        source: &str,
        field: MetadataField,
        handler: &mut impl MetadataHandler,
    ) -> Result<Vec<String>> {
        self.form.apply_to_all(&self.ctx, source, field, handler)
    }

    pub fn output(&self) -> FormOutput {
        self.form.output()
    }

    /// Drop the imported file and every edit.
    pub fn reset(&mut self) {
        self.outcome = None;
        self.reseed();
    }

    fn reseed(&mut self) {
        let empty = Default::default();
        self.form = RowForm::seed(&self.ctx, self.known.iter().cloned(), &empty, &empty);
    }
}
