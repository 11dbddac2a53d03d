//! Editable metadata rows with "apply to all".

use std::collections::BTreeMap;

use genepi_model::{FieldValue, Metadata, MetadataField};
use genepi_validate::{FieldError, ValidationContext, convert_cell};
use tracing::debug;

use crate::error::{FormError, Result};
use crate::state::RowFormState;

/// Receives a row's metadata every time the form changes it.
pub trait MetadataHandler {
    fn handle_metadata(&mut self, identifier: &str, metadata: &Metadata);
}

impl<F> MetadataHandler for F
where
    F: FnMut(&str, &Metadata),
{
    fn handle_metadata(&mut self, identifier: &str, metadata: &Metadata) {
        self(identifier, metadata);
    }
}

/// Final values of a form plus whether every row validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOutput {
    pub metadata: BTreeMap<String, Metadata>,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RowForm {
    rows: BTreeMap<String, RowFormState>,
    /// Display order of rows.
    order: Vec<String>,
}

impl RowForm {
    /// Build rows for `display_ids`. Freshly parsed values override prior
    /// ones and count as touched.
    pub fn seed<I>(
        ctx: &ValidationContext<'_>,
        display_ids: I,
        parsed: &BTreeMap<String, Metadata>,
        prior: &BTreeMap<String, Metadata>,
    ) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut form = Self::default();
        for id in display_ids {
            if form.rows.contains_key(&id) {
                continue;
            }
            let mut values = prior.get(&id).cloned().unwrap_or_default();
            if let Some(slot) = values.text_slot_mut(ctx.schema.identifier)
                && slot.is_unset()
            {
                *slot = FieldValue::Set(id.clone());
            }
            let mut state = RowFormState::new(values);
            if let Some(imported) = parsed.get(&id) {
                state.values.merge_from(imported);
                for field in imported.populated_fields() {
                    state.touch(field);
                }
            }
            state.revalidate(ctx);
            form.rows.insert(id.clone(), state);
            form.order.push(id);
        }
        debug!(rows = form.order.len(), "seeded row form");
        form
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn row(&self, identifier: &str) -> Option<&RowFormState> {
        self.rows.get(identifier)
    }

    /// Rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &RowFormState)> {
        self.order
            .iter()
            .filter_map(|id| self.rows.get(id).map(|state| (id.as_str(), state)))
    }

    /// Handle a user typing `raw` into one cell.
    pub fn set_field(
        &mut self,
        ctx: &ValidationContext<'_>,
        identifier: &str,
        field: MetadataField,
        raw: &str,
        handler: &mut impl MetadataHandler,
    ) -> Result<&RowFormState> {
        ensure_in_workflow(ctx, field)?;
        let state = self
            .rows
            .get_mut(identifier)
            .ok_or_else(|| FormError::UnknownRow(identifier.to_string()))?;
        let conversion = convert_cell(ctx, field, raw);
        state.values.set(field, conversion.value)?;
        state.record_input_error(field, conversion.error);
        state.record_warning(field, conversion.warning);
        state.touch(field);
        state.revalidate(ctx);
        handler.handle_metadata(identifier, &state.values);
        Ok(state)
    }

    /// Copy `field` from `source` to every other displayed row.
    ///
    /// All checks run before any row changes, and no row can fail once they
    /// pass. Returns the identifiers that were updated.
    pub fn apply_to_all(
        &mut self,
        ctx: &ValidationContext<'_>,
        source: &str,
        field: MetadataField,
        handler: &mut impl MetadataHandler,
    ) -> Result<Vec<String>> {
        ensure_in_workflow(ctx, field)?;
        if field.is_identifier() {
            return Err(FormError::NotBulkEditable(field));
        }
        let source_state = self
            .rows
            .get(source)
            .ok_or_else(|| FormError::UnknownRow(source.to_string()))?;
        let value = source_state.values.get(field);
        let input_error: Option<FieldError> = source_state.input_errors.get(&field).cloned();
        let warning = source_state.warning(field).cloned();

        let mut updated = Vec::new();
        for id in &self.order {
            if id == source {
                continue;
            }
            let Some(state) = self.rows.get_mut(id) else {
                continue;
            };
            state.values.set(field, value.clone())?;
            state.record_input_error(field, input_error.clone());
            state.record_warning(field, warning.clone());
            state.touch(field);
            state.revalidate(ctx);
            handler.handle_metadata(id, &state.values);
            updated.push(id.clone());
        }
        debug!(%field, rows = updated.len(), "applied value to all rows");
        Ok(updated)
    }

    /// AND of every row's validity.
    pub fn is_valid(&self) -> bool {
        self.rows.values().all(|state| state.is_valid)
    }

    pub fn invalid_rows(&self) -> Vec<&str> {
        self.rows()
            .filter(|(_, state)| !state.is_valid)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn values(&self) -> BTreeMap<String, Metadata> {
        self.rows
            .iter()
            .map(|(id, state)| (id.clone(), state.values.clone()))
            .collect()
    }

    pub fn output(&self) -> FormOutput {
        FormOutput {
            metadata: self.values(),
            is_valid: self.is_valid(),
        }
    }

    pub fn status_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for state in self.rows.values() {
            *counts.entry(state.status.as_str()).or_default() += 1;
        }
        counts
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.order.clear();
    }
}

fn ensure_in_workflow(ctx: &ValidationContext<'_>, field: MetadataField) -> Result<()> {
    if ctx.schema.contains(field) {
        Ok(())
    } else {
        Err(FormError::FieldNotInWorkflow(field))
    }
}
