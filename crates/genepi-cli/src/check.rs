//! Check one import file the way the upload and edit screens would.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use genepi_form::ImportSession;
use genepi_ingest::read_import_file;
use genepi_model::{
    Location, LocationVocabulary, MetadataField, StringToLocationFinder, WarningMessages, Workflow,
};
use genepi_validate::{ImportOptions, ImportSummary, ValidationContext};
use serde::Serialize;
use tracing::{debug, info_span, trace};

use crate::logging::redact_value;

/// Inputs for [`run_check`].
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub file: PathBuf,
    pub workflow: Workflow,
    pub known: BTreeSet<String>,
    pub identifier: Option<MetadataField>,
    pub max_samples: usize,
    /// Overrides the local date used to reject future dates.
    pub today: Option<NaiveDate>,
}

impl CheckRequest {
    pub fn options(&self) -> ImportOptions {
        let mut options =
            ImportOptions::for_workflow(self.workflow).with_max_samples(self.max_samples);
        if let Some(field) = self.identifier {
            options = options.with_identifier(field);
        }
        if let Some(today) = self.today {
            options = options.with_today(today);
        }
        options
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidRow {
    pub identifier: String,
    /// Column header to message.
    pub errors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormReport {
    pub rows: usize,
    pub is_valid: bool,
    pub status_counts: BTreeMap<&'static str, usize>,
    pub invalid_rows: Vec<InvalidRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub workflow: Workflow,
    pub summary: ImportSummary,
    pub form: FormReport,
}

impl CheckReport {
    /// Whether the command should exit unsuccessfully.
    pub fn has_failures(&self) -> bool {
        !self.summary.is_clean() || !self.form.is_valid
    }
}

/// Identifiers from an optional file (one per line, `#` comments) plus any
/// given directly.
pub fn load_known_ids(file: Option<&Path>, extra: &[String]) -> Result<BTreeSet<String>> {
    let mut known = BTreeSet::new();
    if let Some(path) = file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read known identifiers from {}", path.display()))?;
        known.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(ToString::to_string),
        );
    }
    known.extend(
        extra
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(ToString::to_string),
    );
    Ok(known)
}

/// Location vocabulary from a JSON array of locations. No path gives an
/// empty vocabulary, so every location is reported as unresolved.
pub fn load_vocabulary(path: Option<&Path>) -> Result<LocationVocabulary> {
    let Some(path) = path else {
        return Ok(LocationVocabulary::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("read locations from {}", path.display()))?;
    let vocabulary: LocationVocabulary = serde_json::from_str(&text)
        .with_context(|| format!("parse locations in {}", path.display()))?;
    debug!(locations = vocabulary.len(), "loaded location vocabulary");
    Ok(vocabulary)
}

pub fn run_check(request: &CheckRequest, vocabulary: &LocationVocabulary) -> Result<CheckReport> {
    let span = info_span!("check", workflow = %request.workflow);
    let _guard = span.enter();
    let file = read_import_file(&request.file)?;
    let ctx = ValidationContext::new(request.options(), vocabulary);
    let mut session = ImportSession::new(ctx, request.known.clone());
    let outcome = session.select_file(&file);
    trace_corrections(&outcome.result.warning_messages);
    let summary = outcome.summary.clone();
    let form = session.form();

    let invalid_rows = form
        .rows()
        .filter(|(_, state)| !state.is_valid)
        .map(|(id, state)| {
            debug!(sample = redact_value(id), status = ?state.status, "row is invalid");
            InvalidRow {
                identifier: id.to_string(),
                errors: state
                    .errors
                    .iter()
                    .map(|(field, error)| (field.header().to_string(), error.to_string()))
                    .collect(),
            }
        })
        .collect();

    Ok(CheckReport {
        workflow: request.workflow,
        summary,
        form: FormReport {
            rows: form.len(),
            is_valid: form.is_valid(),
            status_counts: form.status_counts(),
            invalid_rows,
        },
    })
}

/// One trace event per changed or unusable cell.
fn trace_corrections(messages: &WarningMessages) {
    for (code, samples) in messages {
        for (sample, warnings) in samples {
            for warning in warnings {
                trace!(
                    code = code.as_str(),
                    sample = redact_value(sample),
                    field = %warning.field,
                    original = redact_value(&warning.original_value),
                    updated = redact_value(&warning.updated_value),
                    "cell value corrected"
                );
            }
        }
    }
}

/// Header line of the import template, tab separated.
pub fn template_line(workflow: Workflow, identifier: Option<MetadataField>) -> String {
    let mut options = ImportOptions::for_workflow(workflow);
    if let Some(field) = identifier {
        options = options.with_identifier(field);
    }
    options.schema().template_headers().join("\t")
}

/// Resolve each query; `None` where nothing in the vocabulary matches.
pub fn resolve_locations<'q>(
    vocabulary: &LocationVocabulary,
    queries: &'q [String],
) -> Vec<(&'q str, Option<Location>)> {
    queries
        .iter()
        .map(|query| (query.as_str(), vocabulary.find(query.trim())))
        .collect()
}
