//! Options and collaborators shared by every validation step.

use std::fmt;

use chrono::NaiveDate;
use genepi_model::{MetadataField, Schema, StringToLocationFinder, Workflow};

/// Row limit for a single import.
pub const DEFAULT_MAX_SAMPLES: usize = 500;

/// Identifiers of the sample rows shipped in the import template.
pub const EXAMPLE_IDENTIFIERS: &[&str] = &["Example Sample A", "Example Sample B"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub workflow: Workflow,
    /// Key rows by this column instead of the workflow default.
    pub identifier: Option<MetadataField>,
    pub max_samples: usize,
    pub example_identifiers: Vec<String>,
    /// Dates after this day are rejected.
    pub today: NaiveDate,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            workflow: Workflow::Upload,
            identifier: None,
            max_samples: DEFAULT_MAX_SAMPLES,
            example_identifiers: EXAMPLE_IDENTIFIERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            today: chrono::Local::now().date_naive(),
        }
    }
}

impl ImportOptions {
    pub fn for_workflow(workflow: Workflow) -> Self {
        Self {
            workflow,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[must_use]
    pub fn with_identifier(mut self, field: MetadataField) -> Self {
        self.identifier = Some(field);
        self
    }

    #[must_use]
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn schema(&self) -> Schema {
        let schema = Schema::for_workflow(self.workflow);
        match self.identifier {
            Some(field) => schema.with_identifier(field),
            None => schema,
        }
    }

    pub fn is_example_identifier(&self, identifier: &str) -> bool {
        self.example_identifiers
            .iter()
            .any(|example| example.eq_ignore_ascii_case(identifier))
    }
}

pub struct ValidationContext<'a> {
    pub schema: Schema,
    pub options: ImportOptions,
    pub finder: &'a dyn StringToLocationFinder,
}

impl<'a> ValidationContext<'a> {
    pub fn new(options: ImportOptions, finder: &'a dyn StringToLocationFinder) -> Self {
        Self {
            schema: options.schema(),
            options,
            finder,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.options.today
    }
}

impl fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("schema", &self.schema)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
