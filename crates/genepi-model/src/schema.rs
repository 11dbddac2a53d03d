//! Per-workflow column vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::field::{MetadataField, OPTIONAL_SUFFIX};

/// Which import the file feeds: a fresh upload or edits to existing samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    #[default]
    Upload,
    Edit,
}

impl Workflow {
    pub fn as_str(self) -> &'static str {
        match self {
            Workflow::Upload => "upload",
            Workflow::Edit => "edit",
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Workflow {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "upload" => Ok(Workflow::Upload),
            "edit" => Ok(Workflow::Edit),
            other => Err(ModelError::UnknownWorkflow(other.to_string())),
        }
    }
}

/// One column of a workflow's template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub field: MetadataField,
    /// The file must contain this header.
    pub header_required: bool,
    /// Every row must carry a value for this column.
    pub value_required: bool,
}

impl ColumnSpec {
    const fn required(field: MetadataField) -> Self {
        Self {
            field,
            header_required: true,
            value_required: true,
        }
    }

    const fn optional(field: MetadataField) -> Self {
        Self {
            field,
            header_required: false,
            value_required: false,
        }
    }

    /// Header as written in the template, with the optional suffix.
    pub fn template_header(&self) -> String {
        if self.header_required {
            self.field.header().to_string()
        } else {
            format!("{}{}", self.field.header(), OPTIONAL_SUFFIX)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub workflow: Workflow,
    /// Column whose value keys each row.
    pub identifier: MetadataField,
    pub columns: Vec<ColumnSpec>,
}

impl Schema {
    pub fn for_workflow(workflow: Workflow) -> Self {
        match workflow {
            Workflow::Upload => Self::upload(),
            Workflow::Edit => Self::edit(),
        }
    }

    pub fn upload() -> Self {
        Self {
            workflow: Workflow::Upload,
            identifier: MetadataField::PrivateId,
            columns: vec![
                ColumnSpec::required(MetadataField::PrivateId),
                ColumnSpec::optional(MetadataField::PublicId),
                ColumnSpec::required(MetadataField::CollectionDate),
                ColumnSpec::required(MetadataField::CollectionLocation),
                ColumnSpec::optional(MetadataField::SequencingDate),
                // Blank means "not private", so only the header is mandatory.
                ColumnSpec {
                    field: MetadataField::KeepPrivate,
                    header_required: true,
                    value_required: false,
                },
            ],
        }
    }

    pub fn edit() -> Self {
        Self {
            workflow: Workflow::Edit,
            identifier: MetadataField::PrivateId,
            columns: vec![
                ColumnSpec::required(MetadataField::PrivateId),
                ColumnSpec::optional(MetadataField::NewPrivateId),
                ColumnSpec::optional(MetadataField::PublicId),
                ColumnSpec::optional(MetadataField::CollectionDate),
                ColumnSpec::optional(MetadataField::CollectionLocation),
                ColumnSpec::optional(MetadataField::SequencingDate),
                ColumnSpec::optional(MetadataField::KeepPrivate),
            ],
        }
    }

    /// Re-key rows by another column. The new identifier becomes required.
    #[must_use]
    pub fn with_identifier(mut self, field: MetadataField) -> Self {
        if !self.columns.iter().any(|column| column.field == field) {
            self.columns.push(ColumnSpec::optional(field));
        }
        for column in &mut self.columns {
            if column.field == field {
                column.header_required = true;
                column.value_required = true;
            } else if column.field == self.identifier && self.identifier != field {
                column.header_required = false;
                column.value_required = false;
            }
        }
        self.identifier = field;
        self
    }

    pub fn column(&self, field: MetadataField) -> Option<&ColumnSpec> {
        self.columns.iter().find(|column| column.field == field)
    }

    pub fn contains(&self, field: MetadataField) -> bool {
        self.column(field).is_some()
    }

    pub fn is_value_required(&self, field: MetadataField) -> bool {
        self.column(field).is_some_and(|column| column.value_required)
    }

    pub fn required_headers(&self) -> impl Iterator<Item = MetadataField> + '_ {
        self.columns
            .iter()
            .filter(|column| column.header_required)
            .map(|column| column.field)
    }

    pub fn template_headers(&self) -> Vec<String> {
        self.columns.iter().map(ColumnSpec::template_header).collect()
    }

    /// Whether the "Delete" keyword clears values in this workflow.
    pub fn allows_delete(&self, field: MetadataField) -> bool {
        self.workflow == Workflow::Edit && field != self.identifier
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::upload()
    }
}
