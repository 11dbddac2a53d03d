//! Metadata fields and the columns that carry them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Suffix the import template appends to optional column headers.
pub const OPTIONAL_SUFFIX: &str = " - Optional";

/// The kind of value a field holds once converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Date,
    Bool,
    Location,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Date => "date",
            ValueKind::Bool => "boolean",
            ValueKind::Location => "location",
        }
    }
}

/// A known sample metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetadataField {
    PrivateId,
    NewPrivateId,
    PublicId,
    CollectionDate,
    CollectionLocation,
    SequencingDate,
    KeepPrivate,
}

impl MetadataField {
    pub const ALL: [MetadataField; 7] = [
        MetadataField::PrivateId,
        MetadataField::NewPrivateId,
        MetadataField::PublicId,
        MetadataField::CollectionDate,
        MetadataField::CollectionLocation,
        MetadataField::SequencingDate,
        MetadataField::KeepPrivate,
    ];

    /// Header used for this field in the import template.
    pub fn header(self) -> &'static str {
        match self {
            MetadataField::PrivateId => "Private ID",
            MetadataField::NewPrivateId => "New Private ID",
            MetadataField::PublicId => "GISAID ID (Public ID)",
            MetadataField::CollectionDate => "Collection Date",
            MetadataField::CollectionLocation => "Collection Location",
            MetadataField::SequencingDate => "Sequencing Date",
            MetadataField::KeepPrivate => "Sample is Private",
        }
    }

    /// camelCase key, also accepted as a header.
    pub fn key(self) -> &'static str {
        match self {
            MetadataField::PrivateId => "privateId",
            MetadataField::NewPrivateId => "newPrivateID",
            MetadataField::PublicId => "publicId",
            MetadataField::CollectionDate => "collectionDate",
            MetadataField::CollectionLocation => "collectionLocation",
            MetadataField::SequencingDate => "sequencingDate",
            MetadataField::KeepPrivate => "keepPrivate",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            MetadataField::PrivateId | MetadataField::NewPrivateId | MetadataField::PublicId => {
                ValueKind::Text
            }
            MetadataField::CollectionDate | MetadataField::SequencingDate => ValueKind::Date,
            MetadataField::CollectionLocation => ValueKind::Location,
            MetadataField::KeepPrivate => ValueKind::Bool,
        }
    }

    /// Fields that name a sample rather than describe it.
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            MetadataField::PrivateId | MetadataField::NewPrivateId | MetadataField::PublicId
        )
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MetadataField {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        MetadataField::ALL
            .into_iter()
            .find(|field| {
                field.key().eq_ignore_ascii_case(trimmed)
                    || field.header().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ModelError::UnknownField(trimmed.to_string()))
    }
}

/// A column of an imported file: either a field we know or a passthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Column {
    Known(MetadataField),
    Unknown(String),
}

impl Column {
    pub fn field(&self) -> Option<MetadataField> {
        match self {
            Column::Known(field) => Some(*field),
            Column::Unknown(_) => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Column::Unknown(_))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Known(field) => f.write_str(field.header()),
            Column::Unknown(name) => f.write_str(name),
        }
    }
}
