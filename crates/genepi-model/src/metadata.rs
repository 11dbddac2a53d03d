//! Typed per-sample metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::MetadataField;
use crate::location::Location;

/// State of one metadata slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum FieldValue<T> {
    /// No value supplied; existing data is left as it is.
    Unset,
    Set(T),
    /// Explicitly cleared via the "Delete" keyword.
    Cleared,
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Unset
    }
}

impl<T> FieldValue<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldValue::Set(value) => Some(value),
            FieldValue::Unset | FieldValue::Cleared => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, FieldValue::Set(_))
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldValue<U> {
        match self {
            FieldValue::Unset => FieldValue::Unset,
            FieldValue::Set(value) => FieldValue::Set(f(value)),
            FieldValue::Cleared => FieldValue::Cleared,
        }
    }
}

impl<T> From<Option<T>> for FieldValue<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Unset, FieldValue::Set)
    }
}

/// A converted value of any field kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Bool(bool),
    Location(Location),
}

impl Value {
    /// Text shown to users for this value.
    pub fn display(&self) -> String {
        match self {
            Value::Text(text) => text.clone(),
            Value::Bool(flag) => flag.to_string(),
            Value::Location(location) => location.path(),
        }
    }
}

/// The canonical record for one sample after import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub private_id: FieldValue<String>,
    #[serde(default, rename = "newPrivateID")]
    pub new_private_id: FieldValue<String>,
    #[serde(default)]
    pub public_id: FieldValue<String>,
    #[serde(default)]
    pub collection_date: FieldValue<String>,
    #[serde(default)]
    pub collection_location: FieldValue<Location>,
    #[serde(default)]
    pub sequencing_date: FieldValue<String>,
    #[serde(default)]
    pub keep_private: FieldValue<bool>,
    /// Columns outside the template, passed through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unknown: BTreeMap<String, String>,
}

impl Metadata {
    pub fn get(&self, field: MetadataField) -> FieldValue<Value> {
        match field {
            MetadataField::PrivateId => self.private_id.clone().map(Value::Text),
            MetadataField::NewPrivateId => self.new_private_id.clone().map(Value::Text),
            MetadataField::PublicId => self.public_id.clone().map(Value::Text),
            MetadataField::CollectionDate => self.collection_date.clone().map(Value::Text),
            MetadataField::CollectionLocation => {
                self.collection_location.clone().map(Value::Location)
            }
            MetadataField::SequencingDate => self.sequencing_date.clone().map(Value::Text),
            MetadataField::KeepPrivate => self.keep_private.clone().map(Value::Bool),
        }
    }

    pub fn set(&mut self, field: MetadataField, value: FieldValue<Value>) -> Result<()> {
        match field {
            MetadataField::PrivateId => self.private_id = text_value(field, value)?,
            MetadataField::NewPrivateId => self.new_private_id = text_value(field, value)?,
            MetadataField::PublicId => self.public_id = text_value(field, value)?,
            MetadataField::CollectionDate => self.collection_date = text_value(field, value)?,
            MetadataField::SequencingDate => self.sequencing_date = text_value(field, value)?,
            MetadataField::CollectionLocation => {
                self.collection_location = expect_kind(field, value, |value| match value {
                    Value::Location(location) => Some(location),
                    _ => None,
                })?;
            }
            MetadataField::KeepPrivate => {
                self.keep_private = expect_kind(field, value, |value| match value {
                    Value::Bool(flag) => Some(flag),
                    _ => None,
                })?;
            }
        }
        Ok(())
    }

    /// The slot behind a text field; `None` for location and bool fields.
    pub fn text_slot_mut(&mut self, field: MetadataField) -> Option<&mut FieldValue<String>> {
        match field {
            MetadataField::PrivateId => Some(&mut self.private_id),
            MetadataField::NewPrivateId => Some(&mut self.new_private_id),
            MetadataField::PublicId => Some(&mut self.public_id),
            MetadataField::CollectionDate => Some(&mut self.collection_date),
            MetadataField::SequencingDate => Some(&mut self.sequencing_date),
            MetadataField::CollectionLocation | MetadataField::KeepPrivate => None,
        }
    }

    /// Overlay every slot of `other` that is not `Unset`.
    pub fn merge_from(&mut self, other: &Metadata) {
        overlay(&mut self.private_id, &other.private_id);
        overlay(&mut self.new_private_id, &other.new_private_id);
        overlay(&mut self.public_id, &other.public_id);
        overlay(&mut self.collection_date, &other.collection_date);
        overlay(&mut self.collection_location, &other.collection_location);
        overlay(&mut self.sequencing_date, &other.sequencing_date);
        overlay(&mut self.keep_private, &other.keep_private);
        for (name, value) in &other.unknown {
            self.unknown.insert(name.clone(), value.clone());
        }
    }

    /// Fields holding anything other than `Unset`.
    pub fn populated_fields(&self) -> Vec<MetadataField> {
        MetadataField::ALL
            .into_iter()
            .filter(|field| !self.get(*field).is_unset())
            .collect()
    }
}

fn overlay<T: Clone>(slot: &mut FieldValue<T>, other: &FieldValue<T>) {
    if !other.is_unset() {
        slot.clone_from(other);
    }
}

fn text_value(field: MetadataField, value: FieldValue<Value>) -> Result<FieldValue<String>> {
    expect_kind(field, value, |value| match value {
        Value::Text(text) => Some(text),
        _ => None,
    })
}

fn expect_kind<T>(
    field: MetadataField,
    value: FieldValue<Value>,
    extract: impl FnOnce(Value) -> Option<T>,
) -> Result<FieldValue<T>> {
    match value {
        FieldValue::Unset => Ok(FieldValue::Unset),
        FieldValue::Cleared => Ok(FieldValue::Cleared),
        FieldValue::Set(value) => extract(value)
            .map(FieldValue::Set)
            .ok_or(ModelError::ValueKindMismatch {
                field,
                expected: field.kind().as_str(),
            }),
    }
}
