use thiserror::Error;

use crate::field::MetadataField;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("field {field} expects a {expected} value")]
    ValueKindMismatch {
        field: MetadataField,
        expected: &'static str,
    },
    #[error("unknown metadata field: {0}")]
    UnknownField(String),
    #[error("unknown workflow: {0}")]
    UnknownWorkflow(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
