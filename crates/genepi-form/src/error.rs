use genepi_model::{MetadataField, ModelError};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("no row for sample {0}")]
    UnknownRow(String),
    #[error("{0} cannot be applied to every row")]
    NotBulkEditable(MetadataField),
    #[error("{0} is not part of this workflow")]
    FieldNotInWorkflow(MetadataField),
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, FormError>;
