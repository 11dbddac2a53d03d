pub mod codes;
pub mod error;
pub mod field;
pub mod location;
pub mod metadata;
pub mod result;
pub mod schema;

pub use codes::{ErrorCode, WarningCode};
pub use error::{ModelError, Result};
pub use field::{Column, MetadataField, OPTIONAL_SUFFIX, ValueKind};
pub use location::{Location, LocationVocabulary, StringToLocationFinder};
pub use metadata::{FieldValue, Metadata, Value};
pub use result::{ErrorMessages, ParseResult, WarningMessage, WarningMessages};
pub use schema::{ColumnSpec, Schema, Workflow};
