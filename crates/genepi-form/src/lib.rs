//! Row-level editing of imported sample metadata.

pub mod error;
pub mod form;
pub mod session;
pub mod state;

pub use error::{FormError, Result};
pub use form::{FormOutput, MetadataHandler, RowForm};
pub use session::ImportSession;
pub use state::{RowFormState, RowStatus};
