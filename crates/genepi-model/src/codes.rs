//! Stable error and warning taxonomy for imports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Problems that keep an import from being clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingField,
    OverMaxSamples,
    InvalidName,
    DuplicatePublicIds,
    DuplicatePrivateIds,
    Default,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 6] = [
        ErrorCode::MissingField,
        ErrorCode::OverMaxSamples,
        ErrorCode::InvalidName,
        ErrorCode::DuplicatePublicIds,
        ErrorCode::DuplicatePrivateIds,
        ErrorCode::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::OverMaxSamples => "OVER_MAX_SAMPLES",
            ErrorCode::InvalidName => "INVALID_NAME",
            ErrorCode::DuplicatePublicIds => "DUPLICATE_PUBLIC_IDS",
            ErrorCode::DuplicatePrivateIds => "DUPLICATE_PRIVATE_IDS",
            ErrorCode::Default => "DEFAULT",
        }
    }

    /// Headline shown above the offending values.
    pub fn headline(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "Import file is missing required columns",
            ErrorCode::OverMaxSamples => "Import file has too many samples",
            ErrorCode::InvalidName => "Some sample IDs contain invalid characters",
            ErrorCode::DuplicatePublicIds => "Public IDs must be unique",
            ErrorCode::DuplicatePrivateIds => "Private IDs must be unique",
            ErrorCode::Default => "Some rows could not be imported",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-blocking notices about imported values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    AutoCorrect,
    BadFormatData,
    MissingData,
    /// Flag only; never keyed by identifier.
    UnknownDataFields,
}

impl WarningCode {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningCode::AutoCorrect => "AUTO_CORRECT",
            WarningCode::BadFormatData => "BAD_FORMAT_DATA",
            WarningCode::MissingData => "MISSING_DATA",
            WarningCode::UnknownDataFields => "UNKNOWN_DATA_FIELDS",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            WarningCode::AutoCorrect => "Some values were corrected automatically",
            WarningCode::BadFormatData => "Some values were reformatted to match our records",
            WarningCode::MissingData => "Some rows are missing required data and were skipped",
            WarningCode::UnknownDataFields => "Unrecognized columns were kept but not imported",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
