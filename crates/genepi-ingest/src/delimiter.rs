//! Delimiter selection from file names and content.

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }

    /// Delimiter implied by the file extension, if any.
    pub fn from_filename(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("tsv")
            || extension.eq_ignore_ascii_case("tab")
            || extension.eq_ignore_ascii_case("txt")
        {
            Some(Delimiter::Tab)
        } else if extension.eq_ignore_ascii_case("csv") {
            Some(Delimiter::Comma)
        } else {
            None
        }
    }

    /// Guess from the first non-comment line.
    pub fn sniff(text: &str) -> Self {
        let header = text
            .lines()
            .find(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .unwrap_or_default();
        if header.contains('\t') {
            Delimiter::Tab
        } else {
            Delimiter::Comma
        }
    }

    pub fn detect(filename: &str, text: &str) -> Self {
        Self::from_filename(filename).unwrap_or_else(|| Self::sniff(text))
    }
}
