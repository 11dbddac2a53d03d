//! Set comparison between parsed identifiers and those the caller expects.

use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// In the file but not known to the caller.
    pub extraneous: Vec<String>,
    /// Known to the caller but not in the file.
    pub absent: Vec<String>,
    /// In both.
    pub matched: Vec<String>,
}

impl Reconciliation {
    /// Nothing in the file matched what the caller expected.
    pub fn is_completely_unused(&self) -> bool {
        self.matched.is_empty()
    }
}

pub fn reconcile(parsed: &BTreeSet<String>, known: &BTreeSet<String>) -> Reconciliation {
    Reconciliation {
        extraneous: parsed.difference(known).cloned().collect(),
        absent: known.difference(parsed).cloned().collect(),
        matched: parsed.intersection(known).cloned().collect(),
    }
}
