//! Library side of the `genepi-import` command.

pub mod check;
pub mod logging;
