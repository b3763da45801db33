//! Unified error types for chartlink.
//!
//! Every failure the engine can report is a variant of [`Error`]. None of
//! them is fatal to a chart: extraction and live updates contain failures at
//! the field or series boundary and log them instead of propagating.
use thiserror::Error;

use crate::charts::series::SeriesId;

/// Main error type for chartlink operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Reference text could not be parsed into cell areas
    #[error("Formula parse error in '{formula}': {reason}")]
    FormulaParse { formula: String, reason: String },

    /// Reference names more cells than the configured limit
    #[error("Reference '{formula}' spans {cells} cells (limit {limit})")]
    RangeTooLarge {
        formula: String,
        cells: u64,
        limit: usize,
    },

    /// Multi-level category block whose orientation cannot be determined
    #[error("Ambiguous category hierarchy: {levels} levels in a {width}x{height} block")]
    AmbiguousHierarchy {
        levels: usize,
        width: usize,
        height: usize,
    },

    /// A bound reference no longer resolves
    #[error("Stale reference '{formula}' for series {series}")]
    StaleReference { series: SeriesId, formula: String },

    /// Series id unknown to the binding registry
    #[error("Unknown series: {0}")]
    UnknownSeries(SeriesId),

    /// The binding registry is borrowed elsewhere (re-entrant call)
    #[error("Binding registry busy while handling series {0}")]
    RegistryBusy(SeriesId),
}

impl Error {
    /// Shorthand for a [`Error::FormulaParse`] value.
    pub(crate) fn parse(formula: &str, reason: impl Into<String>) -> Self {
        Error::FormulaParse {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for chartlink operations.
pub type Result<T> = std::result::Result<T, Error>;
