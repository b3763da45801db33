//! Extraction settings.

use serde::{Deserialize, Serialize};

use crate::charts::types::DisplayBlanks;

/// Default per-reference cell limit (one full worksheet column).
pub const DEFAULT_MAX_CELLS: usize = 1_048_576;

/// Settings shared by extraction and live binding.
///
/// # Example
///
/// ```rust
/// use chartlink::charts::{DisplayBlanks, ExtractConfig};
///
/// let config = ExtractConfig::default()
///     .with_display_blanks(DisplayBlanks::Zero)
///     .with_max_cells(10_000);
/// assert!(config.live_updates);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// How blank value cells are plotted
    pub display_blanks: DisplayBlanks,
    /// Separator between the areas of a union reference
    pub union_delimiter: char,
    /// Maximum number of cells a single reference may cover
    pub max_cells: usize,
    /// Register extracted series for live cell updates
    pub live_updates: bool,
}

impl ExtractConfig {
    /// Set the blank-cell policy.
    #[inline]
    pub fn with_display_blanks(mut self, display_blanks: DisplayBlanks) -> Self {
        self.display_blanks = display_blanks;
        self
    }

    /// Set the union delimiter.
    #[inline]
    pub fn with_union_delimiter(mut self, delimiter: char) -> Self {
        self.union_delimiter = delimiter;
        self
    }

    /// Set the per-reference cell limit.
    #[inline]
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Enable or disable live updates.
    #[inline]
    pub fn with_live_updates(mut self, live_updates: bool) -> Self {
        self.live_updates = live_updates;
        self
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            display_blanks: DisplayBlanks::Gap,
            union_delimiter: ',',
            max_cells: DEFAULT_MAX_CELLS,
            live_updates: true,
        }
    }
}
