//! Traits the spreadsheet host implements for the chart engine.
//!
//! The engine never owns the grid. It reads cells through [`CellSource`],
//! listens for edits through [`ChangeFeed`], and asks the host to highlight
//! ranges through [`SelectionTarget`]. All calls happen on the host's single
//! event-processing thread.

use super::reference::CellCoordinate;

/// Read-only view of the cell grid.
///
/// Coordinates passed in by the engine are always absolute (sheet-qualified).
pub trait CellSource {
    /// Numeric value of a cell, `None` when empty or non-numeric.
    fn cell_value(&self, cell: &CellCoordinate) -> Option<f64>;

    /// Display text of a cell, `None` when empty.
    fn cell_text(&self, cell: &CellCoordinate) -> Option<String>;

    /// Name of the sheet that unqualified addresses refer to.
    fn active_sheet_name(&self) -> String;
}

/// Listener for cell edits.
///
/// The host passes itself as the [`CellSource`] so listeners can read the new
/// values, followed by the changed cells in the order they were edited. Cells
/// may be reported without a sheet; they then refer to the active sheet.
pub type ChangeListener = Box<dyn FnMut(&dyn CellSource, &[CellCoordinate])>;

/// Handle returned by [`ChangeFeed::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Source of cell-change notifications.
pub trait ChangeFeed {
    /// Register a listener; it stays registered until unsubscribed.
    fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId;

    /// Remove a listener. Returns false if `id` was not registered.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Receiver of range-selection commands.
pub trait SelectionTarget {
    /// Select the cells named by `reference` in the spreadsheet view.
    fn set_selection(&mut self, reference: &str);
}
