//! In-memory spreadsheet host.
//!
//! [`Grid`] implements every host trait the engine consumes. It is enough to
//! drive extraction, live binding, and selection without a real spreadsheet
//! application behind it.
//!
//! # Example
//!
//! ```rust
//! use chartlink::sheet::{CellSource, Grid, resolve};
//!
//! let mut grid = Grid::new("Sheet1");
//! grid.set("A1", 10.0)?;
//! grid.set("Sheet1!A2", "label")?;
//!
//! let cells = resolve("Sheet1!$A$1:$A$2")?;
//! assert_eq!(grid.cell_value(&cells[0]), Some(10.0));
//! assert_eq!(grid.cell_text(&cells[1]).as_deref(), Some("label"));
//! # Ok::<(), chartlink::Error>(())
//! ```

use std::collections::HashMap;

use super::reference::CellCoordinate;
use super::traits::{CellSource, ChangeFeed, ChangeListener, SelectionTarget, SubscriptionId};
use super::types::CellValue;
use crate::common::error::Result;

/// A sparse, multi-sheet cell grid with change notification.
pub struct Grid {
    active_sheet: String,
    cells: HashMap<CellCoordinate, CellValue>,
    listeners: Vec<(SubscriptionId, ChangeListener)>,
    next_subscription: u64,
    selection: Option<String>,
}

impl Grid {
    /// Create an empty grid whose active sheet is `active_sheet`.
    pub fn new(active_sheet: impl Into<String>) -> Self {
        Self {
            active_sheet: active_sheet.into(),
            cells: HashMap::new(),
            listeners: Vec::new(),
            next_subscription: 0,
            selection: None,
        }
    }

    /// Switch the active sheet.
    #[inline]
    pub fn set_active_sheet(&mut self, sheet: impl Into<String>) {
        self.active_sheet = sheet.into();
    }

    /// Store a value without notifying listeners (initial load).
    pub fn set(&mut self, address: &str, value: impl Into<CellValue>) -> Result<()> {
        let cell = CellCoordinate::parse(address)?;
        self.store(&cell, value.into());
        Ok(())
    }

    /// Store a value and notify listeners with the address as written.
    pub fn edit(&mut self, address: &str, value: impl Into<CellValue>) -> Result<()> {
        let cell = CellCoordinate::parse(address)?;
        self.store(&cell, value.into());
        self.notify(&[cell]);
        Ok(())
    }

    /// Store several values and notify listeners once, in edit order.
    pub fn edit_many(&mut self, edits: Vec<(&str, CellValue)>) -> Result<()> {
        let mut changed = Vec::with_capacity(edits.len());
        for (address, value) in edits {
            let cell = CellCoordinate::parse(address)?;
            self.store(&cell, value);
            changed.push(cell);
        }
        self.notify(&changed);
        Ok(())
    }

    /// Value stored at `cell`, with unqualified addresses on the active sheet.
    pub fn get(&self, cell: &CellCoordinate) -> Option<&CellValue> {
        self.cells.get(&cell.to_absolute(&self.active_sheet))
    }

    /// The reference most recently passed to [`SelectionTarget::set_selection`].
    #[inline]
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Number of registered listeners.
    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn store(&mut self, cell: &CellCoordinate, value: CellValue) {
        let key = cell.to_absolute(&self.active_sheet);
        if matches!(value, CellValue::Empty) {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, value);
        }
    }

    /// Deliver a change batch to every listener, synchronously.
    ///
    /// Listeners subscribed during delivery first hear the next batch.
    fn notify(&mut self, changed: &[CellCoordinate]) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in listeners.iter_mut() {
            listener(&*self, changed);
        }
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}

impl CellSource for Grid {
    fn cell_value(&self, cell: &CellCoordinate) -> Option<f64> {
        self.get(cell).and_then(CellValue::as_number)
    }

    fn cell_text(&self, cell: &CellCoordinate) -> Option<String> {
        self.get(cell).and_then(CellValue::as_text)
    }

    fn active_sheet_name(&self) -> String {
        self.active_sheet.clone()
    }
}

impl ChangeFeed for Grid {
    fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }
}

impl SelectionTarget for Grid {
    fn set_selection(&mut self, reference: &str) {
        self.selection = Some(reference.to_string());
    }
}
