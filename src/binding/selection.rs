//! Chart-to-sheet selection.

use std::cell::RefCell;
use std::rc::Rc;

use super::registry::LiveBindingRegistry;
use crate::charts::series::SeriesId;
use crate::common::error::{Error, Result};
use crate::sheet::traits::SelectionTarget;

/// Forwards point selections in a chart to the host sheet.
///
/// Selecting any point highlights the whole bound range of its series, not
/// the single cell behind the point.
#[derive(Clone)]
pub struct SelectionBridge {
    registry: Rc<RefCell<LiveBindingRegistry>>,
}

impl SelectionBridge {
    /// Create a bridge over a shared registry.
    #[inline]
    pub fn new(registry: Rc<RefCell<LiveBindingRegistry>>) -> Self {
        Self { registry }
    }

    /// Select the bound range of `series` in `target`.
    ///
    /// Fails with [`Error::UnknownSeries`] when the series has no binding
    /// and with [`Error::RegistryBusy`] when called while the registry is
    /// mutably borrowed; nothing is sent to the host in either case.
    pub fn on_point_selected(&self, series: SeriesId, target: &mut dyn SelectionTarget) -> Result<()> {
        let Ok(registry) = self.registry.try_borrow() else {
            log::warn!("series {series}: registry busy, selection dropped");
            return Err(Error::RegistryBusy(series));
        };
        let reference = registry
            .selection_reference(series)
            .ok_or(Error::UnknownSeries(series))?;
        drop(registry);
        log::debug!("series {series}: selecting {reference}");
        target.set_selection(&reference);
        Ok(())
    }
}
