//! Live connection between extracted series and the host sheet.
//!
//! - [`LiveBindingRegistry`] keeps series in sync with cell edits.
//! - [`SelectionBridge`] turns point selections into range selections.
//! - [`BoundChart`] ties both to the series of one chart definition.

pub mod chart;
pub mod registry;
pub mod selection;

pub use chart::BoundChart;
pub use registry::{BindingState, BoundRange, LiveBindingRegistry, bound_ranges};
pub use selection::SelectionBridge;

#[cfg(test)]
mod tests;
