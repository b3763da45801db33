//! Spreadsheet side of the chart engine.
//!
//! This module covers everything the engine needs from the grid: cell
//! addresses and range resolution, the host traits it reads cells and
//! change notifications through, and an in-memory host.
//!
//! # Quick Start
//!
//! ```rust
//! use chartlink::sheet::RangeResolver;
//!
//! let cells = RangeResolver::new().resolve("(Sheet1!$A$1:$A$2,Sheet1!$C$1)")?;
//! let names: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
//! assert_eq!(names, ["Sheet1!$A$1", "Sheet1!$A$2", "Sheet1!$C$1"]);
//! # Ok::<(), chartlink::Error>(())
//! ```

// Submodule declarations
pub mod grid;
pub mod reference;
pub mod traits;
pub mod types;

// Re-exports
pub use grid::Grid;
pub use reference::{AddressFlags, CellArea, CellCoordinate, RangeResolver, resolve};
pub use traits::{CellSource, ChangeFeed, ChangeListener, SelectionTarget, SubscriptionId};
pub use types::CellValue;
