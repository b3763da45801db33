//! Chartlink - live-bound chart series over spreadsheet cells
//!
//! This library turns chart definitions from an office document into
//! renderable series by reading the spreadsheet cells they reference, and
//! keeps those series in sync while the user edits the sheet.
//!
//! # Features
//!
//! - **Reference resolution**: A1-style references with sheet names, absolute
//!   markers and multi-area unions, flattened in row-major order
//! - **Series extraction**: Per chart type policies for line, bar/column,
//!   pie/doughnut, radar, scatter, area and stock charts
//! - **Multi-level categories**: Leaf labels decoded from hierarchical
//!   category ranges
//! - **Live updates**: Edited cells are patched into the matching points
//!   without re-extracting the chart
//! - **Selection sync**: Selecting a point selects its source range
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use chartlink::binding::{BoundChart, LiveBindingRegistry};
//! use chartlink::charts::{ChartDefinition, ChartType, ExtractConfig, SeriesDefinition};
//! use chartlink::sheet::Grid;
//!
//! let mut grid = Grid::new("Sheet1");
//! grid.set("A1", "Q1")?;
//! grid.set("A2", "Q2")?;
//! grid.set("B1", 120.0)?;
//! grid.set("B2", 80.0)?;
//!
//! let registry = Rc::new(RefCell::new(LiveBindingRegistry::new()));
//! LiveBindingRegistry::subscribe(&registry, &mut grid);
//!
//! let definition = ChartDefinition::new(ChartType::Line).add_series(
//!     SeriesDefinition::new()
//!         .with_name("Revenue")
//!         .with_category_ref("$A$1:$A$2")
//!         .with_values_ref("$B$1:$B$2"),
//! );
//! let chart = BoundChart::build(&definition, &grid, &registry, &ExtractConfig::default());
//!
//! grid.edit("B2", 95.0)?;
//! let series = chart.series()[0].borrow();
//! assert_eq!(series.name.as_deref(), Some("Revenue"));
//! assert_eq!(series.values(), vec![Some(120.0), Some(95.0)]);
//! # Ok::<(), chartlink::Error>(())
//! ```

/// Live binding between series and the host sheet
///
/// Keeps extracted series in sync with cell edits and forwards point
/// selections back to the sheet.
pub mod binding;

/// Chart definitions, series data and extraction
pub mod charts;

/// Shared error type
pub mod common;

/// Cell references and the host grid interface
///
/// Also provides an in-memory [`sheet::Grid`] host.
pub mod sheet;

pub use common::{Error, Result};
