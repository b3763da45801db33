//! Chart model and series extraction.
//!
//! A [`ChartDefinition`] is the normalized description of a chart: its type,
//! chart-level options, and one [`SeriesDefinition`] per series naming where
//! the series' name, categories, and values live. Extraction resolves those
//! references against a host grid and yields [`SeriesData`] for the renderer.
//!
//! # Example
//!
//! ```rust
//! use chartlink::charts::{ChartDefinition, ChartType, Grouping, SeriesDefinition, StackingMode};
//! use chartlink::charts::{ExtractConfig, SeriesId};
//! use chartlink::charts::extract::{ExtractContext, Extractor};
//! use chartlink::sheet::Grid;
//!
//! let mut grid = Grid::new("Sheet1");
//! grid.set("A1", "North")?;
//! grid.set("A2", "South")?;
//! grid.set("B1", 4.0)?;
//! grid.set("B2", 6.0)?;
//!
//! let chart = ChartDefinition::new(ChartType::Bar)
//!     .with_grouping(Grouping::Stacked)
//!     .add_series(
//!         SeriesDefinition::new()
//!             .with_category_ref("$A$1:$A$2")
//!             .with_values_ref("$B$1:$B$2"),
//!     );
//!
//! let ctx = ExtractContext::new(&grid, &ExtractConfig::default());
//! let data = Extractor::for_chart(&chart).extract(SeriesId::new(0), &chart.series[0], &ctx);
//! assert_eq!(data.stacking, StackingMode::Normal);
//! assert_eq!(data.categories, Some(vec!["North".to_string(), "South".to_string()]));
//! # Ok::<(), chartlink::Error>(())
//! ```

pub mod config;
pub mod definition;
pub mod extract;
pub mod multilevel;
pub mod series;
pub mod types;

pub use config::{DEFAULT_MAX_CELLS, ExtractConfig};
pub use definition::{
    CategorySource, ChartDefinition, DataSourceRef, OhlcSources, SeriesDefinition, TitleSource,
    ValueSource,
};
pub use series::{
    DonutGeometry, Ohlc, PointField, PointUpdate, SelectCallback, SeriesData, SeriesId,
    SeriesPoint, SharedSeries, UpdateCallback,
};
pub use types::{
    BarDirection, ChartType, DashStyle, DisplayBlanks, Grouping, MarkerStyle, StackingMode,
};
