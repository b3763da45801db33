//! Series extraction.
//!
//! Extraction turns a normalized [`SeriesDefinition`] into [`SeriesData`] by
//! resolving its references against the host grid. The work is split into
//! the steps every chart type shares (name, categories, values) and the
//! policies that differ per chart type, one [`Extractor`] variant each.
//!
//! Extraction never fails as a whole. A field whose reference cannot be
//! resolved degrades to absent and the failure is logged; a cell without a
//! usable number becomes an absent point value.
//!
//! # Example
//!
//! ```rust
//! use chartlink::charts::{ChartDefinition, ChartType, ExtractConfig, SeriesDefinition, SeriesId};
//! use chartlink::charts::extract::{ExtractContext, Extractor};
//! use chartlink::sheet::Grid;
//!
//! let mut grid = Grid::new("Sheet1");
//! for (row, value) in [10.0, 20.0, 30.0].into_iter().enumerate() {
//!     grid.set(&format!("B{}", row + 1), value)?;
//! }
//!
//! let chart = ChartDefinition::new(ChartType::Line)
//!     .add_series(SeriesDefinition::new().with_name("Sales").with_values_ref("$B$1:$B$3"));
//! let ctx = ExtractContext::new(&grid, &ExtractConfig::default());
//! let mut extractor = Extractor::for_chart(&chart);
//! let data = extractor.extract(SeriesId::new(0), &chart.series[0], &ctx);
//!
//! assert_eq!(data.name.as_deref(), Some("Sales"));
//! assert_eq!(data.values(), vec![Some(10.0), Some(20.0), Some(30.0)]);
//! # Ok::<(), chartlink::Error>(())
//! ```

mod area;
mod bar;
mod generic;
mod line;
mod pie;
mod radar;
mod scatter;
mod stock;

pub use area::AreaExtractor;
pub use bar::BarExtractor;
pub use generic::GenericExtractor;
pub use line::LineExtractor;
pub use pie::PieExtractor;
pub use radar::RadarExtractor;
pub use scatter::ScatterExtractor;
pub use stock::StockExtractor;

use crate::charts::config::ExtractConfig;
use crate::charts::definition::{
    CategorySource, ChartDefinition, SeriesDefinition, TitleSource, ValueSource,
};
use crate::charts::multilevel;
use crate::charts::series::{SeriesData, SeriesId, SeriesPoint};
use crate::charts::types::{ChartType, DisplayBlanks};
use crate::common::error::Result;
use crate::sheet::reference::{CellCoordinate, RangeResolver};
use crate::sheet::traits::CellSource;
use crate::sheet::types::format_number;

/// Everything extraction reads from besides the series definition.
pub struct ExtractContext<'a> {
    /// Host grid
    pub cells: &'a dyn CellSource,
    /// Sheet that unqualified references refer to
    pub home_sheet: String,
    /// Blank-cell policy
    pub display_blanks: DisplayBlanks,
    resolver: RangeResolver,
}

impl<'a> ExtractContext<'a> {
    /// Create a context; unqualified references resolve on the active sheet.
    pub fn new(cells: &'a dyn CellSource, config: &ExtractConfig) -> Self {
        Self {
            cells,
            home_sheet: cells.active_sheet_name(),
            display_blanks: config.display_blanks,
            resolver: RangeResolver::from_config(config),
        }
    }

    /// The resolver used for every reference of this extraction.
    #[inline]
    pub fn resolver(&self) -> &RangeResolver {
        &self.resolver
    }

    /// Resolve a reference into absolute coordinates.
    pub fn resolve(&self, formula: &str) -> Result<Vec<CellCoordinate>> {
        let coords = self.resolver.resolve(formula)?;
        Ok(coords
            .iter()
            .map(|c| c.to_absolute(&self.home_sheet))
            .collect())
    }

    /// Number stored at an absolute coordinate, after the blank-cell policy.
    #[inline]
    pub fn number_at(&self, cell: &CellCoordinate) -> Option<f64> {
        read_number(self.cells, cell, self.display_blanks)
    }

    /// Resolve the series name. Failures yield `None`.
    pub fn read_name(&self, id: SeriesId, source: Option<&TitleSource>) -> Option<String> {
        match source? {
            TitleSource::Literal(text) => Some(text.clone()),
            TitleSource::Reference(r) => match self.resolve(&r.formula) {
                Ok(coords) if coords.len() == 1 => self.cells.cell_text(&coords[0]),
                Ok(coords) => {
                    log::warn!(
                        "series {id}: name reference '{}' covers {} cells, expected one",
                        r.formula,
                        coords.len()
                    );
                    None
                },
                Err(err) => {
                    log::warn!("series {id}: dropping name: {err}");
                    None
                },
            },
        }
    }

    /// Resolve category labels. Failures and unsupported kinds yield `None`.
    pub fn read_categories(&self, id: SeriesId, source: Option<&CategorySource>) -> Option<Vec<String>> {
        let labels: Result<Vec<String>> = match source? {
            CategorySource::Literal(labels) => return Some(labels.clone()),
            CategorySource::Unsupported(kind) => {
                log::warn!("series {id}: unsupported category source '{kind}'");
                return None;
            },
            CategorySource::Text(r) => self
                .resolve(&r.formula)
                .map(|coords| coords.iter().map(|c| self.text_at(c)).collect()),
            CategorySource::Numeric(r) => self.resolve(&r.formula).map(|coords| {
                coords
                    .iter()
                    .map(|c| self.cells.cell_value(c).map(format_number).unwrap_or_default())
                    .collect()
            }),
            CategorySource::MultiLevel { source, leaf_count } => self
                .resolve(&source.formula)
                .and_then(|coords| multilevel::decode_leaves(&coords, *leaf_count))
                .map(|leaves| leaves.iter().map(|c| self.text_at(c)).collect()),
        };

        labels
            .map_err(|err| log::warn!("series {id}: dropping categories: {err}"))
            .ok()
    }

    /// Resolve a value source into per-point values. Failures yield `None`.
    pub fn read_values(&self, id: SeriesId, source: Option<&ValueSource>) -> Option<Vec<Option<f64>>> {
        match source? {
            ValueSource::Literal(values) => Some(values.clone()),
            ValueSource::Reference(r) => match self.resolve(&r.formula) {
                Ok(coords) => Some(coords.iter().map(|c| self.number_at(c)).collect()),
                Err(err) => {
                    log::warn!("series {id}: dropping values: {err}");
                    None
                },
            },
        }
    }

    fn text_at(&self, cell: &CellCoordinate) -> String {
        self.cells.cell_text(cell).unwrap_or_default()
    }
}

/// Read a cell as a plotted number.
///
/// Non-numeric text is always absent; a truly blank cell becomes zero only
/// under [`DisplayBlanks::Zero`].
pub(crate) fn read_number(
    cells: &dyn CellSource,
    cell: &CellCoordinate,
    blanks: DisplayBlanks,
) -> Option<f64> {
    match cells.cell_value(cell) {
        Some(value) => Some(value),
        None if blanks == DisplayBlanks::Zero => {
            let blank = cells.cell_text(cell).is_none_or(|t| t.is_empty());
            blank.then_some(0.0)
        },
        None => None,
    }
}

/// Chart-type specific extraction policy.
///
/// One extractor serves all series of one chart, in plot order; variants
/// that apply chart-level geometry once (doughnut) keep that state here.
#[derive(Debug, Clone)]
pub enum Extractor {
    /// Line and spline charts
    Line(LineExtractor),
    /// Bar and column charts
    Bar(BarExtractor),
    /// Pie and doughnut charts
    Pie(PieExtractor),
    /// Radar charts
    Radar(RadarExtractor),
    /// Scatter and bubble charts
    Scatter(ScatterExtractor),
    /// Area charts
    Area(AreaExtractor),
    /// Stock (open/high/low/close) charts
    Stock(StockExtractor),
    /// Everything else, extracted as a plain line-like series
    Generic(GenericExtractor),
}

impl Extractor {
    /// Pick the extractor for a chart definition.
    pub fn for_chart(chart: &ChartDefinition) -> Self {
        let kind = chart.chart_type;
        match kind {
            ChartType::Line | ChartType::Line3D => {
                Self::Line(LineExtractor::new(kind, chart.grouping))
            },
            ChartType::Bar | ChartType::Bar3D => {
                Self::Bar(BarExtractor::new(kind, chart.grouping, chart.bar_direction))
            },
            ChartType::Pie | ChartType::Pie3D | ChartType::Doughnut => Self::Pie(
                PieExtractor::new(kind, chart.hole_size, chart.first_slice_angle),
            ),
            ChartType::Radar => Self::Radar(RadarExtractor::new()),
            ChartType::Scatter | ChartType::Bubble => Self::Scatter(ScatterExtractor::new(kind)),
            ChartType::Area | ChartType::Area3D => {
                Self::Area(AreaExtractor::new(kind, chart.grouping))
            },
            ChartType::Stock => Self::Stock(StockExtractor::new()),
            ChartType::Surface | ChartType::Surface3D | ChartType::Unknown => {
                Self::Generic(GenericExtractor::new(kind))
            },
        }
    }

    /// Build series data for one series of the chart.
    pub fn extract(
        &mut self,
        id: SeriesId,
        series: &SeriesDefinition,
        ctx: &ExtractContext<'_>,
    ) -> SeriesData {
        let mut data = match self {
            Self::Line(e) => e.extract(id, series, ctx),
            Self::Bar(e) => e.extract(id, series, ctx),
            Self::Pie(e) => e.extract(id, series, ctx),
            Self::Radar(e) => e.extract(id, series, ctx),
            Self::Scatter(e) => e.extract(id, series, ctx),
            Self::Area(e) => e.extract(id, series, ctx),
            Self::Stock(e) => e.extract(id, series, ctx),
            Self::Generic(e) => e.extract(id, series, ctx),
        };
        data.display_blanks = ctx.display_blanks;
        log::debug!(
            "series {id}: extracted {} points as {}",
            data.len(),
            data.chart_type
        );
        data
    }
}

/// Name, categories, and single-range values: the steps every variant shares.
pub(crate) fn extract_common(
    id: SeriesId,
    chart_type: ChartType,
    series: &SeriesDefinition,
    ctx: &ExtractContext<'_>,
) -> SeriesData {
    let values = ctx.read_values(id, series.values.as_ref()).unwrap_or_default();
    let points = values
        .into_iter()
        .enumerate()
        .map(|(i, y)| SeriesPoint::with_y(i, y))
        .collect();

    let mut data = SeriesData::new(id, chart_type, points);
    data.name = ctx.read_name(id, series.name.as_ref());
    if chart_type.supports_categories() {
        data.categories = ctx
            .read_categories(id, series.categories.as_ref())
            .map(|labels| fit_categories(id, labels, data.len()));
    }
    data
}

/// Make the label list exactly as long as the point list.
fn fit_categories(id: SeriesId, mut labels: Vec<String>, points: usize) -> Vec<String> {
    if labels.len() != points {
        log::debug!(
            "series {id}: {} category labels for {points} points",
            labels.len()
        );
        labels.resize(points, String::new());
    }
    labels
}
