//! Normalized chart definitions.
//!
//! The document-binding layer converts native chart objects into these plain
//! structures before extraction. Nothing here refers back to the document:
//! every data source is either a reference string or a literal list.

use serde::{Deserialize, Serialize};

use crate::charts::types::{BarDirection, ChartType, DashStyle, Grouping, MarkerStyle};

/// A reference to a data source (cell range formula).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSourceRef {
    /// Formula reference (e.g., "Sheet1!$A$1:$A$10")
    pub formula: String,
}

impl DataSourceRef {
    /// Create a new data source reference.
    #[inline]
    pub fn new(formula: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
        }
    }
}

/// Series name source (can be from formula or literal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TitleSource {
    /// Literal text
    Literal(String),
    /// Reference to a single cell
    Reference(DataSourceRef),
}

/// Category label source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CategorySource {
    /// Text labels read from a range
    Text(DataSourceRef),
    /// Numeric labels read from a range and formatted as text
    Numeric(DataSourceRef),
    /// Hierarchical label block; only the innermost level is used
    MultiLevel {
        /// Reference covering every level of the block
        source: DataSourceRef,
        /// Cached number of leaf (innermost) labels
        leaf_count: usize,
    },
    /// Labels stored inline in the definition
    Literal(Vec<String>),
    /// A source kind the extractor cannot read (carries the kind name)
    Unsupported(String),
}

/// Numeric value source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueSource {
    /// Values read from a range; can be live-bound
    Reference(DataSourceRef),
    /// Values stored inline in the definition
    Literal(Vec<Option<f64>>),
}

impl ValueSource {
    /// Create a reference value source.
    #[inline]
    pub fn reference(formula: impl Into<String>) -> Self {
        Self::Reference(DataSourceRef::new(formula))
    }

    /// Returns the formula if this source is a reference.
    #[inline]
    pub fn formula(&self) -> Option<&str> {
        match self {
            Self::Reference(r) => Some(r.formula.as_str()),
            Self::Literal(_) => None,
        }
    }
}

/// Value sources for open/high/low/close series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcSources {
    /// Opening values
    pub open: Option<ValueSource>,
    /// High values
    pub high: Option<ValueSource>,
    /// Low values
    pub low: Option<ValueSource>,
    /// Closing values
    pub close: Option<ValueSource>,
}

/// One series of a chart, in normalized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesDefinition {
    /// Series name
    pub name: Option<TitleSource>,
    /// Category labels
    pub categories: Option<CategorySource>,
    /// Values (Y values for scatter charts)
    pub values: Option<ValueSource>,
    /// X values (scatter and bubble charts)
    pub x_values: Option<ValueSource>,
    /// Open/high/low/close values (stock charts)
    pub ohlc: Option<OhlcSources>,
    /// Marker symbol
    pub marker: Option<MarkerStyle>,
    /// Line dash pattern
    pub dash: Option<DashStyle>,
    /// Smooth line
    pub smooth: bool,
    /// Explosion (for pie/doughnut, in percent)
    pub explosion: Option<u32>,
}

impl SeriesDefinition {
    /// Create an empty series definition.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a literal series name.
    #[inline]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(TitleSource::Literal(name.into()));
        self
    }

    /// Set a series name read from a single cell.
    #[inline]
    pub fn with_name_ref(mut self, formula: impl Into<String>) -> Self {
        self.name = Some(TitleSource::Reference(DataSourceRef::new(formula)));
        self
    }

    /// Set the category source.
    #[inline]
    pub fn with_categories(mut self, categories: CategorySource) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Set text categories read from a range.
    #[inline]
    pub fn with_category_ref(self, formula: impl Into<String>) -> Self {
        self.with_categories(CategorySource::Text(DataSourceRef::new(formula)))
    }

    /// Set values read from a range.
    #[inline]
    pub fn with_values_ref(mut self, formula: impl Into<String>) -> Self {
        self.values = Some(ValueSource::reference(formula));
        self
    }

    /// Set X and Y ranges for scatter charts.
    #[inline]
    pub fn with_xy_refs(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_values = Some(ValueSource::reference(x));
        self.values = Some(ValueSource::reference(y));
        self
    }

    /// Set open/high/low/close sources.
    #[inline]
    pub fn with_ohlc(mut self, ohlc: OhlcSources) -> Self {
        self.ohlc = Some(ohlc);
        self
    }

    /// Set marker symbol.
    #[inline]
    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Set dash pattern.
    #[inline]
    pub fn with_dash(mut self, dash: DashStyle) -> Self {
        self.dash = Some(dash);
        self
    }

    /// Set explosion percentage.
    #[inline]
    pub fn with_explosion(mut self, explosion: u32) -> Self {
        self.explosion = Some(explosion);
        self
    }
}

/// A chart and its series, in normalized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartDefinition {
    /// Chart type
    pub chart_type: ChartType,
    /// Grouping (bar, line, and area charts)
    pub grouping: Grouping,
    /// Bar direction (bar charts)
    pub bar_direction: BarDirection,
    /// Hole size (10-90%, doughnut charts)
    pub hole_size: Option<u32>,
    /// First slice angle (0-360 degrees, pie and doughnut charts)
    pub first_slice_angle: u32,
    /// Series in plot order
    pub series: Vec<SeriesDefinition>,
}

impl ChartDefinition {
    /// Create an empty definition for a chart type.
    #[inline]
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            grouping: Grouping::Standard,
            bar_direction: BarDirection::Column,
            hole_size: None,
            first_slice_angle: 0,
            series: Vec::new(),
        }
    }

    /// Set the grouping.
    #[inline]
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Set the bar direction.
    #[inline]
    pub fn with_bar_direction(mut self, direction: BarDirection) -> Self {
        self.bar_direction = direction;
        self
    }

    /// Set the doughnut hole size.
    #[inline]
    pub fn with_hole_size(mut self, hole_size: u32) -> Self {
        self.hole_size = Some(hole_size);
        self
    }

    /// Add a series.
    #[inline]
    pub fn add_series(mut self, series: SeriesDefinition) -> Self {
        self.series.push(series);
        self
    }
}

impl Default for ChartDefinition {
    #[inline]
    fn default() -> Self {
        Self::new(ChartType::Unknown)
    }
}
