//! Renderable series data.
//!
//! [`SeriesData`] is what extraction produces and what the renderer draws.
//! Point order is fixed when the series is built; afterwards only the value
//! fields of existing points change, through [`SeriesData::apply_update`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::charts::types::{BarDirection, ChartType, DashStyle, DisplayBlanks, MarkerStyle, StackingMode};

/// Stable identifier assigned to a series at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId(u64);

impl SeriesId {
    /// Wrap a raw id.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Open/high/low/close values of one stock point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ohlc {
    /// Opening value
    pub open: Option<f64>,
    /// High value
    pub high: Option<f64>,
    /// Low value
    pub low: Option<f64>,
    /// Closing value
    pub close: Option<f64>,
}

/// Which value of a point an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointField {
    /// The plotted value (Y for scatter charts)
    Value,
    /// The X value of a scatter point
    X,
    /// Stock open
    Open,
    /// Stock high
    High,
    /// Stock low
    Low,
    /// Stock close
    Close,
}

/// A single positionally indexed datum.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    index: usize,
    /// X value (scatter charts)
    pub x: Option<f64>,
    /// Plotted value
    pub y: Option<f64>,
    /// Stock values
    pub ohlc: Option<Ohlc>,
}

impl SeriesPoint {
    /// Create an empty point at `index`.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            x: None,
            y: None,
            ohlc: None,
        }
    }

    /// Create a point with a plotted value.
    #[inline]
    pub fn with_y(index: usize, y: Option<f64>) -> Self {
        Self {
            y,
            ..Self::new(index)
        }
    }

    /// Position of this point in its series.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Read one field.
    pub fn get(&self, field: PointField) -> Option<f64> {
        match field {
            PointField::Value => self.y,
            PointField::X => self.x,
            PointField::Open => self.ohlc.and_then(|o| o.open),
            PointField::High => self.ohlc.and_then(|o| o.high),
            PointField::Low => self.ohlc.and_then(|o| o.low),
            PointField::Close => self.ohlc.and_then(|o| o.close),
        }
    }

    /// Overwrite one field.
    ///
    /// Writing `Close` also writes the plotted value so stock series stay
    /// drawable by renderers that only read `y`.
    pub fn set(&mut self, field: PointField, value: Option<f64>) {
        match field {
            PointField::Value => self.y = value,
            PointField::X => self.x = value,
            PointField::Open => self.ohlc.get_or_insert_with(Ohlc::default).open = value,
            PointField::High => self.ohlc.get_or_insert_with(Ohlc::default).high = value,
            PointField::Low => self.ohlc.get_or_insert_with(Ohlc::default).low = value,
            PointField::Close => {
                self.ohlc.get_or_insert_with(Ohlc::default).close = value;
                self.y = value;
            },
        }
    }
}

/// Notification sent to the renderer after a point changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointUpdate {
    /// Position of the changed point
    pub index: usize,
    /// Field that changed
    pub field: PointField,
    /// New value
    pub value: Option<f64>,
}

/// Called after every in-place point update.
pub type UpdateCallback = Box<dyn FnMut(PointUpdate)>;

/// Called when the renderer reports a point selection.
pub type SelectCallback = Box<dyn FnMut(SeriesId, usize)>;

/// Series data shared between the owning chart and the binding registry.
pub type SharedSeries = Rc<RefCell<SeriesData>>;

/// Doughnut geometry, applied to one ring per chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonutGeometry {
    /// Hole size in percent of the outer radius
    pub hole_size_percent: u32,
    /// Whether this ring is drawn exploded
    pub exploded_ring: bool,
}

/// A renderable chart series.
pub struct SeriesData {
    id: SeriesId,
    points: Vec<SeriesPoint>,
    /// Chart type the series was extracted for
    pub chart_type: ChartType,
    /// Display name
    pub name: Option<String>,
    /// Category labels, one per point
    pub categories: Option<Vec<String>>,
    /// Stacking mode
    pub stacking: StackingMode,
    /// Bar orientation (bar charts only)
    pub orientation: Option<BarDirection>,
    /// Drawn in 3D
    pub is_3d: bool,
    /// Marker symbol hint
    pub marker: Option<MarkerStyle>,
    /// Dash pattern hint
    pub dash: Option<DashStyle>,
    /// Smooth line hint
    pub smooth: bool,
    /// Slices drawn pulled out (pie/doughnut)
    pub exploded: bool,
    /// Explosion distance in percent (pie/doughnut)
    pub explosion: Option<u32>,
    /// Doughnut geometry, present on the ring that carries it
    pub donut: Option<DonutGeometry>,
    /// First slice angle in degrees (pie/doughnut)
    pub first_slice_angle: Option<u32>,
    /// How blank cells are plotted
    pub display_blanks: DisplayBlanks,
    on_update: Option<UpdateCallback>,
    on_select: Option<SelectCallback>,
}

impl SeriesData {
    /// Create series data with a fixed point sequence.
    pub fn new(id: SeriesId, chart_type: ChartType, points: Vec<SeriesPoint>) -> Self {
        Self {
            id,
            points,
            chart_type,
            name: None,
            categories: None,
            stacking: StackingMode::None,
            orientation: None,
            is_3d: chart_type.is_3d(),
            marker: None,
            dash: None,
            smooth: false,
            exploded: false,
            explosion: None,
            donut: None,
            first_slice_angle: None,
            display_blanks: DisplayBlanks::Gap,
            on_update: None,
            on_select: None,
        }
    }

    /// Series identifier.
    #[inline]
    pub fn id(&self) -> SeriesId {
        self.id
    }

    /// Points in plot order.
    #[inline]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Plotted values in point order.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Hole size of the doughnut ring, if this series carries the geometry.
    #[inline]
    pub fn donut_hole_size_percent(&self) -> Option<u32> {
        self.donut.map(|d| d.hole_size_percent)
    }

    /// Install the update callback.
    pub fn set_on_update(&mut self, callback: impl FnMut(PointUpdate) + 'static) {
        self.on_update = Some(Box::new(callback));
    }

    /// Install the selection callback.
    pub fn set_on_select(&mut self, callback: impl FnMut(SeriesId, usize) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    /// Overwrite one field of the point at `index` and notify the renderer.
    ///
    /// Returns false, without notifying, if no point exists at `index`.
    /// The update callback runs while the series is mutably borrowed, so it
    /// must not borrow the same [`SharedSeries`] again.
    pub fn apply_update(&mut self, index: usize, field: PointField, value: Option<f64>) -> bool {
        let Some(point) = self.points.get_mut(index) else {
            return false;
        };
        point.set(field, value);
        if let Some(callback) = self.on_update.as_mut() {
            callback(PointUpdate {
                index,
                field,
                value,
            });
        }
        true
    }

    /// Report a point selection coming from the renderer.
    pub fn select(&mut self, index: usize) {
        let id = self.id;
        if let Some(callback) = self.on_select.as_mut() {
            callback(id, index);
        }
    }
}

impl fmt::Debug for SeriesData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesData")
            .field("id", &self.id)
            .field("chart_type", &self.chart_type)
            .field("name", &self.name)
            .field("categories", &self.categories)
            .field("points", &self.points)
            .field("stacking", &self.stacking)
            .field("orientation", &self.orientation)
            .field("is_3d", &self.is_3d)
            .field("exploded", &self.exploded)
            .field("donut", &self.donut)
            .finish_non_exhaustive()
    }
}
