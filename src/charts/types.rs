//! Core chart types and enumerations.
//!
//! This module defines the chart-type tags, grouping and stacking modes, and
//! the style hints that flow from a chart definition into series data.

use std::fmt;

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Chart type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartType {
    /// Area chart (2D)
    Area,
    /// Area chart (3D)
    Area3D,
    /// Bar/column chart
    Bar,
    /// Bar/column chart (3D)
    Bar3D,
    /// Bubble chart
    Bubble,
    /// Doughnut chart
    Doughnut,
    /// Line chart
    Line,
    /// Line chart (3D)
    Line3D,
    /// Pie chart
    Pie,
    /// Pie chart (3D)
    Pie3D,
    /// Radar chart
    Radar,
    /// Scatter (XY) chart
    Scatter,
    /// Stock (open/high/low/close) chart
    Stock,
    /// Surface chart
    Surface,
    /// Surface chart (3D)
    Surface3D,
    /// Unknown or unsupported chart type
    Unknown,
}

static CHART_TAGS: phf::Map<&'static str, ChartType> = phf_map! {
    "areaChart" => ChartType::Area,
    "area3DChart" => ChartType::Area3D,
    "barChart" => ChartType::Bar,
    "bar3DChart" => ChartType::Bar3D,
    "bubbleChart" => ChartType::Bubble,
    "doughnutChart" => ChartType::Doughnut,
    "lineChart" => ChartType::Line,
    "line3DChart" => ChartType::Line3D,
    "pieChart" => ChartType::Pie,
    "pie3DChart" => ChartType::Pie3D,
    "ofPieChart" => ChartType::Pie,
    "radarChart" => ChartType::Radar,
    "scatterChart" => ChartType::Scatter,
    "stockChart" => ChartType::Stock,
    "surfaceChart" => ChartType::Surface,
    "surface3DChart" => ChartType::Surface3D,
};

impl ChartType {
    /// Map a source chart-type tag (e.g. `barChart`) to a chart type.
    ///
    /// Unrecognized tags map to [`ChartType::Unknown`].
    #[inline]
    pub fn from_tag(tag: &str) -> Self {
        CHART_TAGS.get(tag).copied().unwrap_or(ChartType::Unknown)
    }

    /// Returns the source tag for this chart type.
    #[inline]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Area => "areaChart",
            Self::Area3D => "area3DChart",
            Self::Bar => "barChart",
            Self::Bar3D => "bar3DChart",
            Self::Bubble => "bubbleChart",
            Self::Doughnut => "doughnutChart",
            Self::Line => "lineChart",
            Self::Line3D => "line3DChart",
            Self::Pie => "pieChart",
            Self::Pie3D => "pie3DChart",
            Self::Radar => "radarChart",
            Self::Scatter => "scatterChart",
            Self::Stock => "stockChart",
            Self::Surface => "surfaceChart",
            Self::Surface3D => "surface3DChart",
            Self::Unknown => "unknownChart",
        }
    }

    /// Returns true if this is a 3D chart type.
    #[inline]
    pub const fn is_3d(&self) -> bool {
        matches!(
            self,
            Self::Area3D | Self::Bar3D | Self::Line3D | Self::Pie3D | Self::Surface3D
        )
    }

    /// Returns true if this chart type supports categories.
    #[inline]
    pub const fn supports_categories(&self) -> bool {
        !matches!(self, Self::Scatter | Self::Bubble)
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Bar/column direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarDirection {
    /// Horizontal bars
    Bar,
    /// Vertical bars (columns)
    #[default]
    Column,
}

/// Series grouping as stored in the chart definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Grouping {
    /// Clustered bars
    Clustered,
    /// Stacked series
    Stacked,
    /// 100% stacked series
    PercentStacked,
    /// Standard grouping
    #[default]
    Standard,
}

impl Grouping {
    /// Stacking mode the renderer should apply for this grouping.
    #[inline]
    pub const fn stacking(&self) -> StackingMode {
        match self {
            Self::Stacked => StackingMode::Normal,
            Self::PercentStacked => StackingMode::Percent,
            Self::Clustered | Self::Standard => StackingMode::None,
        }
    }
}

/// How series are layered along a shared axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StackingMode {
    /// Series drawn side by side or overlapping
    #[default]
    None,
    /// Values accumulate
    Normal,
    /// Values accumulate to 100%
    Percent,
}

/// Marker style for line, radar, and scatter charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerStyle {
    /// Circle marker
    Circle,
    /// Dash marker
    Dash,
    /// Diamond marker
    Diamond,
    /// Dot marker
    Dot,
    /// No marker
    None,
    /// Picture marker
    Picture,
    /// Plus marker
    Plus,
    /// Square marker
    Square,
    /// Star marker
    Star,
    /// Triangle marker
    Triangle,
    /// X marker
    X,
    /// Automatic marker
    Auto,
}

/// Line dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashStyle {
    /// Solid line
    Solid,
    /// Dotted line
    Dot,
    /// Dashed line
    Dash,
    /// Long dashes
    LongDash,
    /// Dash-dot pattern
    DashDot,
    /// Long dash-dot pattern
    LongDashDot,
    /// Long dash-dot-dot pattern
    LongDashDotDot,
    /// Short dashes
    ShortDash,
    /// Short dots
    ShortDot,
    /// Short dash-dot pattern
    ShortDashDot,
    /// Short dash-dot-dot pattern
    ShortDashDotDot,
}

static DASH_PRESETS: phf::Map<&'static str, DashStyle> = phf_map! {
    "solid" => DashStyle::Solid,
    "dot" => DashStyle::Dot,
    "dash" => DashStyle::Dash,
    "lgDash" => DashStyle::LongDash,
    "dashDot" => DashStyle::DashDot,
    "lgDashDot" => DashStyle::LongDashDot,
    "lgDashDotDot" => DashStyle::LongDashDotDot,
    "sysDash" => DashStyle::ShortDash,
    "sysDot" => DashStyle::ShortDot,
    "sysDashDot" => DashStyle::ShortDashDot,
    "sysDashDotDot" => DashStyle::ShortDashDotDot,
};

impl DashStyle {
    /// Map a preset dash name (e.g. `sysDot`) to a dash style.
    #[inline]
    pub fn from_preset(preset: &str) -> Option<Self> {
        DASH_PRESETS.get(preset).copied()
    }
}

/// How blank cells in a value range are plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayBlanks {
    /// Gaps where there are blank cells
    #[default]
    Gap,
    /// Connect data points across blank cells
    Span,
    /// Treat blank cells as zero
    Zero,
}
