//! Pie and doughnut charts.

use super::{ExtractContext, extract_common};
use crate::charts::definition::SeriesDefinition;
use crate::charts::series::{DonutGeometry, SeriesData, SeriesId};
use crate::charts::types::ChartType;

/// Hole size used when the definition does not carry one.
pub const DEFAULT_HOLE_SIZE: u32 = 50;

/// Pie and doughnut extraction.
///
/// Every series records its own explosion. A doughnut exposes a single
/// explodable ring, so the doughnut geometry (hole size and exploded ring) is
/// applied to the first series extracted and never again for this chart.
#[derive(Debug, Clone)]
pub struct PieExtractor {
    chart_type: ChartType,
    hole_size: u32,
    first_slice_angle: u32,
    donut: Option<DonutGeometry>,
}

impl PieExtractor {
    /// Create a pie extractor.
    #[inline]
    pub fn new(chart_type: ChartType, hole_size: Option<u32>, first_slice_angle: u32) -> Self {
        Self {
            chart_type,
            hole_size: hole_size.unwrap_or(DEFAULT_HOLE_SIZE),
            first_slice_angle,
            donut: None,
        }
    }

    /// Returns true for doughnut charts.
    #[inline]
    pub fn is_doughnut(&self) -> bool {
        self.chart_type == ChartType::Doughnut
    }

    /// Doughnut geometry applied so far, `None` until the first ring.
    #[inline]
    pub fn donut_geometry(&self) -> Option<DonutGeometry> {
        self.donut
    }

    pub(super) fn extract(
        &mut self,
        id: SeriesId,
        series: &SeriesDefinition,
        ctx: &ExtractContext<'_>,
    ) -> SeriesData {
        let mut data = extract_common(id, self.chart_type, series, ctx);
        data.explosion = series.explosion;
        data.exploded = series.explosion.is_some_and(|e| e > 0);
        data.first_slice_angle = Some(self.first_slice_angle);

        if self.is_doughnut() && self.donut.is_none() {
            let geometry = DonutGeometry {
                hole_size_percent: self.hole_size,
                exploded_ring: data.exploded,
            };
            self.donut = Some(geometry);
            data.donut = Some(geometry);
        }
        data
    }
}
