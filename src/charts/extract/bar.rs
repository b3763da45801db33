//! Bar and column charts.

use super::{ExtractContext, extract_common};
use crate::charts::definition::SeriesDefinition;
use crate::charts::series::{SeriesData, SeriesId};
use crate::charts::types::{BarDirection, ChartType, Grouping};

/// Bar chart extraction.
///
/// Stacking comes from the grouping (`Stacked` -> normal, `PercentStacked`
/// -> percent, anything else -> none) and orientation from the bar
/// direction.
#[derive(Debug, Clone)]
pub struct BarExtractor {
    chart_type: ChartType,
    grouping: Grouping,
    direction: BarDirection,
}

impl BarExtractor {
    /// Create a bar extractor.
    #[inline]
    pub fn new(chart_type: ChartType, grouping: Grouping, direction: BarDirection) -> Self {
        Self {
            chart_type,
            grouping,
            direction,
        }
    }

    pub(super) fn extract(
        &mut self,
        id: SeriesId,
        series: &SeriesDefinition,
        ctx: &ExtractContext<'_>,
    ) -> SeriesData {
        let mut data = extract_common(id, self.chart_type, series, ctx);
        data.stacking = self.grouping.stacking();
        data.orientation = Some(self.direction);
        data
    }
}
