//! Area charts.

use super::{ExtractContext, extract_common};
use crate::charts::definition::SeriesDefinition;
use crate::charts::series::{SeriesData, SeriesId};
use crate::charts::types::{ChartType, Grouping};

/// Area chart extraction. Stacking follows the grouping exactly as for bars.
#[derive(Debug, Clone)]
pub struct AreaExtractor {
    chart_type: ChartType,
    grouping: Grouping,
}

impl AreaExtractor {
    /// Create an area extractor.
    #[inline]
    pub fn new(chart_type: ChartType, grouping: Grouping) -> Self {
        Self {
            chart_type,
            grouping,
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
        data
    }
}
