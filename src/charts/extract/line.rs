//! Line and spline charts.

use super::{ExtractContext, extract_common};
use crate::charts::definition::SeriesDefinition;
use crate::charts::series::{SeriesData, SeriesId};
use crate::charts::types::{ChartType, Grouping};

/// Line chart extraction: grouping-derived stacking plus marker, dash, and
/// smoothing hints.
#[derive(Debug, Clone)]
pub struct LineExtractor {
    chart_type: ChartType,
    grouping: Grouping,
}

impl LineExtractor {
    /// Create a line extractor.
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
        data.marker = series.marker;
        data.dash = series.dash;
        data.smooth = series.smooth;
        data
    }
}
