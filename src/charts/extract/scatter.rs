//! Scatter and bubble charts.

use super::ExtractContext;
use crate::charts::definition::SeriesDefinition;
use crate::charts::series::{SeriesData, SeriesId, SeriesPoint};
use crate::charts::types::ChartType;

/// Scatter extraction over two parallel ranges.
///
/// The point count is the length of the shorter range; extra values in the
/// longer range are ignored. Without an X range the points carry only Y.
#[derive(Debug, Clone)]
pub struct ScatterExtractor {
    chart_type: ChartType,
}

impl ScatterExtractor {
    /// Create a scatter extractor.
    #[inline]
    pub fn new(chart_type: ChartType) -> Self {
        Self { chart_type }
    }

    pub(super) fn extract(
        &mut self,
        id: SeriesId,
        series: &SeriesDefinition,
        ctx: &ExtractContext<'_>,
    ) -> SeriesData {
        let ys = ctx.read_values(id, series.values.as_ref()).unwrap_or_default();
        let xs = ctx.read_values(id, series.x_values.as_ref());

        let count = match &xs {
            Some(xs) => {
                if xs.len() != ys.len() {
                    log::debug!(
                        "series {id}: {} x values and {} y values, truncating",
                        xs.len(),
                        ys.len()
                    );
                }
                xs.len().min(ys.len())
            },
            None => ys.len(),
        };

        let points = (0..count)
            .map(|i| {
                let mut point = SeriesPoint::with_y(i, ys[i]);
                point.x = xs.as_ref().and_then(|xs| xs[i]);
                point
            })
            .collect();

        let mut data = SeriesData::new(id, self.chart_type, points);
        data.name = ctx.read_name(id, series.name.as_ref());
        data.marker = series.marker;
        data.dash = series.dash;
        data.smooth = series.smooth;
        data
    }
}
