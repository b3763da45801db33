//! Stock (open/high/low/close) charts.

use super::{ExtractContext, extract_common};
use crate::charts::definition::SeriesDefinition;
use crate::charts::series::{Ohlc, SeriesData, SeriesId, SeriesPoint};
use crate::charts::types::ChartType;

/// Stock extraction.
///
/// Each present OHLC source is resolved separately; the point count is the
/// length of the shortest one and the plotted value mirrors close. A series
/// without OHLC sources is extracted like a line over its value range.
#[derive(Debug, Clone, Default)]
pub struct StockExtractor;

impl StockExtractor {
    /// Create a stock extractor.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    pub(super) fn extract(
        &mut self,
        id: SeriesId,
        series: &SeriesDefinition,
        ctx: &ExtractContext<'_>,
    ) -> SeriesData {
        let Some(sources) = &series.ohlc else {
            return extract_common(id, ChartType::Stock, series, ctx);
        };

        let open = ctx.read_values(id, sources.open.as_ref());
        let high = ctx.read_values(id, sources.high.as_ref());
        let low = ctx.read_values(id, sources.low.as_ref());
        let close = ctx.read_values(id, sources.close.as_ref());

        let count = [&open, &high, &low, &close]
            .into_iter()
            .flatten()
            .map(Vec::len)
            .min()
            .unwrap_or(0);

        let at = |values: &Option<Vec<Option<f64>>>, i: usize| values.as_ref().and_then(|v| v[i]);
        let points = (0..count)
            .map(|i| {
                let ohlc = Ohlc {
                    open: at(&open, i),
                    high: at(&high, i),
                    low: at(&low, i),
                    close: at(&close, i),
                };
                let mut point = SeriesPoint::with_y(i, ohlc.close);
                point.ohlc = Some(ohlc);
                point
            })
            .collect();

        let mut data = SeriesData::new(id, ChartType::Stock, points);
        data.name = ctx.read_name(id, series.name.as_ref());
        data.categories = ctx
            .read_categories(id, series.categories.as_ref())
            .map(|labels| super::fit_categories(id, labels, count));
        data
    }
}
