//! Fallback for chart types without a dedicated policy.

use super::{ExtractContext, extract_common};
use crate::charts::definition::SeriesDefinition;
use crate::charts::series::{SeriesData, SeriesId};
use crate::charts::types::ChartType;

/// Minimal line-like extraction: name, categories, and values only.
#[derive(Debug, Clone)]
pub struct GenericExtractor {
    chart_type: ChartType,
}

impl GenericExtractor {
    /// Create a generic extractor.
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
        extract_common(id, self.chart_type, series, ctx)
    }
}
