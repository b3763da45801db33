//! Radar charts.

use super::{ExtractContext, extract_common};
use crate::charts::definition::SeriesDefinition;
use crate::charts::series::{SeriesData, SeriesId};
use crate::charts::types::ChartType;

/// Radar chart extraction: common steps plus marker and dash hints.
#[derive(Debug, Clone, Default)]
pub struct RadarExtractor;

impl RadarExtractor {
    /// Create a radar extractor.
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
        let mut data = extract_common(id, ChartType::Radar, series, ctx);
        data.marker = series.marker;
        data.dash = series.dash;
        data
    }
}
