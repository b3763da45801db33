//! A rendered chart wired to its host sheet.

use std::cell::RefCell;
use std::rc::Rc;

use super::registry::{LiveBindingRegistry, bound_ranges};
use super::selection::SelectionBridge;
use crate::charts::config::ExtractConfig;
use crate::charts::definition::ChartDefinition;
use crate::charts::extract::{ExtractContext, Extractor};
use crate::charts::series::{PointUpdate, SeriesId, SharedSeries};
use crate::sheet::traits::{CellSource, SelectionTarget};

/// Series extracted from one chart definition, with their live bindings.
///
/// The chart owns its series; the registry only observes them. Dropping or
/// disposing the chart removes its bindings.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use chartlink::binding::{BoundChart, LiveBindingRegistry};
/// use chartlink::charts::{ChartDefinition, ChartType, ExtractConfig, SeriesDefinition};
/// use chartlink::sheet::Grid;
///
/// let mut grid = Grid::new("Sheet1");
/// for row in 1..=3 {
///     grid.set(&format!("A{row}"), row as f64)?;
/// }
///
/// let registry = Rc::new(RefCell::new(LiveBindingRegistry::new()));
/// LiveBindingRegistry::subscribe(&registry, &mut grid);
///
/// let definition = ChartDefinition::new(ChartType::Bar)
///     .add_series(SeriesDefinition::new().with_values_ref("$A$1:$A$3"));
/// let chart = BoundChart::build(&definition, &grid, &registry, &ExtractConfig::default());
///
/// grid.edit("A2", 99.0)?;
/// assert_eq!(chart.series()[0].borrow().values(), vec![Some(1.0), Some(99.0), Some(3.0)]);
/// # Ok::<(), chartlink::Error>(())
/// ```
pub struct BoundChart {
    series: Vec<SharedSeries>,
    bound: Vec<SeriesId>,
    registry: Rc<RefCell<LiveBindingRegistry>>,
}

impl BoundChart {
    /// Extract every series of `definition` and bind its references.
    ///
    /// Series ids come from `registry`. Binding is skipped when
    /// `config.live_updates` is off or a series only has literal data.
    pub fn build(
        definition: &ChartDefinition,
        cells: &dyn CellSource,
        registry: &Rc<RefCell<LiveBindingRegistry>>,
        config: &ExtractConfig,
    ) -> Self {
        let ctx = ExtractContext::new(cells, config);
        let mut extractor = Extractor::for_chart(definition);
        let mut series = Vec::with_capacity(definition.series.len());
        let mut bound = Vec::new();

        for series_def in &definition.series {
            let id = registry.borrow_mut().allocate_id();
            let shared = Rc::new(RefCell::new(extractor.extract(id, series_def, &ctx)));
            if config.live_updates
                && registry
                    .borrow_mut()
                    .bind(&shared, bound_ranges(series_def), &ctx)
            {
                bound.push(id);
            }
            series.push(shared);
        }

        log::debug!(
            "{} chart built: {} series, {} bound",
            definition.chart_type,
            series.len(),
            bound.len()
        );
        Self {
            series,
            bound,
            registry: Rc::clone(registry),
        }
    }

    /// The extracted series, in definition order.
    #[inline]
    pub fn series(&self) -> &[SharedSeries] {
        &self.series
    }

    /// Ids of the series, in definition order.
    pub fn series_ids(&self) -> Vec<SeriesId> {
        self.series.iter().map(|s| s.borrow().id()).collect()
    }

    /// Returns true if the series is still bound by this chart.
    #[inline]
    pub fn is_bound(&self, id: SeriesId) -> bool {
        self.bound.contains(&id)
    }

    /// Install one update callback for every series of the chart.
    pub fn set_on_update(&self, callback: impl FnMut(SeriesId, PointUpdate) + 'static) {
        let callback = Rc::new(RefCell::new(callback));
        for series in &self.series {
            let mut data = series.borrow_mut();
            let id = data.id();
            let callback = Rc::clone(&callback);
            data.set_on_update(move |update| (*callback.borrow_mut())(id, update));
        }
    }

    /// Route point selections of every series to `target`.
    ///
    /// Selections of unbound series are logged and dropped.
    pub fn connect_selection<T>(&self, target: Rc<RefCell<T>>)
    where
        T: SelectionTarget + 'static,
    {
        let bridge = SelectionBridge::new(Rc::clone(&self.registry));
        for series in &self.series {
            let bridge = bridge.clone();
            let target = Rc::clone(&target);
            series.borrow_mut().set_on_select(move |id, index| {
                let Ok(mut target) = target.try_borrow_mut() else {
                    log::warn!("series {id}: selection target busy, point {index} ignored");
                    return;
                };
                if let Err(err) = bridge.on_point_selected(id, &mut *target) {
                    log::warn!("point {index} selected: {err}");
                }
            });
        }
    }

    /// Remove every binding of this chart. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.bound.is_empty() {
            return;
        }
        let Ok(mut registry) = self.registry.try_borrow_mut() else {
            // The registry prunes bindings whose series are gone.
            log::debug!("registry busy while disposing; leaving bindings to be pruned");
            self.bound.clear();
            return;
        };
        for id in self.bound.drain(..) {
            if let Err(err) = registry.unbind(id) {
                log::debug!("dispose: {err}");
            }
        }
    }
}

impl Drop for BoundChart {
    fn drop(&mut self) {
        self.dispose();
    }
}
