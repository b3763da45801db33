//! Live binding of series points to their backing cells.
//!
//! The registry remembers, per series, the reference strings its points were
//! read from. When the host reports edited cells, each bound reference is
//! re-resolved (cheap next to a full extraction: names and categories are
//! not touched), the edited cells are matched against it, and the matching
//! points are patched in place. Point order never changes.
//!
//! A reference that stops resolving, typically after rows or sheets were
//! deleted, marks its series stale: the series keeps its last values and
//! receives no further updates. Other series are unaffected.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

use smallvec::{SmallVec, smallvec};

use crate::charts::config::ExtractConfig;
use crate::charts::definition::SeriesDefinition;
use crate::charts::extract::{ExtractContext, read_number};
use crate::charts::series::{PointField, SeriesData, SeriesId, SharedSeries};
use crate::charts::types::DisplayBlanks;
use crate::common::error::{Error, Result};
use crate::sheet::reference::{CellCoordinate, RangeResolver};
use crate::sheet::traits::{CellSource, ChangeFeed, SubscriptionId};

/// One reference bound to one point field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundRange {
    /// Reference text as stored in the definition
    pub formula: String,
    /// Point field the reference feeds
    pub field: PointField,
}

impl BoundRange {
    /// Create a bound range.
    #[inline]
    pub fn new(formula: impl Into<String>, field: PointField) -> Self {
        Self {
            formula: formula.into(),
            field,
        }
    }
}

/// Whether a series still receives updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Updates are applied
    Live,
    /// A reference no longer resolves; values are frozen
    Stale,
}

/// The references of a series definition that can be bound, primary first.
///
/// The primary range is the one a selection highlights: close for stock
/// series with OHLC sources, the value (Y) range otherwise. Literal sources
/// are not bindable and are skipped.
pub fn bound_ranges(series: &SeriesDefinition) -> SmallVec<[BoundRange; 1]> {
    let mut ranges: SmallVec<[BoundRange; 1]> = SmallVec::new();
    let mut push = |formula: Option<&str>, field: PointField| {
        if let Some(formula) = formula {
            ranges.push(BoundRange::new(formula, field));
        }
    };

    match &series.ohlc {
        Some(ohlc) => {
            push(ohlc.close.as_ref().and_then(|s| s.formula()), PointField::Close);
            push(ohlc.open.as_ref().and_then(|s| s.formula()), PointField::Open);
            push(ohlc.high.as_ref().and_then(|s| s.formula()), PointField::High);
            push(ohlc.low.as_ref().and_then(|s| s.formula()), PointField::Low);
        },
        None => {
            push(series.values.as_ref().and_then(|s| s.formula()), PointField::Value);
            push(series.x_values.as_ref().and_then(|s| s.formula()), PointField::X);
        },
    }
    ranges
}

struct Binding {
    series: Weak<RefCell<SeriesData>>,
    ranges: SmallVec<[BoundRange; 1]>,
    home_sheet: String,
    resolver: RangeResolver,
    display_blanks: DisplayBlanks,
    state: BindingState,
}

/// Registry of live-bound series, keyed by series id.
pub struct LiveBindingRegistry {
    bindings: BTreeMap<SeriesId, Binding>,
    resolver: RangeResolver,
    next_id: u64,
}

impl LiveBindingRegistry {
    /// Create an empty registry with default resolver settings.
    #[inline]
    pub fn new() -> Self {
        Self::from_config(&ExtractConfig::default())
    }

    /// Create an empty registry whose resolver follows `config`.
    ///
    /// These settings only apply to [`LiveBindingRegistry::bind_values`];
    /// [`LiveBindingRegistry::bind`] takes them from the extraction context.
    pub fn from_config(config: &ExtractConfig) -> Self {
        Self {
            bindings: BTreeMap::new(),
            resolver: RangeResolver::from_config(config),
            next_id: 0,
        }
    }

    /// Hand out the next series id.
    #[inline]
    pub fn allocate_id(&mut self) -> SeriesId {
        let id = SeriesId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Bind a series to the references it was extracted from.
    ///
    /// The binding keeps the home sheet and resolver settings of `ctx`, so
    /// live re-resolution reads the references exactly as extraction did.
    /// The registry keeps only a weak reference; the series stays owned by
    /// its chart. Returns false, without registering, when `ranges` is empty.
    pub fn bind(
        &mut self,
        series: &SharedSeries,
        ranges: SmallVec<[BoundRange; 1]>,
        ctx: &ExtractContext<'_>,
    ) -> bool {
        self.insert(series, ranges, &ctx.home_sheet, ctx.resolver().clone())
    }

    /// Bind a single value range, resolved with the registry's own settings.
    pub fn bind_values(&mut self, series: &SharedSeries, formula: &str, home_sheet: &str) -> bool {
        let resolver = self.resolver.clone();
        self.insert(
            series,
            smallvec![BoundRange::new(formula, PointField::Value)],
            home_sheet,
            resolver,
        )
    }

    fn insert(
        &mut self,
        series: &SharedSeries,
        ranges: SmallVec<[BoundRange; 1]>,
        home_sheet: &str,
        resolver: RangeResolver,
    ) -> bool {
        if ranges.is_empty() {
            return false;
        }
        let data = series.borrow();
        let id = data.id();
        log::debug!("series {id}: binding {} range(s)", ranges.len());
        self.bindings.insert(
            id,
            Binding {
                series: Rc::downgrade(series),
                ranges,
                home_sheet: home_sheet.to_string(),
                resolver,
                display_blanks: data.display_blanks,
                state: BindingState::Live,
            },
        );
        true
    }

    /// Remove a binding.
    pub fn unbind(&mut self, id: SeriesId) -> Result<()> {
        self.bindings
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::UnknownSeries(id))
    }

    /// Replace the reference bound to `field`, e.g. after the host rewrote
    /// it for inserted or deleted rows.
    ///
    /// The new text is not resolved until the next change batch; if it
    /// fails then, the series goes stale.
    pub fn set_formula(&mut self, id: SeriesId, field: PointField, formula: impl Into<String>) -> Result<()> {
        let binding = self.bindings.get_mut(&id).ok_or(Error::UnknownSeries(id))?;
        let formula = formula.into();
        match binding.ranges.iter_mut().find(|r| r.field == field) {
            Some(range) => range.formula = formula,
            None => binding.ranges.push(BoundRange::new(formula, field)),
        }
        Ok(())
    }

    /// The primary reference of a series, as stored.
    pub fn formula(&self, id: SeriesId) -> Option<&str> {
        self.bindings
            .get(&id)
            .and_then(|b| b.ranges.first())
            .map(|r| r.formula.as_str())
    }

    /// The primary reference with unqualified areas placed on the series'
    /// home sheet, suitable for a selection command.
    ///
    /// Falls back to the stored text when it no longer parses.
    pub fn selection_reference(&self, id: SeriesId) -> Option<String> {
        let binding = self.bindings.get(&id)?;
        let formula = &binding.ranges.first()?.formula;
        let Ok(areas) = binding.resolver.parse(formula) else {
            return Some(formula.clone());
        };
        let parts: Vec<String> = areas
            .into_iter()
            .map(|mut area| {
                if area.sheet.is_none() {
                    area.sheet = Some(binding.home_sheet.clone());
                }
                area.to_string()
            })
            .collect();
        let delimiter = binding.resolver.delimiter().to_string();
        Some(parts.join(delimiter.as_str()))
    }

    /// Binding state of a series.
    #[inline]
    pub fn state(&self, id: SeriesId) -> Option<BindingState> {
        self.bindings.get(&id).map(|b| b.state)
    }

    /// Number of registered series.
    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if no series is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Apply a batch of cell edits to every live series.
    ///
    /// `changed` is processed in host order; cells without a sheet refer to
    /// the source's active sheet. Returns the number of point updates made.
    pub fn on_cells_changed(&mut self, source: &dyn CellSource, changed: &[CellCoordinate]) -> usize {
        if changed.is_empty() {
            return 0;
        }
        let active = source.active_sheet_name();
        let changed: Vec<CellCoordinate> = changed.iter().map(|c| c.to_absolute(&active)).collect();

        let mut applied = 0;
        let mut released = Vec::new();
        for (&id, binding) in self.bindings.iter_mut() {
            if binding.state == BindingState::Stale {
                continue;
            }
            let Some(series) = binding.series.upgrade() else {
                released.push(id);
                continue;
            };
            match apply_to_binding(id, binding, &series, source, &changed) {
                Ok(count) => applied += count,
                Err(err) => {
                    log::warn!("{err}; live updates disabled for this series");
                    binding.state = BindingState::Stale;
                },
            }
        }

        for id in released {
            log::debug!("series {id}: dropped by its chart, unbinding");
            self.bindings.remove(&id);
        }
        applied
    }

    /// Subscribe a shared registry to a host's change feed.
    ///
    /// The listener holds the registry weakly; once the registry is dropped
    /// it ignores further notifications.
    pub fn subscribe(registry: &Rc<RefCell<Self>>, feed: &mut dyn ChangeFeed) -> SubscriptionId {
        let weak = Rc::downgrade(registry);
        feed.subscribe(Box::new(move |source, changed| {
            let Some(registry) = weak.upgrade() else {
                return;
            };
            match registry.try_borrow_mut() {
                Ok(mut registry) => {
                    registry.on_cells_changed(source, changed);
                },
                Err(_) => log::warn!("change notification arrived while the registry was busy; ignored"),
            };
        }))
    }
}

impl Default for LiveBindingRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

fn apply_to_binding(
    id: SeriesId,
    binding: &Binding,
    series: &SharedSeries,
    source: &dyn CellSource,
    changed: &[CellCoordinate],
) -> Result<usize> {
    // Resolve every range before touching any point so a stale reference
    // leaves the whole series untouched.
    let mut resolved = Vec::with_capacity(binding.ranges.len());
    for range in &binding.ranges {
        let coords = binding
            .resolver
            .resolve(&range.formula)
            .map_err(|err| {
                log::debug!("series {id}: {err}");
                Error::StaleReference {
                    series: id,
                    formula: range.formula.clone(),
                }
            })?;
        let mut positions: HashMap<CellCoordinate, SmallVec<[usize; 1]>> = HashMap::new();
        for (pos, coord) in coords.iter().enumerate() {
            positions
                .entry(coord.to_absolute(&binding.home_sheet))
                .or_default()
                .push(pos);
        }
        resolved.push((range.field, positions));
    }

    let Ok(mut data) = series.try_borrow_mut() else {
        log::warn!("series {id}: busy during update, skipping batch");
        return Ok(0);
    };

    let mut applied = 0;
    for cell in changed {
        for (field, positions) in &resolved {
            let Some(hits) = positions.get(cell) else {
                continue;
            };
            let value = read_number(source, cell, binding.display_blanks);
            for &pos in hits {
                if data.apply_update(pos, *field, value) {
                    log::debug!("series {id}: point {pos} {field:?} <- {value:?} from {cell}");
                    applied += 1;
                }
            }
        }
    }
    Ok(applied)
}
