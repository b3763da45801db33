//! Tests for live binding and selection

use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::charts::{
    ChartDefinition, ChartType, DisplayBlanks, ExtractConfig, OhlcSources, PointField,
    PointUpdate, SeriesDefinition, SeriesId, ValueSource,
};
use crate::common::error::Error;
use crate::sheet::{CellValue, ChangeFeed, Grid, SelectionTarget};

#[derive(Default)]
struct RecordingTarget {
    selections: Vec<String>,
}

impl SelectionTarget for RecordingTarget {
    fn set_selection(&mut self, reference: &str) {
        self.selections.push(reference.to_string());
    }
}

fn grid_with_column(values: &[f64]) -> Grid {
    let mut grid = Grid::new("Sheet1");
    for (row, value) in values.iter().enumerate() {
        grid.set(&format!("A{}", row + 1), *value).unwrap();
    }
    grid
}

fn shared_registry(grid: &mut Grid) -> Rc<RefCell<LiveBindingRegistry>> {
    let registry = Rc::new(RefCell::new(LiveBindingRegistry::new()));
    LiveBindingRegistry::subscribe(&registry, grid);
    registry
}

fn column_chart(values_ref: &str) -> ChartDefinition {
    ChartDefinition::new(ChartType::Bar).add_series(SeriesDefinition::new().with_values_ref(values_ref))
}

fn record_updates(chart: &BoundChart) -> Rc<RefCell<Vec<(SeriesId, PointUpdate)>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    chart.set_on_update(move |id, update| sink.borrow_mut().push((id, update)));
    seen
}

#[test]
fn test_edit_updates_single_point() {
    let mut grid = grid_with_column(&[1.0, 2.0, 3.0]);
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(&column_chart("$A$1:$A$3"), &grid, &registry, &ExtractConfig::default());
    let seen = record_updates(&chart);

    grid.edit("A2", 99.0).unwrap();

    assert_eq!(
        chart.series()[0].borrow().values(),
        vec![Some(1.0), Some(99.0), Some(3.0)]
    );
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1.index, 1);
    assert_eq!(seen[0].1.field, PointField::Value);
    assert_eq!(seen[0].1.value, Some(99.0));
}

#[test]
fn test_edit_outside_range_is_ignored() {
    let mut grid = grid_with_column(&[1.0, 2.0, 3.0]);
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(&column_chart("$A$1:$A$3"), &grid, &registry, &ExtractConfig::default());
    let seen = record_updates(&chart);

    grid.edit("A4", 5.0).unwrap();
    grid.edit("B2", 5.0).unwrap();

    assert!(seen.borrow().is_empty());
    assert_eq!(
        chart.series()[0].borrow().values(),
        vec![Some(1.0), Some(2.0), Some(3.0)]
    );
}

#[test]
fn test_batch_applied_in_host_order() {
    let mut grid = grid_with_column(&[1.0, 2.0, 3.0]);
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(&column_chart("$A$1:$A$3"), &grid, &registry, &ExtractConfig::default());
    let seen = record_updates(&chart);

    grid.edit_many(vec![("A3", CellValue::Int(30)), ("A1", CellValue::Int(10))])
        .unwrap();

    let indices: Vec<usize> = seen.borrow().iter().map(|(_, u)| u.index).collect();
    assert_eq!(indices, vec![2, 0]);
    assert_eq!(
        chart.series()[0].borrow().values(),
        vec![Some(10.0), Some(2.0), Some(30.0)]
    );
}

#[test]
fn test_text_and_blank_edits() {
    let mut grid = grid_with_column(&[1.0, 2.0]);
    let registry = shared_registry(&mut grid);
    let config = ExtractConfig::default().with_display_blanks(DisplayBlanks::Zero);
    let chart = BoundChart::build(&column_chart("$A$1:$A$2"), &grid, &registry, &config);

    grid.edit("A1", "n/a").unwrap();
    grid.edit("A2", CellValue::Empty).unwrap();

    assert_eq!(chart.series()[0].borrow().values(), vec![None, Some(0.0)]);
}

#[test]
fn test_repeated_cell_updates_every_position() {
    let mut grid = grid_with_column(&[1.0, 2.0]);
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(
        &column_chart("($A$1,$A$2,$A$1)"),
        &grid,
        &registry,
        &ExtractConfig::default(),
    );
    let seen = record_updates(&chart);

    grid.edit("A1", 7.0).unwrap();

    assert_eq!(
        chart.series()[0].borrow().values(),
        vec![Some(7.0), Some(2.0), Some(7.0)]
    );
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn test_unqualified_range_stays_on_home_sheet() {
    let mut grid = grid_with_column(&[1.0, 2.0]);
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(&column_chart("$A$1:$A$2"), &grid, &registry, &ExtractConfig::default());

    grid.set_active_sheet("Sheet2");
    grid.edit("A1", 50.0).unwrap();
    assert_eq!(chart.series()[0].borrow().values(), vec![Some(1.0), Some(2.0)]);

    grid.edit("Sheet1!A1", 60.0).unwrap();
    assert_eq!(chart.series()[0].borrow().values(), vec![Some(60.0), Some(2.0)]);
}

#[test]
fn test_qualified_range_on_other_sheet() {
    let mut grid = Grid::new("Sheet1");
    grid.set("Data!B1", 1.0).unwrap();
    grid.set("Data!B2", 2.0).unwrap();
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(
        &column_chart("Data!$B$1:$B$2"),
        &grid,
        &registry,
        &ExtractConfig::default(),
    );
    assert_eq!(chart.series()[0].borrow().values(), vec![Some(1.0), Some(2.0)]);

    grid.edit("B2", 9.0).unwrap();
    assert_eq!(chart.series()[0].borrow().values(), vec![Some(1.0), Some(2.0)]);

    grid.edit("Data!B2", 9.0).unwrap();
    assert_eq!(chart.series()[0].borrow().values(), vec![Some(1.0), Some(9.0)]);
}

#[test]
fn test_stale_reference_freezes_only_that_series() {
    let mut grid = grid_with_column(&[1.0, 2.0]);
    grid.set("B1", 5.0).unwrap();
    let registry = shared_registry(&mut grid);
    let definition = ChartDefinition::new(ChartType::Line)
        .add_series(SeriesDefinition::new().with_values_ref("$A$1:$A$2"))
        .add_series(SeriesDefinition::new().with_values_ref("$B$1"));
    let chart = BoundChart::build(&definition, &grid, &registry, &ExtractConfig::default());
    let ids = chart.series_ids();
    let seen = record_updates(&chart);

    registry
        .borrow_mut()
        .set_formula(ids[0], PointField::Value, "#REF!")
        .unwrap();
    grid.edit_many(vec![("A1", CellValue::Int(100)), ("B1", CellValue::Int(6))])
        .unwrap();

    assert_eq!(registry.borrow().state(ids[0]), Some(BindingState::Stale));
    assert_eq!(registry.borrow().state(ids[1]), Some(BindingState::Live));
    assert_eq!(chart.series()[0].borrow().values(), vec![Some(1.0), Some(2.0)]);
    assert_eq!(chart.series()[1].borrow().values(), vec![Some(6.0)]);
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].0, ids[1]);

    // A stale series stays frozen even for later edits.
    grid.edit("A2", 200.0).unwrap();
    assert_eq!(chart.series()[0].borrow().values(), vec![Some(1.0), Some(2.0)]);
}

#[test]
fn test_configured_delimiter_survives_live_updates() {
    let mut grid = grid_with_column(&[1.0, 2.0]);
    grid.set("C1", 3.0).unwrap();
    let registry = shared_registry(&mut grid);
    let config = ExtractConfig::default().with_union_delimiter(';');
    let chart = BoundChart::build(&column_chart("$A$1:$A$2;$C$1"), &grid, &registry, &config);
    let id = chart.series_ids()[0];
    assert_eq!(
        chart.series()[0].borrow().values(),
        vec![Some(1.0), Some(2.0), Some(3.0)]
    );

    grid.edit("C1", 30.0).unwrap();

    assert_eq!(registry.borrow().state(id), Some(BindingState::Live));
    assert_eq!(
        chart.series()[0].borrow().values(),
        vec![Some(1.0), Some(2.0), Some(30.0)]
    );
    assert_eq!(
        registry.borrow().selection_reference(id).as_deref(),
        Some("Sheet1!$A$1:$A$2;Sheet1!$C$1")
    );
}

#[test]
fn test_rewritten_reference_follows_shifted_rows() {
    let mut grid = grid_with_column(&[1.0, 2.0, 3.0, 4.0]);
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(&column_chart("$A$1:$A$3"), &grid, &registry, &ExtractConfig::default());
    let id = chart.series_ids()[0];
    let seen = record_updates(&chart);

    registry
        .borrow_mut()
        .set_formula(id, PointField::Value, "$A$2:$A$4")
        .unwrap();
    grid.edit("A1", 50.0).unwrap();
    assert!(seen.borrow().is_empty());
    assert_eq!(
        chart.series()[0].borrow().values(),
        vec![Some(1.0), Some(2.0), Some(3.0)]
    );

    grid.edit("A4", 40.0).unwrap();

    assert_eq!(registry.borrow().state(id), Some(BindingState::Live));
    assert_eq!(registry.borrow().formula(id), Some("$A$2:$A$4"));
    assert_eq!(
        chart.series()[0].borrow().values(),
        vec![Some(1.0), Some(2.0), Some(40.0)]
    );
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1.index, 2);
}

#[test]
fn test_scatter_binds_both_axes() {
    let mut grid = Grid::new("Sheet1");
    for row in 1..=3 {
        grid.set(&format!("A{row}"), row as f64).unwrap();
        grid.set(&format!("B{row}"), (row * 10) as f64).unwrap();
    }
    let registry = shared_registry(&mut grid);
    let definition = ChartDefinition::new(ChartType::Scatter)
        .add_series(SeriesDefinition::new().with_xy_refs("$A$1:$A$3", "$B$1:$B$3"));
    let chart = BoundChart::build(&definition, &grid, &registry, &ExtractConfig::default());
    let seen = record_updates(&chart);

    grid.edit_many(vec![("A2", CellValue::Float(2.5)), ("B3", CellValue::Float(33.0))])
        .unwrap();

    let series = chart.series()[0].borrow();
    assert_eq!(series.points()[1].x, Some(2.5));
    assert_eq!(series.points()[2].y, Some(33.0));
    let fields: Vec<PointField> = seen.borrow().iter().map(|(_, u)| u.field).collect();
    assert_eq!(fields, vec![PointField::X, PointField::Value]);
}

#[test]
fn test_stock_close_edit_moves_plotted_value() {
    let mut grid = Grid::new("Sheet1");
    for (row, [o, h, l, c]) in [[10.0, 12.0, 9.0, 11.0], [11.0, 13.0, 10.0, 12.0]].iter().enumerate() {
        for (col, value) in ["A", "B", "C", "D"].iter().zip([o, h, l, c]) {
            grid.set(&format!("{col}{}", row + 1), *value).unwrap();
        }
    }
    let registry = shared_registry(&mut grid);
    let ohlc = OhlcSources {
        open: Some(ValueSource::reference("$A$1:$A$2")),
        high: Some(ValueSource::reference("$B$1:$B$2")),
        low: Some(ValueSource::reference("$C$1:$C$2")),
        close: Some(ValueSource::reference("$D$1:$D$2")),
    };
    let definition =
        ChartDefinition::new(ChartType::Stock).add_series(SeriesDefinition::new().with_ohlc(ohlc));
    let chart = BoundChart::build(&definition, &grid, &registry, &ExtractConfig::default());

    grid.edit("D2", 14.5).unwrap();
    grid.edit("B1", 15.0).unwrap();

    let series = chart.series()[0].borrow();
    assert_eq!(series.values(), vec![Some(11.0), Some(14.5)]);
    let first = series.points()[0].ohlc.unwrap();
    assert_eq!(first.high, Some(15.0));
    assert_eq!(registry.borrow().formula(series.id()), Some("$D$1:$D$2"));
}

#[test]
fn test_literal_series_and_disabled_updates_are_not_bound() {
    let mut grid = grid_with_column(&[1.0, 2.0]);
    let registry = shared_registry(&mut grid);

    let mut literal = SeriesDefinition::new();
    literal.values = Some(ValueSource::Literal(vec![Some(3.0), None]));
    let definition = ChartDefinition::new(ChartType::Line).add_series(literal);
    let chart = BoundChart::build(&definition, &grid, &registry, &ExtractConfig::default());
    assert!(!chart.is_bound(chart.series_ids()[0]));
    assert!(registry.borrow().is_empty());

    let config = ExtractConfig::default().with_live_updates(false);
    let chart = BoundChart::build(&column_chart("$A$1:$A$2"), &grid, &registry, &config);
    assert!(registry.borrow().is_empty());

    grid.edit("A1", 42.0).unwrap();
    assert_eq!(chart.series()[0].borrow().values(), vec![Some(1.0), Some(2.0)]);
}

#[test]
fn test_dispose_and_drop_unbind() {
    let mut grid = grid_with_column(&[1.0, 2.0]);
    let registry = shared_registry(&mut grid);

    let mut chart = BoundChart::build(&column_chart("$A$1:$A$2"), &grid, &registry, &ExtractConfig::default());
    assert_eq!(registry.borrow().len(), 1);
    chart.dispose();
    chart.dispose();
    assert!(registry.borrow().is_empty());

    {
        let _chart = BoundChart::build(&column_chart("$A$1:$A$2"), &grid, &registry, &ExtractConfig::default());
        assert_eq!(registry.borrow().len(), 1);
    }
    assert!(registry.borrow().is_empty());
    grid.edit("A1", 3.0).unwrap();
}

#[test]
fn test_dropped_series_are_pruned() {
    let mut grid = grid_with_column(&[1.0]);
    let registry = shared_registry(&mut grid);
    let id = registry.borrow_mut().allocate_id();
    {
        let series = Rc::new(RefCell::new(crate::charts::SeriesData::new(id, ChartType::Line, Vec::new())));
        assert!(registry.borrow_mut().bind_values(&series, "$A$1", "Sheet1"));
    }
    assert_eq!(registry.borrow().len(), 1);

    grid.edit("A1", 2.0).unwrap();
    assert!(registry.borrow().is_empty());
}

#[test]
fn test_dropped_registry_ignores_edits() {
    let mut grid = grid_with_column(&[1.0]);
    let registry = shared_registry(&mut grid);
    drop(registry);
    assert_eq!(grid.listener_count(), 1);
    grid.edit("A1", 2.0).unwrap();
}

#[test]
fn test_unsubscribe_stops_updates() {
    let mut grid = grid_with_column(&[1.0]);
    let registry = Rc::new(RefCell::new(LiveBindingRegistry::new()));
    let subscription = LiveBindingRegistry::subscribe(&registry, &mut grid);
    let chart = BoundChart::build(&column_chart("$A$1"), &grid, &registry, &ExtractConfig::default());

    assert!(grid.unsubscribe(subscription));
    grid.edit("A1", 2.0).unwrap();
    assert_eq!(chart.series()[0].borrow().values(), vec![Some(1.0)]);
}

#[test]
fn test_point_selection_selects_whole_range() {
    let mut grid = grid_with_column(&[1.0, 2.0, 3.0]);
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(&column_chart("$A$1:$A$3"), &grid, &registry, &ExtractConfig::default());
    let target = Rc::new(RefCell::new(RecordingTarget::default()));
    chart.connect_selection(Rc::clone(&target));

    chart.series()[0].borrow_mut().select(1);

    assert_eq!(target.borrow().selections, vec!["Sheet1!$A$1:$A$3".to_string()]);
}

#[test]
fn test_qualified_selection_is_kept() {
    let mut grid = Grid::new("Sheet1");
    grid.set("'My Data'!C1", 1.0).unwrap();
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(
        &column_chart("'My Data'!$C$1:$C$2"),
        &grid,
        &registry,
        &ExtractConfig::default(),
    );
    let mut target = RecordingTarget::default();
    let bridge = SelectionBridge::new(Rc::clone(&registry));

    bridge.on_point_selected(chart.series_ids()[0], &mut target).unwrap();
    assert_eq!(target.selections, vec!["'My Data'!$C$1:$C$2".to_string()]);
}

#[test]
fn test_selection_of_unknown_series() {
    let registry = Rc::new(RefCell::new(LiveBindingRegistry::new()));
    let bridge = SelectionBridge::new(registry);
    let mut target = RecordingTarget::default();

    let result = bridge.on_point_selected(SeriesId::new(41), &mut target);

    assert_eq!(result, Err(Error::UnknownSeries(SeriesId::new(41))));
    assert!(target.selections.is_empty());
}

#[test]
fn test_selection_while_registry_busy() {
    let mut grid = grid_with_column(&[1.0, 2.0]);
    let registry = shared_registry(&mut grid);
    let chart = BoundChart::build(&column_chart("$A$1:$A$2"), &grid, &registry, &ExtractConfig::default());
    let id = chart.series_ids()[0];
    let bridge = SelectionBridge::new(Rc::clone(&registry));
    let mut target = RecordingTarget::default();

    let guard = registry.borrow_mut();
    let result = bridge.on_point_selected(id, &mut target);
    drop(guard);

    assert_eq!(result, Err(Error::RegistryBusy(id)));
    assert!(target.selections.is_empty());

    bridge.on_point_selected(id, &mut target).unwrap();
    assert_eq!(target.selections, vec!["Sheet1!$A$1:$A$2".to_string()]);
}

#[test]
fn test_unbind_unknown_series() {
    let mut registry = LiveBindingRegistry::new();
    assert_eq!(
        registry.unbind(SeriesId::new(3)),
        Err(Error::UnknownSeries(SeriesId::new(3)))
    );
    assert_eq!(registry.formula(SeriesId::new(3)), None);
}

#[test]
fn test_series_ids_are_unique_across_charts() {
    let mut grid = grid_with_column(&[1.0]);
    let registry = shared_registry(&mut grid);
    let first = BoundChart::build(&column_chart("$A$1"), &grid, &registry, &ExtractConfig::default());
    let second = BoundChart::build(&column_chart("$A$1"), &grid, &registry, &ExtractConfig::default());
    assert_ne!(first.series_ids(), second.series_ids());
    assert_eq!(registry.borrow().len(), 2);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_live_values_match_fresh_extraction(
            edits in prop::collection::vec((0usize..8, -1000i64..1000), 1..20),
        ) {
            let mut grid = grid_with_column(&[0.0; 6]);
            let registry = shared_registry(&mut grid);
            let definition = column_chart("$A$1:$A$6");
            let chart = BoundChart::build(&definition, &grid, &registry, &ExtractConfig::default());

            for (row, value) in &edits {
                grid.edit(&format!("A{}", row + 1), CellValue::Int(*value)).unwrap();
            }

            let fresh = BoundChart::build(
                &definition,
                &grid,
                &registry,
                &ExtractConfig::default().with_live_updates(false),
            );
            prop_assert_eq!(
                chart.series()[0].borrow().values(),
                fresh.series()[0].borrow().values()
            );
        }
    }
}
