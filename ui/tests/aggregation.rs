//! End-to-end runs from a database snapshot through a chart view to the
//! model it draws.

use futures::executor::block_on;
use ui::charts::{view_for, AxisId, Chart, ChartKind, ChartView, Choices, Control, OptionSource};
use ui::core::{DashboardConfig, Measurement};
use ui::query::{QueryAdapter, RequestGeneration, SnapshotAdapter};

const SNAPSHOT: &str = r#"{
    "libraries": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}],
    "datasets": [
        {"id": 1, "name": "iris", "size": 4, "attributes": 4, "instances": 150},
        {"id": 2, "name": "wine", "size": 10, "attributes": 13, "instances": 178}
    ],
    "methods": [{"id": 1, "name": "kmeans", "parameters": "-c 3"}],
    "builds": [
        {"id": 1, "build": "2014-01-01 00:00:00", "libary_id": 1},
        {"id": 2, "build": "2014-01-01 00:00:00", "libary_id": 2},
        {"id": 3, "build": "2014-02-01 00:00:00", "libary_id": 1}
    ],
    "results": [
        {"id": 1, "build_id": 1, "libary_id": 1, "dataset_id": 1, "method_id": 1, "time": 2.0, "var": 0},
        {"id": 2, "build_id": 1, "libary_id": 1, "dataset_id": 2, "method_id": 1, "time": 3.4, "var": 0},
        {"id": 3, "build_id": 2, "libary_id": 2, "dataset_id": 1, "method_id": 1, "time": -2, "var": 0},
        {"id": 4, "build_id": 2, "libary_id": 2, "dataset_id": 2, "method_id": 1, "time": 0.8, "var": 0},
        {"id": 5, "build_id": 3, "libary_id": 1, "dataset_id": 1, "method_id": 1, "time": 1.2, "var": 0}
    ]
}"#;

fn adapter() -> SnapshotAdapter {
    SnapshotAdapter::from_json(SNAPSHOT).expect("fixture snapshot parses")
}

/// Fetch the options of `control` the way the dashboard does.
fn options(adapter: &SnapshotAdapter, view: &dyn ChartView, control: Control, choices: &Choices) -> Vec<String> {
    match view.options(control, choices) {
        Some(OptionSource::Static(values)) => values,
        Some(OptionSource::Query { query, derive }) => {
            derive.apply(block_on(adapter.distinct(&query)).expect("distinct query"))
        }
        None => Vec::new(),
    }
}

/// Pick every control in order, running the final query.
fn drive(adapter: &SnapshotAdapter, view: &mut dyn ChartView, picks: &[(Control, &str)]) {
    let mut choices = Choices::new(view.controls());
    for (control, value) in picks {
        assert!(
            options(adapter, view, *control, &choices).iter().any(|v| v == value),
            "{value} offered for {control:?}"
        );
        choices.select(*control, *value);
        if let Some(query) = view.on_select(*control, &choices) {
            let rows = block_on(adapter.values(&query)).expect("value query");
            view.on_rows(rows);
        }
    }
}

#[test]
fn runtime_comparison_uses_latest_build_and_keeps_sentinels() {
    let adapter = adapter();
    let mut view = view_for(ChartKind::RuntimeComparison, &DashboardConfig::default());
    drive(
        &adapter,
        view.as_mut(),
        &[(Control::Method, "kmeans"), (Control::Parameters, "-c 3")],
    );

    let Chart::Bars { model, .. } = view.build() else {
        panic!("expected bars");
    };
    assert_eq!(model.category_domain, ["wine", "iris"]);
    assert_eq!(model.series_domain, ["A", "B"]);
    assert_eq!(model.value_ceiling, 3.4);

    let iris = &model.matrix[1];
    assert_eq!(iris.category, "iris");
    assert_eq!(iris.cells[0].value, Measurement::Finite(1.2));
    assert_eq!(iris.cells[1].value, Measurement::Exceeded);
}

#[test]
fn hiding_a_library_rescales_the_chart() {
    let adapter = adapter();
    let mut view = view_for(ChartKind::RuntimeComparison, &DashboardConfig::default());
    drive(
        &adapter,
        view.as_mut(),
        &[(Control::Method, "kmeans"), (Control::Parameters, "-c 3")],
    );

    assert_eq!(view.toggle(AxisId::Series, "A"), Ok(false));
    let Chart::Bars { model, .. } = view.build() else {
        panic!("expected bars");
    };
    assert_eq!(model.series_domain, ["B"]);
    assert_eq!(model.value_ceiling, 0.8);

    view.set_all(AxisId::Series, false);
    let Chart::Bars { model, .. } = view.build() else {
        panic!("expected bars");
    };
    assert!(model.series_domain.is_empty());
    assert_eq!(model.value_ceiling, ui::core::view_model::MIN_CEILING);
}

#[test]
fn historical_comparison_draws_every_build() {
    let adapter = adapter();
    let mut view = view_for(ChartKind::HistoricalComparison, &DashboardConfig::default());
    drive(
        &adapter,
        view.as_mut(),
        &[
            (Control::Method, "kmeans"),
            (Control::Parameters, "-c 3"),
            (Control::Dataset, "iris"),
        ],
    );

    let Chart::History(model) = view.build() else {
        panic!("expected history");
    };
    let names: Vec<&str> = model.lines.iter().map(|l| l.series.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
    let builds: Vec<i64> = model.lines[0].points.iter().map(|p| p.build_id).collect();
    assert_eq!(builds, [1, 3]);
    assert_eq!(model.value_ceiling, 2.0);
    assert_eq!(model.lines[1].points[0].plot, 2.0);
}

#[test]
fn changing_an_upstream_control_clears_the_chart() {
    let adapter = adapter();
    let mut view = view_for(ChartKind::HistoricalComparison, &DashboardConfig::default());
    let mut choices = Choices::new(view.controls());
    for (control, value) in [
        (Control::Method, "kmeans"),
        (Control::Parameters, "-c 3"),
        (Control::Dataset, "wine"),
    ] {
        choices.select(control, value);
        if let Some(query) = view.on_select(control, &choices) {
            view.on_rows(block_on(adapter.values(&query)).unwrap());
        }
    }
    assert!(matches!(view.build(), Chart::History(_)));

    let cleared = choices.select(Control::Parameters, "-c 3");
    assert_eq!(cleared, [Control::Dataset]);
    assert!(view.on_select(Control::Parameters, &choices).is_none());
    assert_eq!(view.build(), Chart::Empty);
}

#[test]
fn stale_responses_are_discarded() {
    let adapter = adapter();
    let requests = RequestGeneration::new();
    let mut view = view_for(ChartKind::RuntimeComparison, &DashboardConfig::default());
    let mut choices = Choices::new(view.controls());
    choices.select(Control::Method, "kmeans");
    view.on_select(Control::Method, &choices);
    choices.select(Control::Parameters, "-c 3");
    let query = view.on_select(Control::Parameters, &choices).unwrap();

    let stale = requests.issue();
    let stale_rows = block_on(adapter.values(&query)).unwrap();
    let fresh = requests.issue();
    let fresh_rows = block_on(adapter.values(&query)).unwrap();

    for (ticket, rows) in [(fresh, fresh_rows), (stale, stale_rows)] {
        if requests.is_current(ticket) {
            view.on_rows(rows);
        }
    }
    assert!(matches!(view.build(), Chart::Bars { .. }));

    requests.invalidate();
    assert!(!requests.is_current(fresh));
}

#[test]
fn datasize_options_are_static_sort_keys() {
    let adapter = adapter();
    let view = view_for(ChartKind::DatasizeComparison, &DashboardConfig::default());
    let mut choices = Choices::new(view.controls());
    choices.select(Control::Method, "kmeans");
    choices.select(Control::Parameters, "-c 3");
    let sort_keys = options(&adapter, view.as_ref(), Control::SortBy, &choices);
    assert_eq!(sort_keys.len(), 3);
    assert!(sort_keys.iter().any(|key| key == "size"));
}

#[test]
fn a_query_without_rows_draws_an_empty_frame() {
    let adapter = adapter();
    let mut view = view_for(ChartKind::RuntimeComparison, &DashboardConfig::default());
    let mut choices = Choices::new(view.controls());
    choices.select(Control::Method, "kmeans");
    view.on_select(Control::Method, &choices);
    assert_eq!(view.build(), Chart::Empty);

    choices.select(Control::Parameters, "-c 9");
    let query = view.on_select(Control::Parameters, &choices).unwrap();
    let rows = block_on(adapter.values(&query)).unwrap();
    assert!(rows.is_empty());
    view.on_rows(rows);

    let chart = view.build();
    assert!(chart.is_blank());
    let Chart::Bars { model, .. } = chart else {
        panic!("expected an empty bar frame");
    };
    assert!(model.matrix.is_empty());
    assert_eq!(model.value_ceiling, ui::core::view_model::MIN_CEILING);
}
