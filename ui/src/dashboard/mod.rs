//! Interactive dashboard: chart-type selector, cascading controls, the active
//! chart with its legends and a summary table.
//!
//! All state lives in signals owned by [`BenchmarkDashboard`]. Queries run on spawned
//! tasks; each response is applied only if its ticket is still current, so
//! a slow answer to an abandoned selection never overwrites a newer one.

mod bar_chart;
mod colors;
mod composer;
mod controls;
mod export;
mod legend;
mod line_chart;
mod metric_table;
mod status;
mod summary_table;
mod utils;

use std::{collections::HashMap, rc::Rc};

pub use bar_chart::BarChart;
pub use colors::ColorScale;
pub use composer::SeriesComposerPanel;
pub use controls::{ChartTypeSelector, ControlBar};
pub use export::{chart_csv, ExportPanel};
pub use legend::LegendPanel;
pub use line_chart::{HistoryChart, LineChart};
pub use metric_table::MetricTableView;
pub use status::QueryStatus;
pub use summary_table::SummaryTable;

use dioxus::prelude::*;

use crate::{
    charts::{view_for, AxisId, Chart, ChartKind, ChartView, Choices, Control, OptionSource},
    core::config::{self, DashboardConfig},
    query::{self, QueryAdapter, RequestGeneration, ValueQuery},
};

/// Signals and request guards shared by the dashboard's event handlers.
#[derive(Clone)]
struct DashboardState {
    config: Rc<DashboardConfig>,
    adapter: Signal<Option<Rc<dyn QueryAdapter>>>,
    view: Signal<Box<dyn ChartView>>,
    choices: Signal<Choices>,
    options: Signal<HashMap<Control, Vec<String>>>,
    colors: Signal<ColorScale>,
    status: Signal<QueryStatus>,
    option_requests: RequestGeneration,
    chart_requests: RequestGeneration,
}

impl DashboardState {
    /// Fetch the options of `control`, or drop them while its upstream is unset.
    fn load_options(&self, control: Control) {
        let source = self.view.read().options(control, &self.choices.read());
        let mut options = self.options;
        match source {
            None => {
                options.write().remove(&control);
            }
            Some(OptionSource::Static(values)) => {
                options.write().insert(control, values);
            }
            Some(OptionSource::Query { query, derive }) => {
                let Some(adapter) = self.adapter.read().clone() else {
                    return;
                };
                let requests = self.option_requests.clone();
                let ticket = requests.issue();
                let mut status = self.status;
                tracing::debug!(?control, "loading options");
                spawn(async move {
                    let result = adapter.distinct(&query).await;
                    if !requests.is_current(ticket) {
                        tracing::debug!(?control, "discarding stale options");
                        return;
                    }
                    match result {
                        Ok(values) => {
                            options.write().insert(control, derive.apply(values));
                        }
                        Err(err) => {
                            tracing::error!(?control, "options query failed: {err}");
                            status.write().failed(err.to_string());
                        }
                    }
                });
            }
        }
    }

    fn select(&self, control: Control, value: String) {
        let (mut choices, mut options) = (self.choices, self.options);
        let cleared = choices.write().select(control, value);
        {
            let mut options = options.write();
            for control in &cleared {
                options.remove(control);
            }
        }
        let next = self.choices.read().next(control);
        if let Some(next) = next {
            self.load_options(next);
        }

        let mut view = self.view;
        let query = view.write().on_select(control, &self.choices.read());
        let mut status = self.status;
        status.write().selected();
        match query {
            Some(query) => self.run(query),
            None => self.chart_requests.invalidate(),
        }
    }

    fn run(&self, query: ValueQuery) {
        let Some(adapter) = self.adapter.read().clone() else {
            return;
        };
        let requests = self.chart_requests.clone();
        let ticket = requests.issue();
        let (mut view, mut status) = (self.view, self.status);
        status.write().started();
        tracing::debug!(table = ?query.table, builds = ?query.builds, "running value query");
        spawn(async move {
            let result = adapter.values(&query).await;
            if !requests.is_current(ticket) {
                tracing::debug!("discarding stale rows");
                return;
            }
            match result {
                Ok(rows) => {
                    tracing::debug!(rows = rows.len(), "rows received");
                    status.write().answered();
                    view.write().on_rows(rows);
                }
                Err(err) => {
                    tracing::error!("value query failed: {err}");
                    status.write().failed(err.to_string());
                    view.write().clear();
                }
            }
        });
    }

    /// Replace the active view and start over from its first control.
    fn switch(&self, kind: ChartKind) {
        self.option_requests.invalidate();
        self.chart_requests.invalidate();
        let view = view_for(kind, &self.config);
        let controls = view.controls();
        let (mut view_signal, mut choices, mut options) = (self.view, self.choices, self.options);
        let mut status = self.status;
        view_signal.set(view);
        choices.set(Choices::new(controls));
        options.write().clear();
        status.write().reset();
        tracing::info!(chart = kind.slug(), "chart type changed");
        if let Some(first) = controls.first() {
            self.load_options(*first);
        }
    }
}

#[component]
pub fn BenchmarkDashboard() -> Element {
    let config = use_hook(|| Rc::new(config::current()));
    let initial = ChartKind::default();
    let adapter = use_signal(|| None::<Rc<dyn QueryAdapter>>);
    let view = use_signal({
        let config = config.clone();
        move || view_for(initial, &config)
    });
    let choices = use_signal(|| Choices::new(view.peek().controls()));
    let options = use_signal(HashMap::<Control, Vec<String>>::new);
    let colors = use_signal(ColorScale::default);
    let status = use_signal(QueryStatus::default);
    let option_requests = use_hook(RequestGeneration::new);
    let chart_requests = use_hook(RequestGeneration::new);

    let state = DashboardState {
        config: config.clone(),
        adapter,
        view,
        choices,
        options,
        colors,
        status,
        option_requests,
        chart_requests,
    };

    use_hook({
        let state = state.clone();
        move || {
            spawn(async move {
                let (mut adapter, mut colors, mut status) = (state.adapter, state.colors, state.status);
                match query::connect(&state.config.data_source).await {
                    Ok(connected) => {
                        match query::all_libraries(&*connected).await {
                            Ok(libraries) => colors.write().extend(libraries),
                            Err(err) => tracing::warn!("could not seed library colours: {err}"),
                        }
                        adapter.set(Some(connected));
                        let first = state.view.peek().controls().first().copied();
                        if let Some(first) = first {
                            state.load_options(first);
                        }
                    }
                    Err(err) => {
                        tracing::error!("could not open data source: {err}");
                        status.write().failed(err.to_string());
                    }
                }
            })
        }
    });

    let active = view.read();
    let kind = active.kind();
    let controls = active.controls().to_vec();
    let legends = active.legends();
    let chart = active.build();
    // The metric table prints its own notice.
    let no_rows = chart.is_blank() && !matches!(chart, Chart::Table(_));
    let has_composer = active.composer().is_some();
    drop(active);
    let QueryStatus { error, loading } = status();

    let series_keys: Vec<String> = view.read().state().series.values().to_vec();
    let palette = colors.read().with(&series_keys);
    let layout = config.chart;
    let series_colors = legends
        .iter()
        .map(|legend| (legend.axis == AxisId::Series).then(|| palette.clone()))
        .collect::<Vec<_>>();

    let on_kind = {
        let state = state.clone();
        move |kind: ChartKind| state.switch(kind)
    };
    let on_select = {
        let state = state.clone();
        move |(control, value): (Control, String)| state.select(control, value)
    };

    rsx! {
        section { class: "dashboard",
            div { class: "dashboard__controls",
                ChartTypeSelector { current: kind, on_change: on_kind }
                ControlBar {
                    controls,
                    choices: choices(),
                    options: options(),
                    on_select,
                }
            }

            if let Some(message) = error {
                div { class: "dashboard-card dashboard-card--error",
                    h3 { {crate::t!("dashboard-error-title")} }
                    p { "{message}" }
                }
            } else {
                div { class: "dashboard__body",
                    div { class: "dashboard__chart",
                        if loading {
                            p { class: "dashboard-card__meta", {crate::t!("dashboard-loading")} }
                        } else if no_rows {
                            p { class: "dashboard-card__meta", {crate::t!("dashboard-no-rows")} }
                        }
                        {render_chart(chart.clone(), palette.clone(), layout)}
                        ExportPanel { chart: chart.clone(), slug: kind.slug().to_string() }
                    }
                    aside { class: "dashboard__legends",
                        if has_composer {
                            SeriesComposerPanel { view }
                        }
                        for (i, (legend, colors)) in legends.iter().zip(series_colors).enumerate() {
                            LegendPanel { key: "{i}", view, legend: *legend, colors }
                        }
                    }
                }
                {render_summary(chart)}
            }
        }
    }
}

fn render_chart(chart: Chart, colors: ColorScale, layout: config::ChartLayout) -> Element {
    match chart {
        Chart::Empty => rsx! {
            p { class: "dashboard-card__placeholder", {crate::t!("dashboard-empty")} }
        },
        Chart::Bars { model, scale } => rsx! {
            BarChart { model, scale, colors, layout }
        },
        Chart::Lines { model, scale } => rsx! {
            LineChart { model, scale, colors, layout }
        },
        Chart::History(model) => rsx! {
            HistoryChart { model, colors, layout }
        },
        Chart::Table(table) => rsx! {
            MetricTableView { table, colors }
        },
    }
}

fn render_summary(chart: Chart) -> Element {
    match chart {
        Chart::Bars { model, scale } | Chart::Lines { model, scale } => rsx! {
            SummaryTable { model, scale }
        },
        _ => rsx! {},
    }
}
