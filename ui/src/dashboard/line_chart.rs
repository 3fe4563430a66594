use dioxus::prelude::*;

use crate::{
    charts::ValueScale,
    core::{
        config::ChartLayout,
        format::{format_build_time, format_runtime, format_si, ticks},
        history::HistoryModel,
        measurement::Measurement,
        view_model::ViewModel,
    },
};

use super::{bar_chart::tooltip, colors::ColorScale};

const TICK_COUNT: usize = 5;
const TIME_TICKS: usize = 6;
const POINT_RADIUS: f64 = 3.5;

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: f64,
    y: f64,
    class: &'static str,
    title: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    series: String,
    color: &'static str,
    path: String,
    points: Vec<Point>,
}

fn path(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .enumerate()
        .map(|(i, (x, y))| format!("{}{x:.2},{y:.2}", if i == 0 { 'M' } else { 'L' }))
        .collect()
}

fn point_class(value: Measurement) -> &'static str {
    match value {
        Measurement::Exceeded => "point point--exceeded",
        Measurement::Failed => "point point--failed",
        _ => "point",
    }
}

/// Category positions on the x axis, centred in equal steps.
fn category_x(count: usize, width: f64) -> Vec<f64> {
    let step = if count == 0 { 0.0 } else { width / count as f64 };
    (0..count).map(|i| step * (i as f64 + 0.5)).collect()
}

fn value_ticks(ceiling: f64, height: f64) -> Vec<(String, f64)> {
    ticks(ceiling, TICK_COUNT)
        .into_iter()
        .map(|tick| (format_si(tick), height - tick / ceiling * height))
        .collect()
}

fn layout_lines(
    model: &ViewModel,
    scale: ValueScale,
    colors: &ColorScale,
    width: f64,
    height: f64,
) -> Vec<Line> {
    let xs = category_x(model.matrix.len(), width);
    model
        .series_domain
        .iter()
        .enumerate()
        .map(|(index, series)| {
            let mut vertices = Vec::new();
            let mut points = Vec::new();
            for (row, x) in model.matrix.iter().zip(&xs) {
                let Some(cell) = row.cells.get(index) else {
                    continue;
                };
                let Some(plot) = cell.value.plot_value(model.value_ceiling) else {
                    continue;
                };
                let y = height - plot / model.value_ceiling * height;
                if cell.value.is_finite() {
                    vertices.push((*x, y));
                }
                points.push(Point {
                    x: *x,
                    y,
                    class: point_class(cell.value),
                    title: format!("{series} · {}: {}", row.category, tooltip(cell.value, scale)),
                });
            }
            Line {
                series: series.clone(),
                color: colors.color(series),
                path: path(&vertices),
                points,
            }
        })
        .collect()
}

/// One line per composed series over the category axis.
#[component]
pub fn LineChart(
    model: ViewModel,
    scale: ValueScale,
    colors: ColorScale,
    layout: ChartLayout,
) -> Element {
    let width = layout.width;
    let height = layout.height;
    let lines = layout_lines(&model, scale, &colors, width, height);
    let labels: Vec<(String, f64)> = model
        .category_domain
        .iter()
        .cloned()
        .zip(category_x(model.category_domain.len(), width))
        .collect();
    let y_ticks = value_ticks(model.value_ceiling, height);

    rsx! {
        svg {
            class: "chart chart--lines",
            width: "{layout.outer_width()}",
            height: "{layout.outer_height()}",
            g { transform: "translate({layout.margin.left},{layout.margin.top})",
                {render_value_axis(y_ticks, width)}
                g { class: "axis axis--x", transform: "translate(0,{height})",
                    line { x2: "{width}" }
                    for (label, x) in labels {
                        text { key: "{label}", x: "{x}", y: "18", text_anchor: "middle", "{label}" }
                    }
                }
                for line in lines {
                    {render_line(line)}
                }
            }
        }
    }
}

struct HistoryShapes {
    lines: Vec<Line>,
    failures: Vec<Point>,
}

fn layout_history(
    model: &HistoryModel,
    colors: &ColorScale,
    width: f64,
    height: f64,
) -> HistoryShapes {
    let mut failures = Vec::new();
    let lines = model
        .lines
        .iter()
        .map(|polyline| {
            let points: Vec<Point> = polyline
                .points
                .iter()
                .map(|point| Point {
                    x: model.x_fraction(point.timestamp) * width,
                    y: height - point.plot / model.value_ceiling * height,
                    class: if point.is_clamped() {
                        "point point--exceeded"
                    } else {
                        "point"
                    },
                    title: format!(
                        "{} · #{} {}: {}",
                        polyline.series,
                        point.build_id,
                        format_build_time(point.timestamp),
                        format_runtime(point.value)
                    ),
                })
                .collect();
            failures.extend(polyline.failures.iter().map(|marker| Point {
                x: model.x_fraction(marker.timestamp) * width,
                y: height,
                class: "point point--failed",
                title: format!(
                    "{} · #{} {}: {}",
                    polyline.series,
                    marker.build_id,
                    format_build_time(marker.timestamp),
                    format_runtime(Measurement::Failed)
                ),
            }));
            let vertices: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
            Line {
                series: polyline.series.clone(),
                color: colors.color(&polyline.series),
                path: path(&vertices),
                points,
            }
        })
        .collect();
    HistoryShapes { lines, failures }
}

/// Runtime of every build over time, one line per library.
#[component]
pub fn HistoryChart(model: HistoryModel, colors: ColorScale, layout: ChartLayout) -> Element {
    let width = layout.width;
    let height = layout.height;
    let HistoryShapes { lines, failures } = layout_history(&model, &colors, width, height);
    let y_ticks = value_ticks(model.value_ceiling, height);
    let time_labels: Vec<(String, f64)> = match model.time_domain {
        Some((start, end)) => {
            let span = end - start;
            (0..TIME_TICKS)
                .map(|i| {
                    let fraction = if TIME_TICKS > 1 {
                        i as f64 / (TIME_TICKS - 1) as f64
                    } else {
                        0.0
                    };
                    let at = start + span * fraction;
                    (format_build_time(at), model.x_fraction(at) * width)
                })
                .collect()
        }
        None => Vec::new(),
    };

    rsx! {
        svg {
            class: "chart chart--history",
            width: "{layout.outer_width()}",
            height: "{layout.outer_height()}",
            g { transform: "translate({layout.margin.left},{layout.margin.top})",
                {render_value_axis(y_ticks, width)}
                g { class: "axis axis--x", transform: "translate(0,{height})",
                    line { x2: "{width}" }
                    for (label, x) in time_labels {
                        text {
                            key: "{x}",
                            transform: "translate({x},9) rotate(-65)",
                            text_anchor: "end",
                            "{label}"
                        }
                    }
                }
                for line in lines {
                    {render_line(line)}
                }
                for (i, marker) in failures.into_iter().enumerate() {
                    text {
                        key: "failure-{i}",
                        class: marker.class,
                        x: "{marker.x}",
                        y: "{marker.y}",
                        text_anchor: "middle",
                        "✕"
                        title { "{marker.title}" }
                    }
                }
            }
        }
    }
}

fn render_value_axis(y_ticks: Vec<(String, f64)>, width: f64) -> Element {
    rsx! {
        g { class: "axis axis--y",
            for (label, y) in y_ticks {
                g { key: "{label}", transform: "translate(0,{y})",
                    line { x2: "{width}", class: "grid-line" }
                    text { x: "-6", dy: "0.32em", text_anchor: "end", "{label}" }
                }
            }
        }
    }
}

fn render_line(line: Line) -> Element {
    let Line {
        series,
        color,
        path,
        points,
    } = line;
    rsx! {
        g { key: "{series}", class: "series",
            path { class: "line", d: "{path}", stroke: color, fill: "none" }
            for (i, point) in points.into_iter().enumerate() {
                circle {
                    key: "{i}",
                    class: point.class,
                    cx: "{point.x}",
                    cy: "{point.y}",
                    r: "{POINT_RADIUS}",
                    fill: color,
                    title { "{point.title}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view_model::{Cell, MatrixRow};

    #[test]
    fn sentinels_are_marked_but_not_joined() {
        let model = ViewModel {
            observations: Vec::new(),
            category_domain: vec!["2".into(), "10".into()],
            series_domain: vec!["mlpack".into()],
            value_ceiling: 1.0,
            matrix: vec![
                MatrixRow {
                    category: "2".into(),
                    cells: vec![Cell { series: "mlpack".into(), value: Measurement::Finite(0.5) }],
                },
                MatrixRow {
                    category: "10".into(),
                    cells: vec![Cell { series: "mlpack".into(), value: Measurement::Failed }],
                },
            ],
        };
        let lines = layout_lines(&model, ValueScale::Score, &ColorScale::default(), 200.0, 100.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points.len(), 2);
        assert_eq!(lines[0].path, "M50.00,50.00");
        assert_eq!(lines[0].points[1].class, "point point--failed");
    }

    #[test]
    fn path_joins_vertices() {
        assert_eq!(path(&[(0.0, 1.0), (2.0, 3.0)]), "M0.00,1.00L2.00,3.00");
        assert_eq!(path(&[]), "");
    }
}
