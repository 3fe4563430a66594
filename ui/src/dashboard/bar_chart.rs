use dioxus::prelude::*;

use crate::{
    charts::ValueScale,
    core::{
        config::ChartLayout,
        format::{format_runtime, format_score, format_si, ticks},
        measurement::Measurement,
        view_model::ViewModel,
    },
};

use super::colors::ColorScale;

const BAND_PADDING: f64 = 0.1;
const TICK_COUNT: usize = 5;
/// Height of the stub drawn for a failed run, which has no bar of its own.
const FAILED_STUB: f64 = 2.0;

/// Evenly split `extent` into `count` padded bands; returns (start, width).
pub(crate) fn bands(count: usize, extent: f64) -> Vec<(f64, f64)> {
    if count == 0 {
        return Vec::new();
    }
    let step = extent / count as f64;
    let width = step * (1.0 - BAND_PADDING);
    (0..count)
        .map(|i| (i as f64 * step + step * BAND_PADDING / 2.0, width))
        .collect()
}

pub(crate) fn tooltip(value: Measurement, scale: ValueScale) -> String {
    match scale {
        ValueScale::Runtime => format_runtime(value),
        ValueScale::Score => format_score(value),
    }
}

fn bar_class(value: Measurement) -> &'static str {
    match value {
        Measurement::Finite(_) => "bar",
        Measurement::Exceeded => "bar bar--exceeded",
        Measurement::Failed => "bar bar--failed",
        Measurement::NotRun => "bar bar--not-run",
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BarShape {
    key: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    class: &'static str,
    fill: &'static str,
    title: String,
}

fn layout_bars(
    model: &ViewModel,
    scale: ValueScale,
    colors: &ColorScale,
    width: f64,
    height: f64,
) -> Vec<BarShape> {
    let groups = bands(model.matrix.len(), width);
    let mut shapes = Vec::new();
    for (row, (group_x, group_width)) in model.matrix.iter().zip(groups) {
        let slots = bands(row.cells.len(), group_width);
        for (cell, (slot_x, slot_width)) in row.cells.iter().zip(slots) {
            let Some(plot) = cell.value.plot_value(model.value_ceiling) else {
                continue;
            };
            let mut bar_height = plot / model.value_ceiling * height;
            if cell.value == Measurement::Failed {
                bar_height = FAILED_STUB;
            }
            shapes.push(BarShape {
                key: format!("{}/{}", row.category, cell.series),
                x: group_x + slot_x,
                y: height - bar_height,
                width: slot_width,
                height: bar_height,
                class: bar_class(cell.value),
                fill: colors.color(&cell.series),
                title: format!("{} · {}: {}", row.category, cell.series, tooltip(cell.value, scale)),
            });
        }
    }
    shapes
}

/// Grouped bars: one group per category, one bar per active series.
#[component]
pub fn BarChart(
    model: ViewModel,
    scale: ValueScale,
    colors: ColorScale,
    layout: ChartLayout,
) -> Element {
    let width = layout.width;
    let height = layout.height;
    let shapes = layout_bars(&model, scale, &colors, width, height);
    let groups = bands(model.category_domain.len(), width);
    let labels: Vec<(String, f64)> = model
        .category_domain
        .iter()
        .zip(groups)
        .map(|(category, (x, w))| (category.clone(), x + w / 2.0))
        .collect();
    let value_ticks: Vec<(String, f64)> = ticks(model.value_ceiling, TICK_COUNT)
        .into_iter()
        .map(|tick| (format_si(tick), height - tick / model.value_ceiling * height))
        .collect();
    let axis_title = match scale {
        ValueScale::Runtime => crate::t!("axis-runtime"),
        ValueScale::Score => crate::t!("axis-score"),
    };

    rsx! {
        svg {
            class: "chart chart--bars",
            width: "{layout.outer_width()}",
            height: "{layout.outer_height()}",
            g { transform: "translate({layout.margin.left},{layout.margin.top})",
                g { class: "axis axis--y",
                    for (label, y) in value_ticks {
                        g { key: "{label}", transform: "translate(0,{y})",
                            line { x2: "{width}", class: "grid-line" }
                            text { x: "-6", dy: "0.32em", text_anchor: "end", "{label}" }
                        }
                    }
                    text {
                        transform: "rotate(-90)",
                        y: "6",
                        dy: "0.71em",
                        text_anchor: "end",
                        "{axis_title}"
                    }
                }
                g { class: "axis axis--x", transform: "translate(0,{height})",
                    line { x2: "{width}" }
                    for (label, x) in labels {
                        text {
                            key: "{label}",
                            transform: "translate({x},9) rotate(-65)",
                            text_anchor: "end",
                            dy: "0.35em",
                            "{label}"
                        }
                    }
                }
                for shape in shapes {
                    rect {
                        key: "{shape.key}",
                        class: shape.class,
                        x: "{shape.x}",
                        y: "{shape.y}",
                        width: "{shape.width}",
                        height: "{shape.height}",
                        fill: shape.fill,
                        title { "{shape.title}" }
                    }
                }
            }
        }
    }
}
