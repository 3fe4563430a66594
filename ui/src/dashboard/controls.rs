use std::collections::HashMap;

use dioxus::prelude::*;

use crate::charts::{ChartKind, Choices, Control};

use super::utils::{chart_label, control_label, option_label};

#[component]
pub fn ChartTypeSelector(current: ChartKind, on_change: EventHandler<ChartKind>) -> Element {
    rsx! {
        label { class: "dashboard-control dashboard-control--chart",
            span { class: "dashboard-control__label", {crate::t!("control-chart-type")} }
            select {
                class: "dashboard-control__select",
                value: "{current.slug()}",
                oninput: move |evt: Event<FormData>| {
                    match ChartKind::from_slug(&evt.value()) {
                        Some(kind) => on_change.call(kind),
                        None => tracing::warn!(value = %evt.value(), "unknown chart type"),
                    }
                },
                for kind in ChartKind::ALL {
                    option {
                        key: "{kind.slug()}",
                        value: "{kind.slug()}",
                        selected: kind == current,
                        {chart_label(kind)}
                    }
                }
            }
        }
    }
}

/// Cascading selects. A control stays disabled until its options arrive.
#[component]
pub fn ControlBar(
    controls: Vec<Control>,
    choices: Choices,
    options: HashMap<Control, Vec<String>>,
    on_select: EventHandler<(Control, String)>,
) -> Element {
    rsx! {
        div { class: "dashboard-controls",
            for control in controls {
                {render_control(control, choices.get(control), options.get(&control), on_select)}
            }
        }
    }
}

fn render_control(
    control: Control,
    current: Option<&str>,
    values: Option<&Vec<String>>,
    on_select: EventHandler<(Control, String)>,
) -> Element {
    let values = values.cloned().unwrap_or_default();
    let disabled = values.is_empty();
    let current = current.map(str::to_string);
    let placeholder_selected = current.is_none();

    rsx! {
        label { class: "dashboard-control",
            span { class: "dashboard-control__label", {control_label(control)} }
            select {
                class: "dashboard-control__select",
                disabled,
                oninput: move |evt: Event<FormData>| on_select.call((control, evt.value())),
                option {
                    value: "",
                    disabled: true,
                    selected: placeholder_selected,
                    {crate::t!("control-placeholder")}
                }
                for value in values {
                    option {
                        key: "{value}",
                        value: "{value}",
                        selected: current.as_deref() == Some(value.as_str()),
                        {option_label(control, &value)}
                    }
                }
            }
        }
    }
}
