use dioxus::prelude::*;

use crate::charts::{ChartView, Legend};

use super::{colors::ColorScale, utils::legend_label};

/// Checkbox list over one axis of the active view.
#[component]
pub fn LegendPanel(
    mut view: Signal<Box<dyn ChartView>>,
    legend: Legend,
    colors: Option<ColorScale>,
) -> Element {
    let entries: Vec<(String, bool)> = view
        .read()
        .state()
        .axis(legend.axis)
        .entries()
        .map(|(value, active)| (value.to_string(), active))
        .collect();

    if entries.is_empty() {
        return rsx! {};
    }

    let axis = legend.axis;

    rsx! {
        section { class: "dashboard-legend",
            h3 { class: "dashboard-legend__title", {legend_label(legend.label)} }
            div { class: "dashboard-legend__actions",
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: move |_| view.write().set_all(axis, true),
                    {crate::t!("legend-enable-all")}
                }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: move |_| view.write().set_all(axis, false),
                    {crate::t!("legend-disable-all")}
                }
            }
            ul { class: "dashboard-legend__items",
                for (value, active) in entries {
                    li { key: "{value}", class: "dashboard-legend__item",
                        label {
                            input {
                                r#type: "checkbox",
                                checked: active,
                                onchange: {
                                    let value = value.clone();
                                    move |_| {
                                        if let Err(err) = view.write().toggle(axis, &value) {
                                            tracing::error!("legend out of sync: {err}");
                                        }
                                    }
                                },
                            }
                            if let Some(colors) = colors.as_ref() {
                                span {
                                    class: "dashboard-legend__swatch",
                                    style: "background-color: {colors.color(&value)}",
                                }
                            }
                            span { class: "dashboard-legend__value", "{value}" }
                        }
                    }
                }
            }
        }
    }
}
