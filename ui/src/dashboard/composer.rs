use dioxus::prelude::*;

use crate::charts::{ChartView, ComposerEdit};

/// Add, remove and clear user-assembled series of the active view.
#[component]
pub fn SeriesComposerPanel(mut view: Signal<Box<dyn ChartView>>) -> Element {
    let mut pick = use_signal(|| None::<usize>);
    let Some((available, chosen)) = view
        .read()
        .composer()
        .map(|composer| (composer.available().to_vec(), composer.chosen().to_vec()))
    else {
        return rsx! {};
    };

    let addable: Vec<(usize, String)> = available
        .iter()
        .enumerate()
        .filter(|(_, spec)| !chosen.contains(spec))
        .map(|(i, spec)| (i, spec.label()))
        .collect();

    let add = {
        let available = available.clone();
        move |_| {
            let Some(spec) = pick().and_then(|i| available.get(i).cloned()) else {
                return;
            };
            view.write().compose(ComposerEdit::Add(spec));
            pick.set(None);
        }
    };

    rsx! {
        section { class: "dashboard-composer",
            h3 { {crate::t!("composer-title")} }
            if available.is_empty() {
                p { class: "dashboard-card__placeholder", {crate::t!("composer-empty")} }
            } else {
                div { class: "dashboard-composer__add",
                    select {
                        class: "dashboard-control__select",
                        oninput: move |evt: Event<FormData>| pick.set(evt.value().parse().ok()),
                        option { value: "", selected: pick().is_none(), {crate::t!("control-placeholder")} }
                        for (i, label) in addable {
                            option { key: "{i}", value: "{i}", "{label}" }
                        }
                    }
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: pick().is_none(),
                        onclick: add,
                        {crate::t!("composer-add")}
                    }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        disabled: chosen.is_empty(),
                        onclick: move |_| view.write().compose(ComposerEdit::Clear),
                        {crate::t!("composer-clear")}
                    }
                }
            }
            ul { class: "dashboard-composer__chosen",
                for spec in chosen {
                    li { key: "{spec.label()}",
                        span { "{spec.label()}" }
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            onclick: {
                                let spec = spec.clone();
                                move |_| view.write().compose(ComposerEdit::Remove(spec.clone()))
                            },
                            "✕"
                        }
                    }
                }
            }
        }
    }
}
