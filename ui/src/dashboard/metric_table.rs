use dioxus::prelude::*;

use crate::{
    charts::MetricTable,
    core::format::{cell_class, format_score, parameters_label},
};

use super::colors::ColorScale;

#[component]
pub fn MetricTableView(table: MetricTable, colors: ColorScale) -> Element {
    if table.rows.is_empty() {
        return rsx! {
            p { class: "dashboard-card__placeholder", {crate::t!("dashboard-no-rows")} }
        };
    }

    let sorted = table.sort_metric.clone().unwrap_or_default();

    rsx! {
        table { class: "summary-table metric-table",
            thead {
                tr {
                    th { {crate::t!("table-library")} }
                    th { {crate::t!("table-method")} }
                    th { {crate::t!("table-parameters")} }
                    for column in table.columns.iter() {
                        th {
                            key: "{column}",
                            class: if *column == sorted { "metric-table__sorted" } else { "" },
                            "{column}"
                        }
                    }
                }
            }
            tbody {
                for (i, row) in table.rows.iter().enumerate() {
                    tr { key: "{i}",
                        td {
                            span {
                                class: "dashboard-legend__swatch",
                                style: "background-color: {colors.color(&row.library)}",
                            }
                            "{row.library}"
                        }
                        td { "{row.method}" }
                        td { {parameters_label(&row.parameters)} }
                        for (j, value) in row.cells.iter().enumerate() {
                            td { key: "{j}", class: cell_class(*value), {format_score(*value)} }
                        }
                    }
                }
            }
        }
    }
}
