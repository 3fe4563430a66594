use dioxus::prelude::*;

use crate::{
    charts::ValueScale,
    core::{
        format::{cell_class, format_score, format_table_value},
        view_model::ViewModel,
    },
};

/// Category × series matrix under a chart, one row per category.
#[component]
pub fn SummaryTable(model: ViewModel, scale: ValueScale) -> Element {
    if model.matrix.is_empty() {
        return rsx! {};
    }

    let format = match scale {
        ValueScale::Runtime => format_table_value,
        ValueScale::Score => format_score,
    };

    rsx! {
        table { class: "summary-table",
            thead {
                tr {
                    th {}
                    for series in model.series_domain.iter() {
                        th { key: "{series}", "{series}" }
                    }
                }
            }
            tbody {
                for row in model.matrix.iter() {
                    tr { key: "{row.category}",
                        th { scope: "row", "{row.category}" }
                        for cell in row.cells.iter() {
                            td { key: "{cell.series}", class: cell_class(cell.value), {format(cell.value)} }
                        }
                    }
                }
            }
        }
    }
}
