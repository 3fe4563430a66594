use dioxus::prelude::*;

use crate::{
    charts::{Chart, MetricTable, ValueScale},
    core::{
        format::{format_build_time, format_runtime, format_score, parameters_label},
        history::HistoryModel,
        measurement::Measurement,
        view_model::ViewModel,
    },
};

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

/// CSV download of whatever the active chart currently shows.
#[component]
pub fn ExportPanel(chart: Chart, slug: String) -> Element {
    let mut status = use_signal(|| ExportStatus::Idle);

    let Some(csv) = chart_csv(&chart) else {
        return rsx! {};
    };

    let feedback = match status() {
        ExportStatus::Idle => None,
        ExportStatus::Working => Some(("dashboard-card__meta".to_string(), crate::t!("export-working"))),
        ExportStatus::Done(message) => Some((
            "dashboard-card__meta dashboard-card__meta--success".to_string(),
            message,
        )),
        ExportStatus::Error(err) => Some((
            "dashboard-card__meta dashboard-card__meta--error".to_string(),
            err,
        )),
    };

    let on_export = move |_| {
        if status() == ExportStatus::Working {
            return;
        }
        status.set(ExportStatus::Working);
        let filename = format!("benchview-{slug}-{}.csv", timestamp_slug());
        let bytes = csv.clone().into_bytes();
        spawn(async move {
            match download_bytes(&filename, "text/csv", bytes).await {
                Ok(Some(path)) => {
                    tracing::info!(%path, "csv exported");
                    status.set(ExportStatus::Done(crate::t!("export-saved", path = path)));
                }
                Ok(None) => status.set(ExportStatus::Done(crate::t!("export-started"))),
                Err(err) => {
                    tracing::error!("csv export failed: {err}");
                    status.set(ExportStatus::Error(err));
                }
            }
        });
    };

    rsx! {
        div { class: "dashboard-export",
            button {
                r#type: "button",
                class: "button",
                disabled: status() == ExportStatus::Working,
                onclick: on_export,
                {crate::t!("export-csv")}
            }
            if let Some((class_name, message)) = feedback {
                span { class: "{class_name}", "{message}" }
            }
        }
    }
}

/// CSV text of a chart, or `None` when there is nothing to export.
pub fn chart_csv(chart: &Chart) -> Option<String> {
    match chart {
        Chart::Empty => None,
        Chart::Bars { model, scale } | Chart::Lines { model, scale } => {
            Some(matrix_csv(model, *scale))
        }
        Chart::History(model) => Some(history_csv(model)),
        Chart::Table(table) => Some(metric_table_csv(table)),
    }
}

fn csv_value(value: Measurement, scale: ValueScale) -> String {
    match (value, scale) {
        (Measurement::Finite(v), _) => v.to_string(),
        (other, ValueScale::Runtime) => format_runtime(other),
        (other, ValueScale::Score) => format_score(other),
    }
}

fn matrix_csv(model: &ViewModel, scale: ValueScale) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(model.matrix.len() + 1);
    let mut header = vec![String::new()];
    header.extend(model.series_domain.iter().cloned());
    rows.push(header);
    for row in &model.matrix {
        let mut line = vec![row.category.clone()];
        line.extend(row.cells.iter().map(|cell| csv_value(cell.value, scale)));
        rows.push(line);
    }
    join_rows(&rows)
}

fn history_csv(model: &HistoryModel) -> String {
    let mut rows: Vec<Vec<String>> = vec![["series", "build", "timestamp", "runtime"]
        .iter()
        .map(|s| s.to_string())
        .collect()];
    for line in &model.lines {
        for point in &line.points {
            rows.push(vec![
                line.series.clone(),
                point.build_id.to_string(),
                format_build_time(point.timestamp),
                csv_value(point.value, ValueScale::Runtime),
            ]);
        }
        for marker in &line.failures {
            rows.push(vec![
                line.series.clone(),
                marker.build_id.to_string(),
                format_build_time(marker.timestamp),
                csv_value(Measurement::Failed, ValueScale::Runtime),
            ]);
        }
    }
    join_rows(&rows)
}

fn metric_table_csv(table: &MetricTable) -> String {
    let mut header: Vec<String> = ["library", "method", "parameters"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(table.columns.iter().cloned());
    let mut rows = vec![header];
    for row in &table.rows {
        let mut line = vec![
            row.library.clone(),
            row.method.clone(),
            parameters_label(&row.parameters).to_string(),
        ];
        line.extend(row.cells.iter().map(|v| csv_value(*v, ValueScale::Score)));
        rows.push(line);
    }
    join_rows(&rows)
}

fn join_rows(rows: &[Vec<String>]) -> String {
    let mut csv = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|value| escape_csv(value))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }
    csv
}

fn escape_csv(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let needs_quotes = value.contains(',') || value.contains('"') || value.contains('\n');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

fn timestamp_slug() -> String {
    use time::{macros::format_description, OffsetDateTime};

    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "export".into())
}

async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;
        use std::io::Write;

        let _ = mime;
        let dir = desktop_export_dir()?;
        fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        let mut file = fs::File::create(&path).map_err(|err| err.to_string())?;
        file.write_all(&bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("org", "Benchview", "Benchview")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}
