//! Formatting helpers for presenting runtimes, scores and axes.

use time::{macros::format_description, PrimitiveDateTime};

use super::measurement::{Measurement, WIRE_EXCEEDED_TEXT, WIRE_FAILED_TEXT, WIRE_NOT_RUN_TEXT};

/// Label shown for a method run without parameters.
pub const NO_PARAMETERS_LABEL: &str = "[no parameters]";

pub fn parameters_label(parameters: &str) -> &str {
    if parameters.trim().is_empty() {
        NO_PARAMETERS_LABEL
    } else {
        parameters
    }
}

/// Tooltip text for a runtime bar.
pub fn format_runtime(value: Measurement) -> String {
    match value {
        Measurement::Finite(v) => format!("{v:.1}s"),
        Measurement::Exceeded => format!("{WIRE_EXCEEDED_TEXT}s"),
        Measurement::Failed => WIRE_FAILED_TEXT.to_string(),
        Measurement::NotRun => WIRE_NOT_RUN_TEXT.to_string(),
    }
}

/// Fixed-width text for summary table cells.
pub fn format_table_value(value: Measurement) -> String {
    match value {
        Measurement::Finite(v) => format!("{v:>7.2}"),
        Measurement::Exceeded => WIRE_EXCEEDED_TEXT.to_string(),
        Measurement::Failed => WIRE_FAILED_TEXT.to_string(),
        Measurement::NotRun => WIRE_NOT_RUN_TEXT.to_string(),
    }
}

pub fn format_score(value: Measurement) -> String {
    match value {
        Measurement::Finite(v) => format!("{v:.4}"),
        other => format_table_value(other),
    }
}

/// CSS class for a table cell; each sentinel gets its own treatment.
pub fn cell_class(value: Measurement) -> &'static str {
    match value {
        Measurement::Finite(_) => "timing-cell",
        Measurement::Exceeded => "timing-exceeded-cell",
        Measurement::Failed => "timing-failed-cell",
        Measurement::NotRun => "timing-not-run-cell",
    }
}

pub fn format_build_time(timestamp: PrimitiveDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    timestamp
        .format(&format)
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Two significant digits with an SI prefix, for value axis ticks.
pub fn format_si(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".into();
    }
    const PREFIXES: [(i32, &str); 9] = [
        (-12, "p"),
        (-9, "n"),
        (-6, "µ"),
        (-3, "m"),
        (0, ""),
        (3, "k"),
        (6, "M"),
        (9, "G"),
        (12, "T"),
    ];
    let exponent = value.abs().log10().floor() as i32;
    let group = exponent.div_euclid(3).clamp(-4, 4) * 3;
    let prefix = PREFIXES
        .iter()
        .find(|(e, _)| *e == group)
        .map(|(_, p)| *p)
        .unwrap_or("");
    let scaled = value / 10f64.powi(group);
    let decimals = (1 - (exponent - group)).max(0) as usize;
    format!("{scaled:.decimals$}{prefix}")
}

/// Evenly spaced "nice" ticks from zero up to `ceiling`.
pub fn ticks(ceiling: f64, count: usize) -> Vec<f64> {
    if ceiling <= 0.0 || !ceiling.is_finite() || count == 0 {
        return vec![0.0];
    }
    let raw = ceiling / count as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        e if e >= 7.07 => 10.0,
        e if e >= 3.16 => 5.0,
        e if e >= 1.41 => 2.0,
        _ => 1.0,
    } * magnitude;

    let mut ticks = Vec::new();
    let mut i = 0;
    loop {
        let tick = step * i as f64;
        if tick > ceiling * (1.0 + 1e-9) {
            break;
        }
        ticks.push(tick);
        i += 1;
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn runtime_tooltips() {
        assert_eq!(format_runtime(Measurement::Finite(1.24)), "1.2s");
        assert_eq!(format_runtime(Measurement::Exceeded), ">9000s");
        assert_eq!(format_runtime(Measurement::Failed), "failure");
        assert_eq!(format_runtime(Measurement::NotRun), "---");
    }

    #[test]
    fn table_values_are_fixed_width() {
        assert_eq!(format_table_value(Measurement::Finite(3.14159)), "   3.14");
        assert_eq!(format_table_value(Measurement::Exceeded), ">9000");
        assert_eq!(format_score(Measurement::Finite(0.5)), "0.5000");
    }

    #[test]
    fn cell_classes_are_distinct() {
        let classes = [
            cell_class(Measurement::Finite(1.0)),
            cell_class(Measurement::Exceeded),
            cell_class(Measurement::Failed),
            cell_class(Measurement::NotRun),
        ];
        for (i, a) in classes.iter().enumerate() {
            for b in &classes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn empty_parameters_get_a_label() {
        assert_eq!(parameters_label(""), "[no parameters]");
        assert_eq!(parameters_label("-k 3"), "-k 3");
    }

    #[test]
    fn si_axis_labels() {
        assert_eq!(format_si(0.0), "0");
        assert_eq!(format_si(1500.0), "1.5k");
        assert_eq!(format_si(12.0), "12");
        assert_eq!(format_si(0.25), "250m");
        assert_eq!(format_si(2.0), "2.0");
    }

    #[test]
    fn nice_ticks() {
        assert_eq!(ticks(10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(ticks(0.0, 5), vec![0.0]);
        assert!(ticks(7.3, 10).iter().all(|t| *t <= 7.3));
    }

    #[test]
    fn build_time() {
        assert_eq!(format_build_time(datetime!(2014-05-12 10:30:59)), "2014-05-12 10:30");
    }
}
