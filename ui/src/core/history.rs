//! Time-series variant of the view model used by the historical chart.

use std::collections::HashMap;

use time::PrimitiveDateTime;

use super::{
    measurement::{finite_max, Measurement},
    observation::Observation,
    selection::SelectionState,
    view_model::MIN_CEILING,
};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub timestamp: PrimitiveDateTime,
    pub build_id: i64,
    pub value: Measurement,
    /// Height on the value axis.
    pub plot: f64,
}

impl HistoryPoint {
    /// The run hit the time budget and is drawn clamped at the ceiling.
    pub fn is_clamped(&self) -> bool {
        self.value == Measurement::Exceeded
    }
}

/// Where a failed build sits on the time axis. Failures are not part of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMarker {
    pub timestamp: PrimitiveDateTime,
    pub build_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub series: String,
    pub points: Vec<HistoryPoint>,
    pub failures: Vec<FailureMarker>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryModel {
    pub lines: Vec<Polyline>,
    pub value_ceiling: f64,
    pub time_domain: Option<(PrimitiveDateTime, PrimitiveDateTime)>,
}

impl HistoryModel {
    pub fn build(observations: &[Observation], series: &SelectionState) -> Self {
        let mut grouped: HashMap<&str, Vec<&Observation>> = HashMap::new();
        for obs in observations {
            if obs.build.timestamp.is_none() || !series.is_active(&obs.series) {
                continue;
            }
            grouped.entry(obs.series.as_str()).or_default().push(obs);
        }

        let value_ceiling = finite_max(grouped.values().flatten().map(|obs| obs.value))
            .filter(|max| *max > 0.0)
            .unwrap_or(MIN_CEILING);

        let mut lines = Vec::new();
        for name in series.active_values() {
            let Some(mut rows) = grouped.remove(name.as_str()) else {
                continue;
            };
            rows.sort_by(|a, b| {
                a.build
                    .timestamp
                    .cmp(&b.build.timestamp)
                    .then(a.build.id.cmp(&b.build.id))
            });

            let mut points = Vec::new();
            let mut failures = Vec::new();
            for obs in rows {
                let Some(timestamp) = obs.build.timestamp else {
                    continue;
                };
                match obs.value {
                    Measurement::Failed => failures.push(FailureMarker {
                        timestamp,
                        build_id: obs.build.id,
                    }),
                    Measurement::NotRun => {}
                    value => {
                        if let Some(plot) = value.plot_value(value_ceiling) {
                            points.push(HistoryPoint {
                                timestamp,
                                build_id: obs.build.id,
                                value,
                                plot,
                            });
                        }
                    }
                }
            }

            if points.is_empty() && failures.is_empty() {
                continue;
            }
            lines.push(Polyline {
                series: name,
                points,
                failures,
            });
        }

        let time_domain = lines
            .iter()
            .flat_map(|line| {
                line.points
                    .iter()
                    .map(|p| p.timestamp)
                    .chain(line.failures.iter().map(|f| f.timestamp))
            })
            .fold(None, |domain, ts| match domain {
                None => Some((ts, ts)),
                Some((lo, hi)) => Some((lo.min(ts), hi.max(ts))),
            });

        Self {
            lines,
            value_ceiling,
            time_domain,
        }
    }

    /// Position of `timestamp` on the time axis as a fraction in `[0, 1]`.
    pub fn x_fraction(&self, timestamp: PrimitiveDateTime) -> f64 {
        match self.time_domain {
            Some((lo, hi)) if hi > lo => {
                let span = (hi - lo).as_seconds_f64();
                ((timestamp - lo).as_seconds_f64() / span).clamp(0.0, 1.0)
            }
            _ => 0.5,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{dimension::Dimension, observation::BuildStamp};
    use time::macros::datetime;

    fn obs(series: &str, id: i64, ts: &str, value: Measurement) -> Observation {
        Observation::new(series, ts, value, BuildStamp::new(id, ts))
    }

    fn all_active(rows: &[Observation]) -> SelectionState {
        SelectionState::new(&Dimension::extract(rows, |o| o.series.as_str()))
    }

    #[test]
    fn points_are_ordered_by_time() {
        let rows = vec![
            obs("A", 3, "2014-03-01 00:00:00", Measurement::Finite(3.0)),
            obs("A", 1, "2014-01-01 00:00:00", Measurement::Finite(1.0)),
            obs("A", 2, "2014-02-01 00:00:00", Measurement::Finite(2.0)),
        ];
        let model = HistoryModel::build(&rows, &all_active(&rows));
        let ids: Vec<i64> = model.lines[0].points.iter().map(|p| p.build_id).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(
            model.time_domain,
            Some((datetime!(2014-01-01 00:00:00), datetime!(2014-03-01 00:00:00)))
        );
        assert_eq!(model.x_fraction(datetime!(2014-01-01 00:00:00)), 0.0);
        assert_eq!(model.x_fraction(datetime!(2014-03-01 00:00:00)), 1.0);
    }

    #[test]
    fn ties_break_on_build_id() {
        let rows = vec![
            obs("A", 9, "2014-01-01 00:00:00", Measurement::Finite(1.0)),
            obs("A", 4, "2014-01-01 00:00:00", Measurement::Finite(2.0)),
        ];
        let model = HistoryModel::build(&rows, &all_active(&rows));
        let ids: Vec<i64> = model.lines[0].points.iter().map(|p| p.build_id).collect();
        assert_eq!(ids, [4, 9]);
    }

    #[test]
    fn sentinels_are_clamped_or_marked() {
        let rows = vec![
            obs("A", 1, "2014-01-01 00:00:00", Measurement::Finite(4.0)),
            obs("A", 2, "2014-02-01 00:00:00", Measurement::Exceeded),
            obs("A", 3, "2014-03-01 00:00:00", Measurement::Failed),
            obs("A", 4, "2014-04-01 00:00:00", Measurement::NotRun),
        ];
        let model = HistoryModel::build(&rows, &all_active(&rows));
        let line = &model.lines[0];
        assert_eq!(model.value_ceiling, 4.0);
        assert_eq!(line.points.len(), 2);
        assert!(line.points[1].is_clamped());
        assert_eq!(line.points[1].plot, 4.0);
        assert_eq!(line.failures.len(), 1);
        assert_eq!(line.failures[0].build_id, 3);
    }

    #[test]
    fn inactive_series_and_untimed_rows_are_skipped() {
        let rows = vec![
            obs("A", 1, "2014-01-01 00:00:00", Measurement::Finite(1.0)),
            obs("B", 2, "2014-01-01 00:00:00", Measurement::Finite(8.0)),
            obs("A", 3, "not a date", Measurement::Finite(5.0)),
        ];
        let mut series = all_active(&rows);
        series.toggle("B").unwrap();
        let model = HistoryModel::build(&rows, &series);
        assert_eq!(model.lines.len(), 1);
        assert_eq!(model.lines[0].points.len(), 1);
        assert_eq!(model.value_ceiling, 1.0);
    }

    #[test]
    fn no_rows_gives_empty_model() {
        let model = HistoryModel::build(&[], &SelectionState::default());
        assert!(model.is_empty());
        assert_eq!(model.time_domain, None);
        assert_eq!(model.value_ceiling, MIN_CEILING);
    }
}
