//! The derived shape every bar chart and summary table draws from.
//!
//! A view model is a pure function of the observations and the two selection
//! states. It is rebuilt on every redraw and never cached.

use std::collections::HashMap;

use super::{
    measurement::{finite_max, Measurement},
    observation::Observation,
    selection::SelectionState,
};

/// Ceiling used when no finite positive value survives filtering.
pub const MIN_CEILING: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub series: String,
    pub value: Measurement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub category: String,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub observations: Vec<Observation>,
    pub category_domain: Vec<String>,
    pub series_domain: Vec<String>,
    pub value_ceiling: f64,
    pub matrix: Vec<MatrixRow>,
}

impl ViewModel {
    pub fn build(
        observations: &[Observation],
        series: &SelectionState,
        categories: &SelectionState,
    ) -> Self {
        let filtered: Vec<Observation> = observations
            .iter()
            .filter(|obs| series.is_active(&obs.series) && categories.is_active(&obs.category))
            .cloned()
            .collect();

        let category_domain = categories.active_values();
        let series_domain = series.active_values();

        let mut lookup: HashMap<(&str, &str), Measurement> = HashMap::new();
        for obs in &filtered {
            lookup
                .entry((obs.category.as_str(), obs.series.as_str()))
                .or_insert(obs.value);
        }

        // Only the drawn cell of each pair counts toward the scale.
        let value_ceiling = finite_max(lookup.values().copied())
            .filter(|max| *max > 0.0)
            .unwrap_or(MIN_CEILING);

        let matrix = category_domain
            .iter()
            .map(|category| MatrixRow {
                category: category.clone(),
                cells: series_domain
                    .iter()
                    .map(|series| Cell {
                        series: series.clone(),
                        value: lookup
                            .get(&(category.as_str(), series.as_str()))
                            .copied()
                            .unwrap_or(Measurement::NotRun),
                    })
                    .collect(),
            })
            .collect();

        Self {
            observations: filtered,
            category_domain,
            series_domain,
            value_ceiling,
            matrix,
        }
    }

    pub fn cell(&self, category: &str, series: &str) -> Option<Measurement> {
        self.matrix
            .iter()
            .find(|row| row.category == category)?
            .cells
            .iter()
            .find(|cell| cell.series == series)
            .map(|cell| cell.value)
    }

    pub fn is_empty(&self) -> bool {
        self.category_domain.is_empty() || self.series_domain.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{dimension::Dimension, observation::BuildStamp};

    fn obs(series: &str, category: &str, value: Measurement) -> Observation {
        Observation::new(series, category, value, BuildStamp::new(1, "2014-01-01 00:00:00"))
    }

    fn states(observations: &[Observation]) -> (SelectionState, SelectionState) {
        let series = Dimension::extract(observations, |o| o.series.as_str());
        let categories = Dimension::extract(observations, |o| o.category.as_str());
        (SelectionState::new(&series), SelectionState::new(&categories))
    }

    fn sample() -> Vec<Observation> {
        vec![
            obs("A", "iris", Measurement::Finite(1.2)),
            obs("B", "iris", Measurement::Exceeded),
            obs("A", "wine", Measurement::Failed),
        ]
    }

    #[test]
    fn builds_full_matrix_with_not_run_gaps() {
        let rows = sample();
        let (series, categories) = states(&rows);
        let model = ViewModel::build(&rows, &series, &categories);

        assert_eq!(model.series_domain, ["A", "B"]);
        assert_eq!(model.category_domain, ["iris", "wine"]);
        assert_eq!(model.value_ceiling, 1.2);
        assert_eq!(model.matrix.len(), 2);
        assert!(model.matrix.iter().all(|row| row.cells.len() == 2));
        assert_eq!(model.cell("iris", "A"), Some(Measurement::Finite(1.2)));
        assert_eq!(model.cell("iris", "B"), Some(Measurement::Exceeded));
        assert_eq!(model.cell("wine", "A"), Some(Measurement::Failed));
        assert_eq!(model.cell("wine", "B"), Some(Measurement::NotRun));
    }

    #[test]
    fn inactive_values_are_filtered_out() {
        let rows = sample();
        let (mut series, categories) = states(&rows);
        series.toggle("A").unwrap();
        let model = ViewModel::build(&rows, &series, &categories);

        assert_eq!(model.series_domain, ["B"]);
        assert!(model.observations.iter().all(|o| o.series == "B"));
        assert_eq!(model.value_ceiling, MIN_CEILING);
        assert_eq!(model.cell("iris", "A"), None);
    }

    #[test]
    fn ceiling_ignores_sentinels() {
        let rows = vec![
            obs("A", "x", Measurement::Exceeded),
            obs("B", "x", Measurement::Finite(5.0)),
            obs("C", "x", Measurement::Failed),
        ];
        let (series, categories) = states(&rows);
        let model = ViewModel::build(&rows, &series, &categories);
        assert_eq!(model.value_ceiling, 5.0);
        assert_eq!(Measurement::Exceeded.plot_value(model.value_ceiling), Some(5.0));
    }

    #[test]
    fn all_sentinel_rows_use_minimum_ceiling() {
        let rows = vec![
            obs("A", "x", Measurement::Exceeded),
            obs("B", "x", Measurement::Finite(0.0)),
        ];
        let (series, categories) = states(&rows);
        let model = ViewModel::build(&rows, &series, &categories);
        assert_eq!(model.value_ceiling, MIN_CEILING);
        assert!(model.value_ceiling > 0.0);
    }

    #[test]
    fn first_observation_for_a_pair_wins() {
        let rows = vec![
            obs("A", "x", Measurement::Finite(2.0)),
            obs("A", "x", Measurement::Finite(9.0)),
        ];
        let (series, categories) = states(&rows);
        let model = ViewModel::build(&rows, &series, &categories);
        assert_eq!(model.cell("x", "A"), Some(Measurement::Finite(2.0)));
    }

    #[test]
    fn shadowed_duplicates_do_not_raise_the_ceiling() {
        let rows = vec![
            obs("A", "-k 3", Measurement::Finite(0.5)),
            obs("A", "-k 3", Measurement::Finite(90.0)),
            obs("A", "-k 5", Measurement::Finite(0.6)),
        ];
        let (series, categories) = states(&rows);
        let model = ViewModel::build(&rows, &series, &categories);
        assert_eq!(model.cell("-k 3", "A"), Some(Measurement::Finite(0.5)));
        assert_eq!(model.value_ceiling, 0.6);
    }

    #[test]
    fn failed_only_rows_sit_on_the_baseline() {
        let rows = vec![
            obs("A", "iris", Measurement::Failed),
            obs("B", "wine", Measurement::Failed),
        ];
        let (series, categories) = states(&rows);
        let model = ViewModel::build(&rows, &series, &categories);
        assert_eq!(model.value_ceiling, MIN_CEILING);
        assert_eq!(model.cell("iris", "A"), Some(Measurement::Failed));
        assert_eq!(model.cell("iris", "B"), Some(Measurement::NotRun));
        assert_ne!(model.cell("iris", "A"), model.cell("iris", "B"));
        assert_eq!(
            Measurement::Failed.plot_value(model.value_ceiling),
            Some(0.0)
        );
        assert_eq!(Measurement::NotRun.plot_value(model.value_ceiling), None);
    }

    #[test]
    fn everything_disabled_gives_an_empty_frame() {
        let rows = sample();
        let (mut series, categories) = states(&rows);
        series.disable_all();
        let model = ViewModel::build(&rows, &series, &categories);
        assert!(model.is_empty());
        assert!(model.observations.is_empty());
        assert_eq!(model.value_ceiling, MIN_CEILING);
        assert!(model.matrix.iter().all(|row| row.cells.is_empty()));
    }
}
