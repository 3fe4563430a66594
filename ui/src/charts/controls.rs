//! Cascading select controls shared by every chart view.

use std::collections::HashMap;

use crate::query::{
    descriptor::{Column, DatasetAttribute, DistinctQuery, Filter, Table},
    row::parse_metric_payload,
};

use super::params;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Method,
    Parameters,
    Dataset,
    /// Dataset attribute a datasize chart is ordered by.
    SortBy,
    /// Parameter option placed on the x axis of a multi-parameter chart.
    ParameterOption,
    Metric,
}

/// Current value of each control, in the order the view chains them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choices {
    chain: Vec<Control>,
    values: HashMap<Control, String>,
}

impl Choices {
    pub fn new(chain: &[Control]) -> Self {
        Self {
            chain: chain.to_vec(),
            values: HashMap::new(),
        }
    }

    pub fn chain(&self) -> &[Control] {
        &self.chain
    }

    pub fn get(&self, control: Control) -> Option<&str> {
        self.values.get(&control).map(String::as_str)
    }

    /// Set `control` and clear everything after it in the chain. Returns the
    /// cleared controls.
    pub fn select(&mut self, control: Control, value: impl Into<String>) -> Vec<Control> {
        self.values.insert(control, value.into());
        let downstream: Vec<Control> = self
            .chain
            .iter()
            .skip_while(|c| **c != control)
            .skip(1)
            .copied()
            .collect();
        for c in &downstream {
            self.values.remove(c);
        }
        downstream
    }

    /// The control whose options depend on `control`.
    pub fn next(&self, control: Control) -> Option<Control> {
        self.chain
            .iter()
            .skip_while(|c| **c != control)
            .nth(1)
            .copied()
    }

    pub fn upstream_complete(&self, control: Control) -> bool {
        self.chain
            .iter()
            .take_while(|c| **c != control)
            .all(|c| self.values.contains_key(c))
    }

    /// Identity filter built from the method, parameter and dataset choices.
    pub fn filter(&self) -> Filter {
        Filter {
            method: self.get(Control::Method).map(str::to_string),
            parameters: self.get(Control::Parameters).map(str::to_string),
            dataset: self.get(Control::Dataset).map(str::to_string),
            library: None,
        }
    }
}

/// How fetched distinct values turn into a control's options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derive {
    AsIs,
    /// Parameter strings become the option names they contain.
    ParameterOptions,
    /// Metric payloads become the metric names they contain.
    MetricNames,
}

impl Derive {
    pub fn apply(self, values: Vec<String>) -> Vec<String> {
        match self {
            Self::AsIs => values,
            Self::ParameterOptions => {
                let mut names: Vec<String> = Vec::new();
                for value in &values {
                    for name in params::option_list(value) {
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
                names.sort();
                names
            }
            Self::MetricNames => {
                let mut names: Vec<String> = Vec::new();
                for value in &values {
                    match parse_metric_payload(value) {
                        Ok(metrics) => {
                            for (name, _) in metrics {
                                if !names.contains(&name) {
                                    names.push(name);
                                }
                            }
                        }
                        Err(err) => tracing::warn!("skipping metric payload: {err}"),
                    }
                }
                names
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionSource {
    Static(Vec<String>),
    Query { query: DistinctQuery, derive: Derive },
}

/// Options of `control` for views reading `table`, or `None` while an
/// upstream control is still unset.
pub fn standard_options(table: Table, control: Control, choices: &Choices) -> Option<OptionSource> {
    if !choices.upstream_complete(control) {
        return None;
    }
    let filter = choices.filter();
    let query = |column: Column, filter: Filter| DistinctQuery::new(table, column).filtered(filter);
    Some(match control {
        Control::Method => OptionSource::Query {
            query: query(Column::Method, Filter::default()),
            derive: Derive::AsIs,
        },
        Control::Parameters => OptionSource::Query {
            query: query(
                Column::Parameters,
                Filter {
                    method: filter.method,
                    ..Filter::default()
                },
            ),
            derive: Derive::AsIs,
        },
        Control::Dataset => OptionSource::Query {
            query: query(
                Column::Dataset,
                Filter {
                    dataset: None,
                    ..filter
                },
            ),
            derive: Derive::AsIs,
        },
        Control::SortBy => OptionSource::Static(
            DatasetAttribute::ALL
                .iter()
                .map(|attr| attr.slug().to_string())
                .collect(),
        ),
        Control::ParameterOption => OptionSource::Query {
            query: query(
                Column::Parameters,
                Filter {
                    parameters: None,
                    ..filter
                },
            ),
            derive: Derive::ParameterOptions,
        },
        Control::Metric => OptionSource::Query {
            query: DistinctQuery::new(Table::Metrics, Column::MetricPayload).filtered(Filter {
                parameters: None,
                ..filter
            }),
            derive: Derive::MetricNames,
        },
    })
}
