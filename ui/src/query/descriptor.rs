//! Typed descriptions of the two queries every view issues.
//!
//! Views never build query text. They describe what they need and each
//! adapter decides how to evaluate it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Runtime measurements (`results`).
    Timings,
    /// Accuracy metric payloads (`metrics`).
    Metrics,
}

impl Table {
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Timings => "results",
            Self::Metrics => "metrics",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Method,
    Parameters,
    Dataset,
    Library,
    /// Raw metrics JSON text. Only valid on [`Table::Metrics`].
    MetricPayload,
}

/// Equality filters on identity columns. `None` means unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Filter {
    pub method: Option<String>,
    pub parameters: Option<String>,
    pub dataset: Option<String>,
    pub library: Option<String>,
}

impl Filter {
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn parameters(mut self, parameters: impl Into<String>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }

    pub fn dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = Some(dataset.into());
        self
    }

    pub fn library(mut self, library: impl Into<String>) -> Self {
        self.library = Some(library.into());
        self
    }

    pub fn matches(&self, method: &str, parameters: &str, dataset: &str, library: &str) -> bool {
        fn ok(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().map_or(true, |w| w == actual)
        }
        ok(&self.method, method)
            && ok(&self.parameters, parameters)
            && ok(&self.dataset, dataset)
            && ok(&self.library, library)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildSelection {
    /// Only the most recent build per (method, parameters, dataset, library).
    Latest,
    /// Every build, for history views.
    All,
}

/// Dataset properties a chart can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetAttribute {
    Size,
    Attributes,
    Instances,
}

impl DatasetAttribute {
    pub const ALL: [Self; 3] = [Self::Size, Self::Attributes, Self::Instances];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Attributes => "attributes",
            Self::Instances => "instances",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.slug() == slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowOrder {
    /// Storage order.
    Natural,
    DatasetAttribute(DatasetAttribute),
    BuildTime,
}

/// Distinct values of one column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistinctQuery {
    pub table: Table,
    pub column: Column,
    pub filter: Filter,
}

impl DistinctQuery {
    pub fn new(table: Table, column: Column) -> Self {
        Self {
            table,
            column,
            filter: Filter::default(),
        }
    }

    pub fn filtered(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }
}

/// Value rows for a filtered slice of one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueQuery {
    pub table: Table,
    pub filter: Filter,
    pub builds: BuildSelection,
    pub order: RowOrder,
}

impl ValueQuery {
    pub fn latest(table: Table, filter: Filter) -> Self {
        Self {
            table,
            filter,
            builds: BuildSelection::Latest,
            order: RowOrder::Natural,
        }
    }

    pub fn history(table: Table, filter: Filter) -> Self {
        Self {
            table,
            filter,
            builds: BuildSelection::All,
            order: RowOrder::BuildTime,
        }
    }

    pub fn all_builds(table: Table, filter: Filter) -> Self {
        Self {
            table,
            filter,
            builds: BuildSelection::All,
            order: RowOrder::Natural,
        }
    }

    pub fn ordered(mut self, order: RowOrder) -> Self {
        self.order = order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_only_set_fields() {
        let filter = Filter::default().method("kmeans").parameters("");
        assert!(filter.matches("kmeans", "", "iris", "mlpack"));
        assert!(!filter.matches("kmeans", "-k 3", "iris", "mlpack"));
        assert!(!filter.matches("pca", "", "iris", "mlpack"));
        assert!(Filter::default().matches("a", "b", "c", "d"));
    }

    #[test]
    fn attribute_slugs_round_trip() {
        for attr in DatasetAttribute::ALL {
            assert_eq!(DatasetAttribute::from_slug(attr.slug()), Some(attr));
        }
        assert_eq!(DatasetAttribute::from_slug("colour"), None);
    }
}
