use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    RuntimeComparison,
    DatasizeComparison,
    HistoricalComparison,
    MetricComparison,
    MultiParameterComparison,
    DatasetComparison,
    HighestMetric,
}

impl ChartKind {
    pub const ALL: [Self; 7] = [
        Self::RuntimeComparison,
        Self::DatasizeComparison,
        Self::HistoricalComparison,
        Self::MetricComparison,
        Self::MultiParameterComparison,
        Self::DatasetComparison,
        Self::HighestMetric,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::RuntimeComparison => "runtime-comparison",
            Self::DatasizeComparison => "datasize-comparison",
            Self::HistoricalComparison => "historical-comparison",
            Self::MetricComparison => "metric-comparison",
            Self::MultiParameterComparison => "multi-parameter-comparison",
            Self::DatasetComparison => "dataset-comparison",
            Self::HighestMetric => "highest-metric",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_unique_and_parse_back() {
        for kind in ChartKind::ALL {
            assert_eq!(ChartKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(ChartKind::from_slug("pie"), None);
    }
}
