use crate::core::{
    dimension::Dimension,
    observation::Observation,
    selection::{SelectionPolicy, SelectionState},
};

/// Which legend a toggle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisId {
    Series,
    Categories,
}

/// What a legend lists, for its heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLabel {
    Libraries,
    Datasets,
    Metrics,
    Series,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Legend {
    pub axis: AxisId,
    pub label: AxisLabel,
}

/// Observations of the current query plus one selection state per axis.
#[derive(Debug, Clone, Default)]
pub struct ChartState {
    pub observations: Vec<Observation>,
    pub series: SelectionState,
    pub categories: SelectionState,
    /// A value query has answered since the last clear, even with no rows.
    pub loaded: bool,
}

impl ChartState {
    /// Replace the observations, deriving both dimensions from them.
    pub fn load(&mut self, observations: Vec<Observation>, policy: SelectionPolicy) {
        let series = Dimension::extract(&observations, |o| o.series.as_str());
        let categories = Dimension::extract(&observations, |o| o.category.as_str());
        self.load_with(observations, &series, &categories, policy);
    }

    /// Replace the observations with explicitly ordered dimensions.
    pub fn load_with(
        &mut self,
        observations: Vec<Observation>,
        series: &Dimension,
        categories: &Dimension,
        policy: SelectionPolicy,
    ) {
        self.observations = observations;
        self.loaded = true;
        self.series.refresh(series, policy);
        self.categories.refresh(categories, policy);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn axis(&self, axis: AxisId) -> &SelectionState {
        match axis {
            AxisId::Series => &self.series,
            AxisId::Categories => &self.categories,
        }
    }

    pub fn axis_mut(&mut self, axis: AxisId) -> &mut SelectionState {
        match axis {
            AxisId::Series => &mut self.series,
            AxisId::Categories => &mut self.categories,
        }
    }
}
