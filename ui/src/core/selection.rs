//! Per-dimension active/inactive flags driving legends and filtering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{dimension::Dimension, error::SelectionError};

/// What happens to existing flags when a re-query produces a new dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Every value starts active again.
    #[default]
    Reset,
    /// Values that survive the re-query keep their flag; new values start active.
    Preserve,
}

/// Exactly one flag per dimension value, iterated in dimension order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    order: Vec<String>,
    active: HashMap<String, bool>,
}

impl SelectionState {
    pub fn new(dimension: &Dimension) -> Self {
        let order = dimension.values().to_vec();
        let active = order.iter().map(|value| (value.clone(), true)).collect();
        Self { order, active }
    }

    /// Flip the flag for `value` and return the new state.
    pub fn toggle(&mut self, value: &str) -> Result<bool, SelectionError> {
        let flag = self
            .active
            .get_mut(value)
            .ok_or_else(|| SelectionError::UnknownValue(value.to_string()))?;
        *flag = !*flag;
        Ok(*flag)
    }

    pub fn enable_all(&mut self) {
        self.active.values_mut().for_each(|flag| *flag = true);
    }

    pub fn disable_all(&mut self) {
        self.active.values_mut().for_each(|flag| *flag = false);
    }

    /// Values outside the dimension are never active.
    pub fn is_active(&self, value: &str) -> bool {
        self.active.get(value).copied().unwrap_or(false)
    }

    pub fn active_values(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|value| self.is_active(value))
            .cloned()
            .collect()
    }

    /// All values with their flag, in dimension order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.order
            .iter()
            .map(|value| (value.as_str(), self.is_active(value)))
    }

    pub fn values(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Rebuild the state for a freshly extracted dimension.
    pub fn refresh(&mut self, dimension: &Dimension, policy: SelectionPolicy) {
        let mut next = Self::new(dimension);
        if policy == SelectionPolicy::Preserve {
            for (value, flag) in next.active.iter_mut() {
                if let Some(previous) = self.active.get(value) {
                    *flag = *previous;
                }
            }
        }
        *self = next;
    }
}
