//! User-assembled series for the dataset and multi-parameter charts.

use crate::core::format::parameters_label;

/// Identity of one composed series. `method` is unset when the chart is
/// already scoped to a single method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesSpec {
    pub method: Option<String>,
    pub parameters: String,
    pub library: String,
}

impl SeriesSpec {
    pub fn label(&self) -> String {
        let parameters = parameters_label(&self.parameters);
        match &self.method {
            Some(method) => format!("{} - {method} {parameters}", self.library),
            None => format!("{} {parameters}", self.library),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerEdit {
    Add(SeriesSpec),
    Remove(SeriesSpec),
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesComposer {
    /// Combinations present in the current rows.
    available: Vec<SeriesSpec>,
    /// Combinations the user picked, in the order they were added.
    chosen: Vec<SeriesSpec>,
}

impl SeriesComposer {
    pub fn available(&self) -> &[SeriesSpec] {
        &self.available
    }

    pub fn chosen(&self) -> &[SeriesSpec] {
        &self.chosen
    }

    pub fn contains(&self, spec: &SeriesSpec) -> bool {
        self.chosen.contains(spec)
    }

    pub fn set_available(&mut self, specs: Vec<SeriesSpec>) {
        self.available = specs;
    }

    /// Apply an edit. Specs that are not available cannot be added.
    pub fn apply(&mut self, edit: ComposerEdit) -> bool {
        match edit {
            ComposerEdit::Add(spec) => {
                if self.available.contains(&spec) && !self.chosen.contains(&spec) {
                    self.chosen.push(spec);
                    true
                } else {
                    false
                }
            }
            ComposerEdit::Remove(spec) => {
                let before = self.chosen.len();
                self.chosen.retain(|s| *s != spec);
                self.chosen.len() != before
            }
            ComposerEdit::Clear => {
                let changed = !self.chosen.is_empty();
                self.chosen.clear();
                changed
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Push `spec` unless already present.
pub(crate) fn push_unique(specs: &mut Vec<SeriesSpec>, spec: SeriesSpec) {
    if !specs.contains(&spec) {
        specs.push(spec);
    }
}
