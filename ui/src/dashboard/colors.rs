//! Ordinal colour scale keyed by library (or composed series) name.

pub(crate) const PALETTE: [&str; 7] = [
    "#98abc5", "#8a89a6", "#7b6888", "#6b486b", "#a05d56", "#d0743c", "#ff8c00",
];

/// Keys keep the colour of the position they were first seen at, so a library
/// has the same colour in every chart once the domain is seeded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorScale {
    domain: Vec<String>,
}

impl ColorScale {
    pub fn extend<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if !self.domain.contains(&key) {
                self.domain.push(key);
            }
        }
    }

    /// Colour of `key`. Unknown keys are placed after the seeded domain.
    pub fn color(&self, key: &str) -> &'static str {
        let index = self
            .domain
            .iter()
            .position(|known| known == key)
            .unwrap_or(self.domain.len());
        PALETTE[index % PALETTE.len()]
    }

    /// A copy that also knows `keys`, used for per-chart series.
    pub fn with<'a>(&self, keys: impl IntoIterator<Item = &'a String>) -> Self {
        let mut scale = self.clone();
        scale.extend(keys.into_iter().cloned());
        scale
    }
}
