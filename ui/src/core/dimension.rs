//! Categorical axes extracted from query results.

use std::collections::HashSet;

/// Ordered set of distinct values. Order is first occurrence in the row
/// stream; nothing is sorted so legends stay in the order the data arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimension {
    values: Vec<String>,
}

impl Dimension {
    /// Collect the distinct values `selector` picks out of `rows`.
    pub fn extract<'a, T, I, F>(rows: I, mut selector: F) -> Self
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
        F: FnMut(&'a T) -> &'a str,
    {
        let mut seen: HashSet<&'a str> = HashSet::new();
        let mut values = Vec::new();
        for row in rows {
            let value = selector(row);
            if seen.insert(value) {
                values.push(value.to_string());
            }
        }
        Self { values }
    }

    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for value in values {
            let value = value.into();
            if seen.insert(value.clone()) {
                ordered.push(value);
            }
        }
        Self { values: ordered }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        library: &'static str,
    }

    #[test]
    fn keeps_first_seen_order_without_duplicates() {
        let rows = [
            Row { library: "B" },
            Row { library: "A" },
            Row { library: "A" },
            Row { library: "C" },
        ];
        let dimension = Dimension::extract(&rows, |row| row.library);
        assert_eq!(dimension.values(), ["B", "A", "C"]);
    }

    #[test]
    fn empty_rows_give_empty_dimension() {
        let rows: Vec<Row> = Vec::new();
        assert!(Dimension::extract(&rows, |row| row.library).is_empty());
    }

    #[test]
    fn from_values_dedups() {
        let dimension = Dimension::from_values(["x", "y", "x"]);
        assert_eq!(dimension.len(), 2);
        assert_eq!(dimension.position("y"), Some(1));
        assert!(!dimension.contains("z"));
    }
}
