//! Immutable, position-addressed storage for loaded place records.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// A single named place.
///
/// Records are identified by their position in the [`PointStore`], which
/// stays stable for the lifetime of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Position in radians.
    pub point: Point,
    /// Place name, arbitrary text.
    pub label: String,
    /// Two-letter country code, `None` when the source row left it blank.
    pub country_code: Option<String>,
}

impl PointRecord {
    /// Builds a record from decimal degrees.
    pub fn from_degrees(
        latitude: f64,
        longitude: f64,
        label: impl Into<String>,
        country_code: Option<&str>,
    ) -> Self {
        Self {
            point: Point::from_degrees(latitude, longitude),
            label: label.into(),
            country_code: country_code
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string),
        }
    }
}

/// Ordered, read-only sequence of [`PointRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct PointStore {
    records: Vec<PointRecord>,
}

impl PointStore {
    /// Wraps an already-loaded record list. Order is preserved and defines record indices.
    pub fn new(records: Vec<PointRecord>) -> Self {
        Self { records }
    }

    /// Record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&PointRecord> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over records in index order.
    pub fn iter(&self) -> impl Iterator<Item = &PointRecord> {
        self.records.iter()
    }

    /// Positions of all records, in index order.
    pub fn points(&self) -> Vec<Point> {
        self.records.iter().map(|r| r.point).collect()
    }
}

impl std::ops::Index<usize> for PointStore {
    type Output = PointRecord;

    fn index(&self, index: usize) -> &PointRecord {
        &self.records[index]
    }
}

impl FromIterator<PointRecord> for PointStore {
    fn from_iter<T: IntoIterator<Item = PointRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_country_code_becomes_none() {
        let r = PointRecord::from_degrees(0.0, 0.0, "Null Island", Some("  "));
        assert_eq!(r.country_code, None);

        let r = PointRecord::from_degrees(0.0, 0.0, "Null Island", Some("XX"));
        assert_eq!(r.country_code.as_deref(), Some("XX"));
    }

    #[test]
    fn indices_follow_insertion_order() {
        let store: PointStore = ["a", "b", "c"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| PointRecord::from_degrees(i as f64, 0.0, name, None))
            .collect();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(1).unwrap().label, "b");
        assert!(store.get(3).is_none());
        assert_eq!(store.points().len(), 3);
    }
}
