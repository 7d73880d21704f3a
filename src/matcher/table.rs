//! Matched pairs and their flattened, writer-facing view.

use serde::Serialize;

use super::key::JoinKey;
use crate::record::GeoRecord;

/// Column order of the flattened table.
pub const COLUMNS: [&str; 14] = [
    "lat",
    "lon",
    "time",
    "variable_primary",
    "value_primary",
    "lat_secondary",
    "lon_secondary",
    "time_secondary",
    "variable_secondary",
    "value_secondary",
    "key_lat",
    "key_lon",
    "key_time",
    "distance",
];

/// A primary record paired with a secondary record.
///
/// Both records carry an observed value. Under nearest matching `distance`
/// never exceeds the tolerance; exact matching only records it.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair {
    pub primary: GeoRecord,
    pub secondary: GeoRecord,
    pub key: JoinKey,
    pub distance: f64,
}

impl MatchedPair {
    pub(crate) fn new(
        primary: &GeoRecord,
        secondary: &GeoRecord,
        key: JoinKey,
        distance: f64,
    ) -> Self {
        MatchedPair {
            primary: primary.clone(),
            secondary: secondary.clone(),
            key,
            distance,
        }
    }

    pub fn row(&self) -> MatchedRow<'_> {
        // Incomplete records are filtered out before pairing.
        let value_primary = self.primary.observed_value().unwrap_or(f64::NAN);
        let value_secondary = self.secondary.observed_value().unwrap_or(f64::NAN);

        MatchedRow {
            lat: self.primary.latitude,
            lon: self.primary.longitude,
            time: self.primary.timestamp.format("%Y-%m-%d").to_string(),
            variable_primary: &self.primary.variable_name,
            value_primary,
            lat_secondary: self.secondary.latitude,
            lon_secondary: self.secondary.longitude,
            time_secondary: self.secondary.timestamp.format("%Y-%m-%d").to_string(),
            variable_secondary: &self.secondary.variable_name,
            value_secondary,
            key_lat: self.key.latitude(),
            key_lon: self.key.longitude(),
            key_time: self.key.time().to_string(),
            distance: self.distance,
        }
    }
}

/// One output row. Field order follows [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedRow<'a> {
    pub lat: f64,
    pub lon: f64,
    pub time: String,
    pub variable_primary: &'a str,
    pub value_primary: f64,
    pub lat_secondary: f64,
    pub lon_secondary: f64,
    pub time_secondary: String,
    pub variable_secondary: &'a str,
    pub value_secondary: f64,
    pub key_lat: f64,
    pub key_lon: f64,
    pub key_time: String,
    pub distance: f64,
}

/// Result of a match. An empty table means the inputs did not overlap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedTable {
    pairs: Vec<MatchedPair>,
}

impl MatchedTable {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[MatchedPair] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchedPair> {
        self.pairs.iter()
    }

    pub fn rows(&self) -> impl Iterator<Item = MatchedRow<'_>> {
        self.pairs.iter().map(MatchedPair::row)
    }

    /// Appends another table, as when concatenating per-year results.
    pub fn append(&mut self, other: MatchedTable) {
        self.pairs.extend(other.pairs);
    }

    pub fn into_pairs(self) -> Vec<MatchedPair> {
        self.pairs
    }
}

impl From<Vec<MatchedPair>> for MatchedTable {
    fn from(pairs: Vec<MatchedPair>) -> Self {
        MatchedTable { pairs }
    }
}

impl<'a> IntoIterator for &'a MatchedTable {
    type Item = &'a MatchedPair;
    type IntoIter = std::slice::Iter<'a, MatchedPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
