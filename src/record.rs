//! Observation records and the in-memory datasets built from them.

use std::{collections::BTreeSet, fmt};

use chrono::{Datelike, NaiveDate};

/// One observation of one variable at one place and time.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: NaiveDate,
    pub variable_name: String,
    /// `None` (or NaN) when the source cell was empty.
    pub value: Option<f64>,
}

impl GeoRecord {
    pub fn new(
        latitude: f64,
        longitude: f64,
        timestamp: NaiveDate,
        variable_name: impl Into<String>,
        value: Option<f64>,
    ) -> Self {
        GeoRecord {
            latitude,
            longitude,
            timestamp,
            variable_name: variable_name.into(),
            value,
        }
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// The value, unless it is missing or NaN.
    pub fn observed_value(&self) -> Option<f64> {
        self.value.filter(|v| !v.is_nan())
    }

    /// True when the record can take part in a match.
    pub fn is_complete(&self) -> bool {
        self.observed_value().is_some() && self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Ordered collection of records. Not necessarily sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<GeoRecord>,
}

impl Dataset {
    pub fn new(records: Vec<GeoRecord>) -> Self {
        Dataset { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[GeoRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoRecord> {
        self.records.iter()
    }

    pub fn push(&mut self, record: GeoRecord) {
        self.records.push(record);
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut summary = DatasetSummary {
            rows: self.records.len(),
            ..Default::default()
        };

        for r in &self.records {
            summary.variables.insert(r.variable_name.clone());
            if r.observed_value().is_none() {
                summary.missing_values += 1;
            }

            let year = r.year();
            summary.years = Some(match summary.years {
                Some((first, last)) => (first.min(year), last.max(year)),
                None => (year, year),
            });

            if r.latitude.is_finite() && r.longitude.is_finite() {
                summary.bounds = Some(match summary.bounds {
                    Some(b) => Bounds {
                        min_latitude: b.min_latitude.min(r.latitude),
                        max_latitude: b.max_latitude.max(r.latitude),
                        min_longitude: b.min_longitude.min(r.longitude),
                        max_longitude: b.max_longitude.max(r.longitude),
                    },
                    None => Bounds {
                        min_latitude: r.latitude,
                        max_latitude: r.latitude,
                        min_longitude: r.longitude,
                        max_longitude: r.longitude,
                    },
                });
            }
        }

        summary
    }
}

impl FromIterator<GeoRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = GeoRecord>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a GeoRecord;
    type IntoIter = std::slice::Iter<'a, GeoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

/// Overview of a dataset, printed by the `summary` command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub missing_values: usize,
    pub variables: BTreeSet<String>,
    pub years: Option<(i32, i32)>,
    pub bounds: Option<Bounds>,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows:           {}", self.rows)?;
        writeln!(f, "missing values: {}", self.missing_values)?;
        let variables: Vec<&str> = self.variables.iter().map(String::as_str).collect();
        writeln!(f, "variables:      {}", variables.join(", "))?;
        match self.years {
            Some((first, last)) => writeln!(f, "years:          {first}-{last}")?,
            None => writeln!(f, "years:          -")?,
        }
        match self.bounds {
            Some(b) => write!(
                f,
                "extent:         lat {:.4}..{:.4}, lon {:.4}..{:.4}",
                b.min_latitude, b.max_latitude, b.min_longitude, b.max_longitude
            ),
            None => write!(f, "extent:         -"),
        }
    }
}

// -- Tests -------------------------------------------------------------------
