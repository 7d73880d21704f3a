//! Join keys: rounded coordinates plus a temporal component.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::config::TemporalMode;
use crate::record::GeoRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemporalKey {
    Date(NaiveDate),
    Year(i32),
}

impl TemporalKey {
    pub fn from_date(date: NaiveDate, mode: TemporalMode) -> Self {
        match mode {
            TemporalMode::ExactDate => TemporalKey::Date(date),
            TemporalMode::YearOnly => TemporalKey::Year(date.year()),
        }
    }
}

impl fmt::Display for TemporalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            TemporalKey::Year(year) => write!(f, "{year}"),
        }
    }
}

/// `(round(lat, P), round(lon, P), time)`, with the rounded coordinates held
/// as integers scaled by `10^P` so that equality is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinKey {
    lat: i64,
    lon: i64,
    time: TemporalKey,
    precision: u32,
}

impl JoinKey {
    pub fn new(
        latitude: f64,
        longitude: f64,
        timestamp: NaiveDate,
        precision: u32,
        mode: TemporalMode,
    ) -> Self {
        JoinKey {
            lat: scale(latitude, precision),
            lon: scale(longitude, precision),
            time: TemporalKey::from_date(timestamp, mode),
            precision,
        }
    }

    pub fn from_record(record: &GeoRecord, precision: u32, mode: TemporalMode) -> Self {
        JoinKey::new(
            record.latitude,
            record.longitude,
            record.timestamp,
            precision,
            mode,
        )
    }

    pub fn latitude(&self) -> f64 {
        self.lat as f64 / factor(self.precision)
    }

    pub fn longitude(&self) -> f64 {
        self.lon as f64 / factor(self.precision)
    }

    pub fn time(&self) -> TemporalKey {
        self.time
    }
}

/// Rounds `value` to `precision` decimal places.
///
/// Ties go to the even neighbour, the same rule dataframe libraries apply.
pub fn round_to(value: f64, precision: u32) -> f64 {
    scale(value, precision) as f64 / factor(precision)
}

/// Planar distance between two records, in degrees.
pub fn coordinate_distance(a: &GeoRecord, b: &GeoRecord) -> f64 {
    (a.latitude - b.latitude).hypot(a.longitude - b.longitude)
}

fn factor(precision: u32) -> f64 {
    10f64.powi(precision as i32)
}

fn scale(value: f64, precision: u32) -> i64 {
    (value * factor(precision)).round_ties_even() as i64
}

// -- Tests -------------------------------------------------------------------
