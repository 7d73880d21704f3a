//! Tolerant geospatial-temporal matching of crop productivity and
//! agroclimatic tables.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use agromatch::{
//!     reading::{load_dataset, ColumnMapping},
//!     JoinMode, MatchConfig, Matcher,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let mapping = ColumnMapping::default();
//! let maize = load_dataset(Path::new("crop_productivity_2020.csv"), &mapping)?;
//! let agro = load_dataset(Path::new("agroclimatic_indicators.csv"), &mapping)?;
//!
//! let config = MatchConfig::default()
//!     .with_join_mode(JoinMode::NearestWithinTolerance)
//!     .with_tolerance(0.1);
//! let matched = Matcher::new(config)?.run(&maize, &agro);
//!
//! agromatch::db::save_table(&matched, Path::new("combined.csv"))?;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod download;
pub mod error;
pub mod matcher;
pub mod reading;
pub mod record;

pub use error::MatchError;
pub use matcher::{
    match_datasets, Deduplicate, JoinKey, JoinMode, MatchConfig, MatchedPair, MatchedTable,
    Matcher, TemporalMode,
};
pub use record::{Dataset, GeoRecord};
