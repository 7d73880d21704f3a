//! Tolerant geospatial-temporal matching of two datasets.
//!
//! Each primary record is paired with secondary records at (nearly) the same
//! place and the same date or year. Two strategies are available:
//!
//! * [`JoinMode::ExactRounded`]: equality on coordinates rounded to
//!   `coordinate_precision` decimal places. Many-to-many.
//! * [`JoinMode::NearestWithinTolerance`]: the nearest secondary record whose
//!   coordinate distance is at most `tolerance`. At most one per primary record.
//!
//! Records without an observed value are dropped before matching, so no
//! output row ever carries a missing value. An empty result is not an error.

pub mod config;
mod exact;
pub mod key;
mod nearest;
pub mod table;

use std::collections::HashSet;

use log::debug;

pub use config::{Deduplicate, JoinMode, MatchConfig, TemporalMode};
pub use key::{JoinKey, TemporalKey};
pub use table::{MatchedPair, MatchedRow, MatchedTable, COLUMNS};

use crate::{
    error::MatchError,
    record::{Dataset, GeoRecord},
};

/// A record together with the key it is joined on.
pub(crate) struct Keyed<'a> {
    record: &'a GeoRecord,
    key: JoinKey,
}

/// Runs matches under a validated configuration.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Matcher { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn run(&self, primary: &Dataset, secondary: &Dataset) -> MatchedTable {
        let primary_keyed = self.prepare(
            primary,
            self.config.primary_variable.as_deref(),
            self.config.deduplicate.primary(),
        );
        let secondary_keyed = self.prepare(
            secondary,
            self.config.secondary_variable.as_deref(),
            self.config.deduplicate.secondary(),
        );

        debug!(
            "Matching {} of {} primary records against {} of {} secondary records",
            primary_keyed.len(),
            primary.len(),
            secondary_keyed.len(),
            secondary.len()
        );

        let pairs = match self.config.join_mode {
            JoinMode::ExactRounded => exact::join(&primary_keyed, &secondary_keyed),
            JoinMode::NearestWithinTolerance => {
                nearest::join(primary_keyed, secondary_keyed, self.config.tolerance)
            }
        };

        debug!("Matched {} pairs", pairs.len());

        MatchedTable::from(pairs)
    }

    /// Filters to complete records of the wanted variable, derives their keys
    /// and optionally keeps only the first record per (key, variable).
    fn prepare<'a>(
        &self,
        dataset: &'a Dataset,
        variable: Option<&str>,
        deduplicate: bool,
    ) -> Vec<Keyed<'a>> {
        let precision = self.config.precision();
        let mode = self.config.temporal_mode;

        let keyed = dataset
            .iter()
            .filter(|r| variable.map_or(true, |v| r.variable_name == v))
            .filter(|r| r.is_complete())
            .map(|record| Keyed {
                record,
                key: JoinKey::from_record(record, precision, mode),
            });

        if !deduplicate {
            return keyed.collect();
        }

        let mut seen: HashSet<(JoinKey, &str)> = HashSet::new();
        keyed
            .filter(|k| seen.insert((k.key, k.record.variable_name.as_str())))
            .collect()
    }
}

/// Validates `config` and matches `primary` against `secondary`.
pub fn match_datasets(
    primary: &Dataset,
    secondary: &Dataset,
    config: &MatchConfig,
) -> Result<MatchedTable, MatchError> {
    Ok(Matcher::new(config.clone())?.run(primary, secondary))
}

// -- Tests -------------------------------------------------------------------
