//! Match configuration.

use clap::ValueEnum;

use crate::error::MatchError;

/// Largest accepted coordinate precision. Keys are stored as `round(x * 10^P)`
/// in an `i64`.
pub const MAX_PRECISION: i32 = 12;

/// How timestamps are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TemporalMode {
    /// Dates must be identical.
    ExactDate,
    /// Dates must fall in the same calendar year.
    #[default]
    YearOnly,
}

/// How coordinates are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum JoinMode {
    /// Equality on rounded coordinates, many-to-many.
    ExactRounded,
    /// Nearest counterpart within `tolerance`, at most one per primary record.
    #[default]
    #[value(name = "nearest")]
    NearestWithinTolerance,
}

/// Which inputs are reduced to one record per (key, variable) before joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Deduplicate {
    Off,
    Secondary,
    #[default]
    Both,
}

impl Deduplicate {
    pub fn primary(self) -> bool {
        self == Deduplicate::Both
    }

    pub fn secondary(self) -> bool {
        self != Deduplicate::Off
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Decimal places kept when rounding latitude and longitude.
    pub coordinate_precision: i32,
    /// Largest accepted coordinate distance, in degrees.
    pub tolerance: f64,
    pub temporal_mode: TemporalMode,
    pub join_mode: JoinMode,
    pub deduplicate: Deduplicate,
    /// Only primary records of this variable take part.
    pub primary_variable: Option<String>,
    /// Only secondary records of this variable take part.
    pub secondary_variable: Option<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            coordinate_precision: 2,
            tolerance: 0.1,
            temporal_mode: TemporalMode::default(),
            join_mode: JoinMode::default(),
            deduplicate: Deduplicate::default(),
            primary_variable: None,
            secondary_variable: None,
        }
    }
}

impl MatchConfig {
    pub fn with_precision(mut self, precision: i32) -> Self {
        self.coordinate_precision = precision;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_temporal_mode(mut self, mode: TemporalMode) -> Self {
        self.temporal_mode = mode;
        self
    }

    pub fn with_join_mode(mut self, mode: JoinMode) -> Self {
        self.join_mode = mode;
        self
    }

    pub fn with_deduplicate(mut self, deduplicate: Deduplicate) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn with_primary_variable(mut self, variable: impl Into<String>) -> Self {
        self.primary_variable = Some(variable.into());
        self
    }

    pub fn with_secondary_variable(mut self, variable: impl Into<String>) -> Self {
        self.secondary_variable = Some(variable.into());
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if self.coordinate_precision < 0 {
            return Err(MatchError::Config(format!(
                "coordinate precision must not be negative, got {}",
                self.coordinate_precision
            )));
        }
        if self.coordinate_precision > MAX_PRECISION {
            return Err(MatchError::Config(format!(
                "coordinate precision must be at most {MAX_PRECISION}, got {}",
                self.coordinate_precision
            )));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(MatchError::Config(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }

        Ok(())
    }

    /// Precision as a power-of-ten exponent. Only meaningful once validated.
    pub(crate) fn precision(&self) -> u32 {
        self.coordinate_precision.clamp(0, MAX_PRECISION) as u32
    }
}
