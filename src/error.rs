//! Errors raised by the matcher and the table readers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// An input table lacks one of the columns a `GeoRecord` is built from.
    #[error("table `{table}` is missing required column `{column}`")]
    Schema { table: String, column: String },

    /// The match configuration is out of range.
    #[error("invalid match configuration: {0}")]
    Config(String),
}

impl MatchError {
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        MatchError::Schema {
            table: table.into(),
            column: column.into(),
        }
    }
}
