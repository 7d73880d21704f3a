//! Loading of long-format tables (`lat`, `lon`, `time`, `value`, `variable`)
//! into a [`Dataset`].

pub mod delimited;
pub mod parquet;
pub mod time;

use std::path::Path;

use anyhow::{bail, Result};

pub use delimited::{load_csv, read_csv};
pub use self::parquet::load_parquet;
pub use time::parse_time;

use crate::{error::MatchError, record::Dataset};

/// Names of the source columns a `GeoRecord` is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub latitude: String,
    pub longitude: String,
    pub time: String,
    pub value: String,
    /// When the table has no such column, the value column's name is used as
    /// the variable name.
    pub variable: Option<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            latitude: "lat".to_string(),
            longitude: "lon".to_string(),
            time: "time".to_string(),
            value: "value".to_string(),
            variable: Some("variable".to_string()),
        }
    }
}

impl ColumnMapping {
    /// Finds the column positions in `headers`.
    pub fn resolve<S: AsRef<str>>(
        &self,
        table: &str,
        headers: &[S],
    ) -> Result<ResolvedColumns, MatchError> {
        let position = |name: &str| headers.iter().position(|h| h.as_ref() == name);
        let required = |name: &str| {
            position(name).ok_or_else(|| MatchError::missing_column(table, name))
        };

        Ok(ResolvedColumns {
            latitude: required(&self.latitude)?,
            longitude: required(&self.longitude)?,
            time: required(&self.time)?,
            value: required(&self.value)?,
            variable: self.variable.as_deref().and_then(position),
            default_variable: self.value.clone(),
        })
    }
}

/// Column positions of one concrete table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub latitude: usize,
    pub longitude: usize,
    pub time: usize,
    pub value: usize,
    pub variable: Option<usize>,
    pub default_variable: String,
}

/// Loads a table, choosing the reader from the file extension.
///
/// Supported formats:
/// * `.csv`
/// * `.csv.gz` / `.gz` (gzip-compressed CSV)
/// * `.parquet` / `.pq`
pub fn load_dataset(path: &Path, mapping: &ColumnMapping) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "gz" => load_csv(path, mapping),
        "parquet" | "pq" => load_parquet(path, mapping),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Parses a numeric cell. Empty cells and the usual NA spellings are missing.
pub fn parse_value(cell: &str) -> Option<f64> {
    let s = cell.trim();
    match s {
        "" | "NA" | "N/A" | "null" | "NULL" | "None" => None,
        _ => s.parse::<f64>().ok().filter(|v| !v.is_nan()),
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn should_resolve_columns_in_any_order() {
        let headers = ["variable", "value", "time", "lon", "lat", "year"];

        let columns = ColumnMapping::default().resolve("t", &headers).unwrap();

        assert_eq!(columns.latitude, 4);
        assert_eq!(columns.longitude, 3);
        assert_eq!(columns.time, 2);
        assert_eq!(columns.value, 1);
        assert_eq!(columns.variable, Some(0));
    }

    #[test]
    fn should_fail_on_missing_required_column() {
        let headers = ["lat", "lon", "value"];

        let err = ColumnMapping::default().resolve("t", &headers).unwrap_err();

        assert_eq!(err, MatchError::missing_column("t", "time"));
    }

    #[test]
    fn should_fall_back_to_value_column_name() {
        let mapping = ColumnMapping {
            value: "GSL".to_string(),
            ..Default::default()
        };

        let columns = mapping.resolve("t", &["lat", "lon", "time", "GSL"]).unwrap();

        assert_eq!(columns.variable, None);
        assert_eq!(columns.default_variable, "GSL");
    }

    #[test]
    fn should_parse_values() {
        assert_eq!(parse_value(" 1.5 "), Some(1.5));
        assert_eq!(parse_value("-3"), Some(-3.0));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("nan"), None);
        assert_eq!(parse_value("NA"), None);
        assert_eq!(parse_value("abc"), None);
    }

    #[test]
    fn should_reject_unknown_extension() {
        let result = load_dataset(&PathBuf::from("table.xlsx"), &ColumnMapping::default());

        assert!(result.is_err());
    }
}
