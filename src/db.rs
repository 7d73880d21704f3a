//! Persists matched tables as CSV, Parquet or into a SQLite table.

pub mod delimited;
pub mod parquet;
pub mod sqlite;

use std::path::Path;

use anyhow::{bail, Result};

pub use delimited::save_csv;
pub use self::parquet::save_parquet;
pub use sqlite::save_sqlite;

use crate::matcher::MatchedTable;

/// Table written when a SQLite file is given as the output path.
pub const DEFAULT_TABLE: &str = "matched";

/// Saves `table`, choosing the format from the file extension.
pub fn save_table(table: &MatchedTable, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => save_csv(table, path),
        "parquet" | "pq" => save_parquet(table, path),
        "db" | "sqlite" | "sqlite3" => save_sqlite(table, path, DEFAULT_TABLE),
        other => bail!("Unsupported output extension: .{other}"),
    }
}
