//! Save a matched table into a SQLite database.

use std::path::Path;

use anyhow::{bail, Result};
use log::debug;
use rusqlite::{params, Connection};

use crate::matcher::MatchedTable;

/// Replaces `table_name` in the database at `db_path` with the rows of `table`.
pub fn save_sqlite(table: &MatchedTable, db_path: &Path, table_name: &str) -> Result<()> {
    if !is_identifier(table_name) {
        bail!("Invalid table name `{table_name}`: use letters, digits and underscores");
    }

    let mut conn = Connection::open(db_path)?;

    conn.execute(&format!("DROP TABLE IF EXISTS {table_name}"), [])?;
    conn.execute(
        &format!(
            "CREATE TABLE {table_name} (
                lat REAL NOT NULL,
                lon REAL NOT NULL,
                time TEXT NOT NULL,
                variable_primary TEXT NOT NULL,
                value_primary REAL NOT NULL,
                lat_secondary REAL NOT NULL,
                lon_secondary REAL NOT NULL,
                time_secondary TEXT NOT NULL,
                variable_secondary TEXT NOT NULL,
                value_secondary REAL NOT NULL,
                key_lat REAL NOT NULL,
                key_lon REAL NOT NULL,
                key_time TEXT NOT NULL,
                distance REAL NOT NULL
            )"
        ),
        (),
    )?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {table_name} VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
        ))?;

        for r in table.rows() {
            stmt.execute(params![
                r.lat,
                r.lon,
                r.time,
                r.variable_primary,
                r.value_primary,
                r.lat_secondary,
                r.lon_secondary,
                r.time_secondary,
                r.variable_secondary,
                r.value_secondary,
                r.key_lat,
                r.key_lon,
                r.key_time,
                r.distance,
            ])?;
        }
    }
    tx.commit()?;

    debug!("Inserted {} rows into {table_name}", table.len());

    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        matcher::{match_datasets, JoinMode, MatchConfig},
        record::{Dataset, GeoRecord},
    };

    fn table_fixture() -> MatchedTable {
        let date = NaiveDate::from_ymd_opt(2019, 8, 1).unwrap();
        let primary = Dataset::new(vec![GeoRecord::new(40.0, -3.0, date, "DVS", Some(1.2))]);
        let secondary = Dataset::new(vec![GeoRecord::new(40.0, -3.0, date, "GSL", Some(180.0))]);

        let config = MatchConfig::default().with_join_mode(JoinMode::ExactRounded);
        match_datasets(&primary, &secondary, &config).unwrap()
    }

    #[test]
    fn should_insert_rows() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("crop_productivity.db");

        save_sqlite(&table_fixture(), &db_path, "crop_productivity_2019").unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let (count, value, variable): (i64, f64, String) = conn
            .query_row(
                "SELECT COUNT(*), MAX(value_secondary), MAX(variable_primary) FROM crop_productivity_2019",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(value, 180.0);
        assert_eq!(variable, "DVS");
    }

    #[test]
    fn should_replace_existing_table() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("backup.db");

        save_sqlite(&table_fixture(), &db_path, "matched").unwrap();
        save_sqlite(&table_fixture(), &db_path, "matched").unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM matched", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn should_reject_unsafe_table_name() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("backup.db");

        let result = save_sqlite(&table_fixture(), &db_path, "matched; DROP TABLE x");

        assert!(result.is_err());
    }

    #[test]
    fn should_check_identifiers() {
        assert!(is_identifier("CropProductivity2019"));
        assert!(is_identifier("_tmp"));
        assert!(!is_identifier("2019"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }
}
