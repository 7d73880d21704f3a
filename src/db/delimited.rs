//! Save a matched table as CSV.

use std::path::Path;

use anyhow::{Context, Result};

use crate::matcher::{MatchedTable, COLUMNS};

pub fn save_csv(table: &MatchedTable, file_path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(file_path)
        .with_context(|| format!("creating {}", file_path.display()))?;

    // Written explicitly so that an empty table still carries its header.
    writer.write_record(COLUMNS)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
