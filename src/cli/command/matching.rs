//! Match each primary table against the secondary table and save the
//! concatenated result.

use agromatch::{db, MatchedTable, Matcher};
use anyhow::Result;
use log::{info, warn};
use tempfile::TempDir;

use super::{load_input, make_output_file_name};
use crate::cli::MatchArgs;

/// Returns the path written, or `None` when no primary table overlapped the
/// secondary one.
pub async fn matching(args: &MatchArgs) -> Result<Option<String>> {
    let matcher = Matcher::new(args.match_config())?;
    let mapping = args.columns.mapping();
    let temp_dir = TempDir::new()?;

    let secondary = load_input(&args.secondary, temp_dir.path(), &mapping).await?;
    info!("Loaded {} secondary records from {}", secondary.len(), args.secondary);

    let mut combined = MatchedTable::default();
    for input in &args.primary {
        let primary = load_input(input, temp_dir.path(), &mapping).await?;
        let matched = matcher.run(&primary, &secondary);

        if matched.is_empty() {
            warn!("Matching {input} against {} produced no rows", args.secondary);
        } else {
            info!("Matched {} rows for {input}", matched.len());
            combined.append(matched);
        }
    }

    if combined.is_empty() {
        return Ok(None);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| make_output_file_name("csv"));
    db::save_table(&combined, &output)?;

    if let Some(db_path) = &args.sqlite {
        db::save_sqlite(&combined, db_path, &args.table)?;
        info!("Inserted {} rows into {}:{}", combined.len(), db_path.display(), args.table);
    }

    Ok(Some(output.to_string_lossy().to_string()))
}

// -- Tests -------------------------------------------------------------------
