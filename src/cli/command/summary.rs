//! Print an overview of a table before matching it.

use agromatch::reading::ColumnMapping;
use anyhow::Result;
use tempfile::TempDir;

use super::load_input;

pub async fn summary(input: &str, mapping: &ColumnMapping) -> Result<String> {
    let temp_dir = TempDir::new()?;
    let dataset = load_input(input, temp_dir.path(), mapping).await?;

    Ok(format!("{input}\n{}", dataset.summary()))
}
