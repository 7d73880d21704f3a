pub mod matching;
pub mod summary;

use std::path::{Path, PathBuf};

use agromatch::{
    download::{fetch_input, is_remote},
    reading::{load_dataset, ColumnMapping},
    Dataset,
};
use anyhow::Result;
use chrono::{Datelike, Local};
use indicatif::ProgressBar;

use super::create_spinner;

pub use matching::matching;
pub use summary::summary;

pub fn make_output_file_name(extension: &str) -> PathBuf {
    let today = Local::now();
    let file_name = format!(
        "agromatch-{}-{:02}-{:02}.{}",
        today.year(),
        today.month(),
        today.day(),
        extension
    );

    dirs::home_dir().unwrap_or_default().join(file_name)
}

/// Reads a local table, downloading it into `temp_dir` first when `input`
/// is a URL.
pub async fn load_input(
    input: &str,
    temp_dir: &Path,
    mapping: &ColumnMapping,
) -> Result<Dataset> {
    let path = if is_remote(input) {
        let bar = create_spinner(format!("Downloading {input}..."));
        let path = fetch_input(input, temp_dir, bar.clone()).await?;
        bar.finish_with_message(format!("Downloaded {input}"));
        path
    } else {
        PathBuf::from(input)
    };

    let bar = create_spinner(format!("Reading {}...", path.display()));
    read_with_spinner(&path, mapping, &bar)
}

fn read_with_spinner(path: &Path, mapping: &ColumnMapping, bar: &ProgressBar) -> Result<Dataset> {
    let dataset = match load_dataset(path, mapping) {
        Ok(dataset) => dataset,
        Err(e) => {
            bar.finish_and_clear();
            return Err(e);
        }
    };
    bar.finish_with_message(format!("Read {} records from {}", dataset.len(), path.display()));

    Ok(dataset)
}

// -- Tests -------------------------------------------------------------------
