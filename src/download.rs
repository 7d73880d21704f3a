//! Fetches remote input tables (e.g. pre-signed object-storage URLs) to disk.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

/// True for inputs that must be downloaded before reading.
pub fn is_remote(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Downloads `url` into `working_dir`, keeping the file name from the URL so
/// that the reader can dispatch on its extension.
pub async fn fetch_input(
    url: &str,
    working_dir: &Path,
    progress_bar: ProgressBar,
) -> Result<PathBuf> {
    let file_path = working_dir.join(file_name_from_url(url));

    download_with_progress(url, &file_path, progress_bar).await?;

    Ok(file_path)
}

/// Streams the body of `url` to `file_path`. The spinner becomes a byte
/// progress bar when the server reports a content length.
pub async fn download_with_progress(
    url: &str,
    file_path: &Path,
    progress_bar: ProgressBar,
) -> Result<(), Error> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::msg(format!("Failed to download file: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::msg(format!("Failed to download file: {}", response.status())));
    }

    let total_size = response.content_length().unwrap_or(0);
    if total_size > 0 {
        progress_bar.set_length(total_size);
        if let Ok(style) = ProgressStyle::with_template(
            "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {eta}",
        ) {
            progress_bar.set_style(style.progress_chars("=> "));
        }
    }

    let mut file = File::create(file_path)
        .with_context(|| format!("creating {}", file_path.display()))?;
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| Error::msg(format!("Error reading chunk: {}", e)))?;
        file.write_all(&chunk)?;
        downloaded += chunk.len() as u64;
        progress_bar.set_position(downloaded);
    }

    debug!("Downloaded {downloaded} bytes from {url}");

    Ok(())
}

/// Last path segment of `url`, without query string or fragment.
pub fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);

    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("download")
        .to_string()
}

// -- Tests -------------------------------------------------------------------
