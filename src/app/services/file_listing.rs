//! Lead file discovery in the data folder
//!
//! Lists the CSV files the scraper has written into the data folder. The
//! scan is non-recursive: subdirectories (including the scratch directory)
//! are never entered.

use crate::app::models::CsvFileInfo;
use crate::constants::{CSV_EXTENSION, RESERVED_DB_FILENAME};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// List lead CSV files directly inside `data_folder`, sorted by file name
///
/// Entries whose metadata cannot be read are skipped. Failing to open or
/// iterate the folder itself is an error.
pub async fn list_csv_files(data_folder: &Path) -> Result<Vec<CsvFileInfo>> {
    debug!("Listing CSV files in: {}", data_folder.display());

    let mut dir = fs::read_dir(data_folder).await.map_err(|e| {
        Error::io(
            format!("Failed to read data folder '{}'", data_folder.display()),
            e,
        )
    })?;

    let mut files = Vec::new();

    while let Some(entry) = dir.next_entry().await.map_err(|e| {
        Error::io(
            format!("Failed to read entry in '{}'", data_folder.display()),
            e,
        )
    })? {
        let filename = entry.file_name().to_string_lossy().into_owned();

        if !is_lead_csv_name(&filename) {
            continue;
        }

        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {}: {}", filename, e);
                continue;
            }
        };

        if metadata.is_dir() {
            continue;
        }

        let modified = match metadata.modified() {
            Ok(time) => DateTime::<Utc>::from(time),
            Err(e) => {
                debug!("Skipping {}: {}", filename, e);
                continue;
            }
        };

        files.push(CsvFileInfo {
            path: entry.path(),
            filename,
            size: metadata.len(),
            modified,
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));

    info!(
        "Found {} CSV files in {}",
        files.len(),
        data_folder.display()
    );
    Ok(files)
}

/// Check whether a directory entry name is a listable lead file
fn is_lead_csv_name(filename: &str) -> bool {
    filename != RESERVED_DB_FILENAME && filename.to_lowercase().ends_with(CSV_EXTENSION)
}
