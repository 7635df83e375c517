//! CSV export of enriched leads

use crate::app::models::EnrichedLead;
use crate::constants::LEAD_CSV_HEADER;
use crate::{Error, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write `leads` to `path`, replacing any existing file
///
/// The header is always written, even for an empty slice.
pub fn export_leads(leads: &[EnrichedLead], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        Error::io(
            format!("Failed to create export file '{}'", path.display()),
            e,
        )
    })?;

    write_leads(file, leads, &path.display().to_string())?;

    info!("Exported {} leads to {}", leads.len(), path.display());
    Ok(())
}

/// Write the header and one row per lead, then flush
///
/// Returns the underlying writer once all buffered output has reached it.
pub fn write_leads<W: Write>(output: W, leads: &[EnrichedLead], target: &str) -> Result<W> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);

    writer
        .write_record(LEAD_CSV_HEADER)
        .map_err(|e| Error::csv_writing(target, "Failed to write header", e))?;

    for lead in leads {
        writer
            .write_record(lead.as_record())
            .map_err(|e| Error::csv_writing(target, "Failed to write lead row", e))?;
    }

    writer
        .flush()
        .map_err(|e| Error::io(format!("Failed to flush '{}'", target), e))?;

    writer
        .into_inner()
        .map_err(|e| Error::io(format!("Failed to finish '{}'", target), e.into_error()))
}
