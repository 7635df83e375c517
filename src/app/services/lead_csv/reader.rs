//! Parsing of enrichment script output
//!
//! The whole file is read into memory. Row 0 is the header and is never
//! interpreted; columns are mapped by position. Rows that are too short are
//! dropped without error so one bad line from the scraper does not discard
//! the rest of the run.

use crate::app::models::EnrichedLead;
use crate::constants::LEAD_COLUMN_COUNT;
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read and parse an enrichment output file
pub fn read_enriched_csv(path: &Path) -> Result<Vec<EnrichedLead>> {
    let file = File::open(path).map_err(|e| {
        Error::io(
            format!("Failed to open enriched CSV '{}'", path.display()),
            e,
        )
    })?;

    parse_enriched_leads(file, &path.display().to_string())
}

/// Parse enriched leads from any reader
///
/// `source` names the input in error messages. Fewer than two rows (no
/// data after the header) yields an empty list.
pub fn parse_enriched_leads<R: Read>(input: R, source: &str) -> Result<Vec<EnrichedLead>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let rows = reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()
        .map_err(|e| Error::csv_parsing(source, "Failed to read CSV rows", e))?;

    if rows.len() < 2 {
        debug!("{}: no data rows", source);
        return Ok(Vec::new());
    }

    let leads: Vec<EnrichedLead> = rows.iter().skip(1).filter_map(lead_from_record).collect();

    let skipped = rows.len() - 1 - leads.len();
    if skipped > 0 {
        debug!(
            "{}: skipped {} rows with fewer than {} columns",
            source, skipped, LEAD_COLUMN_COUNT
        );
    }

    Ok(leads)
}

/// Map one data row onto a lead; `None` for short rows
fn lead_from_record(record: &StringRecord) -> Option<EnrichedLead> {
    if record.len() < LEAD_COLUMN_COUNT {
        return None;
    }

    Some(EnrichedLead {
        forename: record[0].to_string(),
        company_name: record[1].to_string(),
        company_location: record[2].to_string(),
        google_reviews: record[3].to_string(),
        email: record[4].to_string(),
        phone_number: record[5].to_string(),
    })
}
