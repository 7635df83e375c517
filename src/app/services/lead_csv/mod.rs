//! Enriched lead CSV reading and writing
//!
//! The enrichment script writes six columns in a fixed order (see
//! [`LEAD_CSV_HEADER`](crate::constants::LEAD_CSV_HEADER)) and exports use
//! the same layout, so a file written by [`export_leads`] reads back with
//! [`read_enriched_csv`].
//!
//! - [`reader`] - Lenient positional parsing of enrichment output
//! - [`writer`] - Header-first CSV export
//!
//! ## Usage
//!
//! ```rust
//! use lead_enricher::app::services::lead_csv::{export_leads, read_enriched_csv};
//!
//! # fn example() -> lead_enricher::Result<()> {
//! let leads = read_enriched_csv(std::path::Path::new("webdata/temp/enriched.csv"))?;
//! export_leads(&leads, std::path::Path::new("leads-with-email.csv"))?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use reader::{parse_enriched_leads, read_enriched_csv};
pub use writer::{export_leads, write_leads};
