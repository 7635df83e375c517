//! Contact enrichment capability
//!
//! Enrichment turns a lead CSV into an enriched CSV. The processor only
//! depends on the [`Enricher`] trait; [`ScriptEnricher`] is the production
//! implementation that runs the external script as a subprocess.
//!
//! - [`script`] - Subprocess runner with cancellation and timeout
//! - [`process_group`] - Killing the script together with its descendants
//! - [`scratch`] - Collision-free output file names

pub mod process_group;
pub mod scratch;
pub mod script;

pub use scratch::scratch_output_path;
pub use script::ScriptEnricher;

use crate::app::models::EnrichmentStrategy;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// One enrichment run: where to read, where to write and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentJob {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub strategy: EnrichmentStrategy,
}

/// Why an enrichment run did not produce output
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for enrichment process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("enrichment process exited with {status}")]
    Exit { status: ExitStatus },

    #[error("enrichment cancelled")]
    Cancelled,

    #[error("enrichment timed out after {}s", .limit.as_secs())]
    TimedOut { limit: Duration },
}

/// Produces an enriched CSV for a lead CSV
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Run enrichment for `job`, returning the path of the written output
    ///
    /// Implementations must stop work promptly once `cancel` fires.
    async fn enrich(
        &self,
        job: &EnrichmentJob,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, EnrichmentError>;
}
