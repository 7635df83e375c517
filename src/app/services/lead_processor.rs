//! Lead processor: list, enrich, filter and export
//!
//! [`LeadProcessor`] ties the data folder to an [`Enricher`]. Each call is
//! independent; the processor holds no per-call state, so one instance can
//! be shared between concurrent callers.

use crate::app::models::{
    CsvFileInfo, EnrichedLead, LeadFilters, ProcessOutcome, ProcessReport, ProcessRequest,
};
use crate::app::services::enrichment::{
    Enricher, EnrichmentJob, ScriptEnricher, scratch_output_path,
};
use crate::app::services::{file_listing, lead_csv, lead_filter};
use crate::config::Config;
use crate::constants::SCRATCH_DIR_NAME;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Processor over one data folder
#[derive(Clone)]
pub struct LeadProcessor {
    data_folder: PathBuf,
    enricher: Arc<dyn Enricher>,
}

impl std::fmt::Debug for LeadProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadProcessor")
            .field("data_folder", &self.data_folder)
            .finish_non_exhaustive()
    }
}

impl LeadProcessor {
    /// Create a processor using a custom enricher
    pub fn new(data_folder: impl Into<PathBuf>, enricher: Arc<dyn Enricher>) -> Self {
        Self {
            data_folder: data_folder.into(),
            enricher,
        }
    }

    /// Create a processor that runs the configured enrichment script
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.data_folder.clone(),
            Arc::new(ScriptEnricher::from_config(&config.enrichment)),
        )
    }

    pub fn data_folder(&self) -> &Path {
        &self.data_folder
    }

    /// Directory holding enrichment output
    pub fn scratch_dir(&self) -> PathBuf {
        self.data_folder.join(SCRATCH_DIR_NAME)
    }

    /// List lead CSV files in the data folder
    pub async fn list_csv_files(&self) -> Result<Vec<CsvFileInfo>> {
        file_listing::list_csv_files(&self.data_folder).await
    }

    /// Enrich the request's input file and filter the result
    ///
    /// Missing input, enrichment failure and unreadable output come back as
    /// [`ProcessOutcome::Failed`]. Only a scratch directory that cannot be
    /// created is an `Err`.
    pub async fn process(
        &self,
        request: ProcessRequest,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutcome> {
        let start_time = Instant::now();

        match fs::try_exists(&request.input_file).await {
            Ok(true) => {}
            Ok(false) => {
                warn!("Input file not found: {}", request.input_file.display());
                return Ok(ProcessOutcome::failed(format!(
                    "Input file not found: {}",
                    request.input_file.display()
                )));
            }
            Err(e) => {
                warn!("Cannot access {}: {}", request.input_file.display(), e);
                return Ok(ProcessOutcome::failed(format!(
                    "Cannot access input file {}: {}",
                    request.input_file.display(),
                    e
                )));
            }
        }

        let scratch_dir = self.scratch_dir();
        fs::create_dir_all(&scratch_dir).await.map_err(|e| {
            Error::io(
                format!(
                    "Failed to create scratch directory '{}'",
                    scratch_dir.display()
                ),
                e,
            )
        })?;

        let job = EnrichmentJob {
            input_file: request.input_file.clone(),
            output_file: scratch_output_path(&scratch_dir),
            strategy: request.strategy(),
        };

        let output_file = match self.enricher.enrich(&job, cancel).await {
            Ok(path) => path,
            Err(e) => {
                warn!("Enrichment failed for {}: {}", job.input_file.display(), e);
                return Ok(ProcessOutcome::failed(format!(
                    "Failed to run enrichment script: {}",
                    e
                )));
            }
        };

        let leads = match read_leads_blocking(output_file.clone()).await {
            Ok(leads) => leads,
            Err(e) => {
                warn!("Could not read {}: {}", output_file.display(), e);
                return Ok(ProcessOutcome::failed(format!(
                    "Failed to read output CSV: {}",
                    e
                )));
            }
        };

        let total_count = leads.len();
        let results = self.filter(&leads, &request.filters);

        info!(
            "Processed {}: {} leads, {} after filtering in {}ms",
            request.input_file.display(),
            total_count,
            results.len(),
            start_time.elapsed().as_millis()
        );

        Ok(ProcessOutcome::Completed(ProcessReport::new(
            total_count,
            results,
            output_file,
        )))
    }

    /// Apply filters to already enriched leads
    pub fn filter(&self, leads: &[EnrichedLead], filters: &LeadFilters) -> Vec<EnrichedLead> {
        lead_filter::apply_lead_filters(leads, filters)
    }

    /// Write leads to `path` as CSV
    pub fn export(&self, leads: &[EnrichedLead], path: &Path) -> Result<()> {
        lead_csv::export_leads(leads, path)
    }
}

/// Parse an enrichment output file off the async runtime
async fn read_leads_blocking(path: PathBuf) -> Result<Vec<EnrichedLead>> {
    task::spawn_blocking(move || lead_csv::read_enriched_csv(&path))
        .await
        .map_err(|e| Error::processing_interrupted(format!("CSV reader task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::EnrichmentStrategy;
    use crate::app::services::enrichment::EnrichmentError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const ENRICHED: &str = "\
forename,company_name,company_location,google_reviews,email,phone_number
Anna,Acme Roofing,Leeds,42,anna@acme.example,0113 496 0000
Ben,Brick & Co,London,7,,020 7946 0001
Cara,Cara's Cafe,London,15,cara@cafe.example,
Dan,Short,Derby
";

    /// Writes fixed content to the job's output path and records the jobs it saw
    #[derive(Default)]
    struct FixedOutputEnricher {
        content: String,
        jobs: Mutex<Vec<EnrichmentJob>>,
    }

    impl FixedOutputEnricher {
        fn new(content: &str) -> Self {
            Self {
                content: content.to_string(),
                jobs: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Enricher for FixedOutputEnricher {
        async fn enrich(
            &self,
            job: &EnrichmentJob,
            _cancel: &CancellationToken,
        ) -> std::result::Result<PathBuf, EnrichmentError> {
            self.jobs.lock().unwrap().push(job.clone());
            std::fs::write(&job.output_file, &self.content).map_err(EnrichmentError::Wait)?;
            Ok(job.output_file.clone())
        }
    }

    /// Always fails as if cancelled
    struct CancelledEnricher;

    #[async_trait]
    impl Enricher for CancelledEnricher {
        async fn enrich(
            &self,
            _job: &EnrichmentJob,
            _cancel: &CancellationToken,
        ) -> std::result::Result<PathBuf, EnrichmentError> {
            Err(EnrichmentError::Cancelled)
        }
    }

    /// Reports success without writing anything
    struct NoOutputEnricher;

    #[async_trait]
    impl Enricher for NoOutputEnricher {
        async fn enrich(
            &self,
            job: &EnrichmentJob,
            _cancel: &CancellationToken,
        ) -> std::result::Result<PathBuf, EnrichmentError> {
            Ok(job.output_file.clone())
        }
    }

    fn setup(enricher: Arc<dyn Enricher>) -> (TempDir, LeadProcessor, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("leads.csv");
        std::fs::write(&input, "title,website\nAcme,https://acme.example\n").unwrap();
        let processor = LeadProcessor::new(temp_dir.path(), enricher);
        (temp_dir, processor, input)
    }

    #[tokio::test]
    async fn test_process_filters_enriched_output() {
        let enricher = Arc::new(FixedOutputEnricher::new(ENRICHED));
        let (_temp_dir, processor, input) = setup(enricher.clone());

        let request = ProcessRequest::new(&input).with_filters(LeadFilters {
            exclude_no_email: true,
            ..Default::default()
        });
        let outcome = processor
            .process(request, &CancellationToken::new())
            .await
            .unwrap();

        let report = outcome.report().expect("processing should succeed");
        assert_eq!(report.total_count, 3);
        assert_eq!(report.filtered_count, 2);
        assert_eq!(report.results[0].forename, "Anna");
        assert_eq!(report.results[1].forename, "Cara");
        assert!(report.output_file.starts_with(processor.scratch_dir()));
        assert!(report.output_file.exists());

        let jobs = enricher.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].input_file, input);
        assert_eq!(jobs[0].strategy, EnrichmentStrategy::Http);
    }

    #[tokio::test]
    async fn test_process_passes_browser_strategy() {
        let enricher = Arc::new(FixedOutputEnricher::new(ENRICHED));
        let (_temp_dir, processor, input) = setup(enricher.clone());

        let request = ProcessRequest::new(&input).with_playwright(true);
        let outcome = processor
            .process(request, &CancellationToken::new())
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(
            enricher.jobs.lock().unwrap()[0].strategy,
            EnrichmentStrategy::Browser
        );
    }

    #[tokio::test]
    async fn test_missing_input_is_soft_failure() {
        let enricher = Arc::new(FixedOutputEnricher::new(ENRICHED));
        let (temp_dir, processor, _input) = setup(enricher.clone());

        let request = ProcessRequest::new(temp_dir.path().join("nope.csv"));
        let outcome = processor
            .process(request, &CancellationToken::new())
            .await
            .unwrap();

        assert!(!outcome.is_success());
        assert!(outcome.error().unwrap().contains("Input file not found"));
        assert!(enricher.jobs.lock().unwrap().is_empty());
        assert!(!processor.scratch_dir().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_inaccessible_input_reports_cause() {
        let enricher = Arc::new(FixedOutputEnricher::new(ENRICHED));
        let (_temp_dir, processor, input) = setup(enricher.clone());

        // A regular file used as a directory fails with ENOTDIR, not NotFound
        let request = ProcessRequest::new(input.join("leads.csv"));
        let outcome = processor
            .process(request, &CancellationToken::new())
            .await
            .unwrap();

        let error = outcome.error().unwrap();
        assert!(error.starts_with("Cannot access input file"), "{}", error);
        assert!(!error.contains("not found"));
        assert!(enricher.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enrichment_failure_is_soft_failure() {
        let (_temp_dir, processor, input) = setup(Arc::new(CancelledEnricher));

        let outcome = processor
            .process(ProcessRequest::new(&input), &CancellationToken::new())
            .await
            .unwrap();

        let error = outcome.error().expect("should fail");
        assert!(error.starts_with("Failed to run enrichment script"));
        assert!(error.contains("cancelled"));
    }

    #[tokio::test]
    async fn test_missing_output_is_soft_failure() {
        let (_temp_dir, processor, input) = setup(Arc::new(NoOutputEnricher));

        let outcome = processor
            .process(ProcessRequest::new(&input), &CancellationToken::new())
            .await
            .unwrap();

        assert!(
            outcome
                .error()
                .unwrap()
                .starts_with("Failed to read output CSV")
        );
    }

    #[tokio::test]
    async fn test_empty_output_is_success_with_no_leads() {
        let enricher = Arc::new(FixedOutputEnricher::new(
            "forename,company_name,company_location,google_reviews,email,phone_number\n",
        ));
        let (_temp_dir, processor, input) = setup(enricher);

        let outcome = processor
            .process(ProcessRequest::new(&input), &CancellationToken::new())
            .await
            .unwrap();

        let report = outcome.report().unwrap();
        assert_eq!(report.total_count, 0);
        assert!(report.results.is_empty());
    }

    #[tokio::test]
    async fn test_unwritable_scratch_dir_is_hard_error() {
        let (temp_dir, processor, input) =
            setup(Arc::new(FixedOutputEnricher::new(ENRICHED)));
        // A regular file where the scratch directory should be
        std::fs::write(temp_dir.path().join(SCRATCH_DIR_NAME), "not a dir").unwrap();

        let result = processor
            .process(ProcessRequest::new(&input), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_calls_use_distinct_outputs() {
        let enricher = Arc::new(FixedOutputEnricher::new(ENRICHED));
        let (_temp_dir, processor, input) = setup(enricher.clone());
        let cancel = CancellationToken::new();

        let (first, second) = tokio::join!(
            processor.process(ProcessRequest::new(&input), &cancel),
            processor.process(ProcessRequest::new(&input), &cancel),
        );

        let first = first.unwrap().into_report().unwrap();
        let second = second.unwrap().into_report().unwrap();
        assert_ne!(first.output_file, second.output_file);
        assert_eq!(first.results, second.results);
    }

    #[test]
    fn test_filter_and_export_round_trip() {
        let (temp_dir, processor, _input) =
            setup(Arc::new(FixedOutputEnricher::new(ENRICHED)));
        let leads = lead_csv::parse_enriched_leads(ENRICHED.as_bytes(), "fixture").unwrap();

        let london = processor.filter(
            &leads,
            &LeadFilters {
                location: "LONDON".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(london.len(), 2);

        let path = temp_dir.path().join("london.csv");
        processor.export(&london, &path).unwrap();

        assert_eq!(lead_csv::read_enriched_csv(&path).unwrap(), london);
    }
}
