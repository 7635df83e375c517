//! External enrichment script runner
//!
//! Runs `<runtime> <script> <input> -o <output> [--playwright]`. The child's
//! stderr is inherited so the script's progress output reaches the user;
//! stdout is discarded. The script and everything it starts are killed when
//! the caller cancels, when the optional timeout expires, or when the enrich
//! future is dropped.

use super::process_group::{self, GroupGuard};
use super::{Enricher, EnrichmentError, EnrichmentJob};
use crate::app::models::EnrichmentStrategy;
use crate::config::EnrichmentConfig;
use crate::constants::{OUTPUT_FLAG, PLAYWRIGHT_FLAG};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Enricher backed by an external script
#[derive(Debug, Clone)]
pub struct ScriptEnricher {
    runtime: String,
    script_path: PathBuf,
    timeout: Option<Duration>,
}

impl ScriptEnricher {
    /// Create a runner for `script_path` interpreted by `runtime`
    pub fn new(runtime: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        Self {
            runtime: runtime.into(),
            script_path: script_path.into(),
            timeout: None,
        }
    }

    /// Build from configuration, resolving the script location
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self::new(
            config.runtime.clone(),
            resolve_script_path(&config.script_path),
        )
        .with_timeout(config.timeout())
    }

    /// Kill the script if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Arguments passed to the runtime for `job`
    pub fn command_args(&self, job: &EnrichmentJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.script_path.clone().into(),
            job.input_file.clone().into(),
            OUTPUT_FLAG.into(),
            job.output_file.clone().into(),
        ];
        if job.strategy == EnrichmentStrategy::Browser {
            args.push(PLAYWRIGHT_FLAG.into());
        }
        args
    }

    fn spawn(&self, job: &EnrichmentJob) -> Result<Child, EnrichmentError> {
        let mut command = Command::new(&self.runtime);
        command
            .args(self.command_args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        process_group::isolate(&mut command);

        command
            .spawn()
            .map_err(|source| EnrichmentError::Spawn {
                program: self.runtime.clone(),
                source,
            })
    }
}

#[async_trait]
impl Enricher for ScriptEnricher {
    async fn enrich(
        &self,
        job: &EnrichmentJob,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, EnrichmentError> {
        if cancel.is_cancelled() {
            return Err(EnrichmentError::Cancelled);
        }

        info!(
            "Running enrichment script {} on {} ({:?})",
            self.script_path.display(),
            job.input_file.display(),
            job.strategy
        );

        let mut child = self.spawn(job)?;
        let mut guard = GroupGuard::new(&child);
        debug!("Enrichment process started with pid {:?}", child.id());

        let limit = self.timeout;

        let status = tokio::select! {
            status = child.wait() => status.map_err(EnrichmentError::Wait)?,
            _ = cancel.cancelled() => {
                process_group::terminate(&mut child).await;
                guard.disarm();
                return Err(EnrichmentError::Cancelled);
            }
            _ = tokio::time::sleep(limit.unwrap_or_default()), if limit.is_some() => {
                process_group::terminate(&mut child).await;
                guard.disarm();
                return Err(EnrichmentError::TimedOut {
                    limit: limit.unwrap_or_default(),
                });
            }
        };
        guard.disarm();

        if !status.success() {
            return Err(EnrichmentError::Exit { status });
        }

        debug!("Enrichment output written to {}", job.output_file.display());
        Ok(job.output_file.clone())
    }
}

/// Locate the enrichment script
///
/// A path that exists as given is used unchanged. Otherwise a relative path
/// is looked up by file name next to the running executable; if that does
/// not exist either, the configured path is returned for the spawn to fail
/// on.
pub fn resolve_script_path(configured: &Path) -> PathBuf {
    if configured.exists() || configured.is_absolute() {
        return configured.to_path_buf();
    }

    let beside_exe = std::env::current_exe().ok().and_then(|exe| {
        let dir = exe.parent()?;
        let name = configured.file_name()?;
        Some(dir.join(name))
    });

    match beside_exe {
        Some(candidate) if candidate.exists() => {
            debug!(
                "Using enrichment script next to executable: {}",
                candidate.display()
            );
            candidate
        }
        _ => configured.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job(strategy: EnrichmentStrategy) -> EnrichmentJob {
        EnrichmentJob {
            input_file: PathBuf::from("webdata/leads.csv"),
            output_file: PathBuf::from("webdata/temp/out.csv"),
            strategy,
        }
    }

    #[test]
    fn test_command_args_http() {
        let enricher = ScriptEnricher::new("python3", "extract_contact_emails.py");
        let args = enricher.command_args(&job(EnrichmentStrategy::Http));

        let expected: Vec<OsString> = vec![
            "extract_contact_emails.py".into(),
            "webdata/leads.csv".into(),
            "-o".into(),
            "webdata/temp/out.csv".into(),
        ];
        assert_eq!(args, expected);
    }

    #[test]
    fn test_command_args_browser_adds_playwright_flag() {
        let enricher = ScriptEnricher::new("python3", "extract_contact_emails.py");
        let args = enricher.command_args(&job(EnrichmentStrategy::Browser));

        assert_eq!(args.len(), 5);
        assert_eq!(args[4], OsString::from("--playwright"));
    }

    #[test]
    fn test_resolve_existing_script_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("enrich.py");
        std::fs::write(&script, "print('hi')").unwrap();

        assert_eq!(resolve_script_path(&script), script);
    }

    #[test]
    fn test_resolve_missing_script_falls_back_to_configured() {
        let configured = Path::new("definitely-not-here-enrich.py");
        assert_eq!(resolve_script_path(configured), configured.to_path_buf());
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_does_not_spawn() {
        let enricher = ScriptEnricher::new("definitely-not-a-runtime", "script.py");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = enricher.enrich(&job(EnrichmentStrategy::Http), &cancel).await;
        assert!(matches!(result, Err(EnrichmentError::Cancelled)));
    }

    #[tokio::test]
    async fn test_missing_runtime_is_spawn_error() {
        let enricher = ScriptEnricher::new("definitely-not-a-runtime", "script.py");
        let result = enricher
            .enrich(&job(EnrichmentStrategy::Http), &CancellationToken::new())
            .await;

        match result {
            Err(EnrichmentError::Spawn { program, .. }) => {
                assert_eq!(program, "definitely-not-a-runtime")
            }
            other => panic!("Expected Spawn error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_exit_error() {
        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("fail.sh");
        std::fs::write(&script, "exit 3\n").unwrap();

        let enricher = ScriptEnricher::new("sh", &script);
        let result = enricher
            .enrich(&job(EnrichmentStrategy::Http), &CancellationToken::new())
            .await;

        match result {
            Err(EnrichmentError::Exit { status }) => assert_eq!(status.code(), Some(3)),
            other => panic!("Expected Exit error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_process() {
        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("slow.sh");
        std::fs::write(&script, "sleep 30\n").unwrap();

        let enricher =
            ScriptEnricher::new("sh", &script).with_timeout(Some(Duration::from_millis(200)));

        let started = std::time::Instant::now();
        let result = enricher
            .enrich(&job(EnrichmentStrategy::Http), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(EnrichmentError::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    /// Whether `pid` is a live (non-zombie) process
    #[cfg(unix)]
    fn process_running(pid: u32) -> bool {
        if std::path::Path::new("/proc/self").exists() {
            // State is the first field after the parenthesised command name
            return match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
                Ok(stat) => stat
                    .rsplit(')')
                    .next()
                    .is_some_and(|rest| !rest.trim_start().starts_with('Z')),
                Err(_) => false,
            };
        }
        // SAFETY: signal 0 only checks that the pid exists
        unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_cancel_kills_background_processes_of_script() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("grandchild.pid");
        let script = temp_dir.path().join("spawns.sh");
        std::fs::write(
            &script,
            format!("sleep 60 &\necho $! > '{}'\nwait\n", pid_file.display()),
        )
        .unwrap();

        let enricher = ScriptEnricher::new("sh", &script);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let watched = pid_file.clone();
        tokio::spawn(async move {
            while !watched.exists() {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result = enricher.enrich(&job(EnrichmentStrategy::Http), &cancel).await;
        assert!(matches!(result, Err(EnrichmentError::Cancelled)));

        let grandchild: u32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while process_running(grandchild) && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(!process_running(grandchild), "pid {} still running", grandchild);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_background_processes_of_script() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("grandchild.pid");
        let script = temp_dir.path().join("spawns.sh");
        std::fs::write(
            &script,
            format!("sleep 60 &\necho $! > '{}'\nwait\n", pid_file.display()),
        )
        .unwrap();

        let enricher =
            ScriptEnricher::new("sh", &script).with_timeout(Some(Duration::from_millis(500)));
        let result = enricher
            .enrich(&job(EnrichmentStrategy::Http), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(EnrichmentError::TimedOut { .. })));

        let grandchild: u32 = std::fs::read_to_string(&pid_file)
            .unwrap()
            .trim()
            .parse()
            .unwrap();
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while process_running(grandchild) && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(!process_running(grandchild), "pid {} still running", grandchild);
    }
}
