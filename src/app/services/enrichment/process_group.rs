//! Process-group control for the enrichment script
//!
//! On unix the script is spawned as the leader of a new process group, so a
//! kill reaches everything it started (a Playwright browser, helper
//! processes). Elsewhere only the direct child is killed.

use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Time the group gets to exit after SIGTERM before SIGKILL
pub const TERMINATE_GRACE: Duration = Duration::from_secs(2);

/// Spawn the command as leader of its own process group
pub fn isolate(command: &mut Command) {
    #[cfg(unix)]
    command.process_group(0);
    #[cfg(not(unix))]
    let _ = command;
}

/// Stop the child and everything in its process group, then reap it
///
/// Sends SIGTERM to the group, waits up to [`TERMINATE_GRACE`] for the
/// leader, then sends SIGKILL to whatever is left.
#[cfg(unix)]
pub async fn terminate(child: &mut Child) {
    let Some(pgid) = child.id() else {
        return;
    };

    if let Err(e) = signal_group(pgid, libc::SIGTERM) {
        warn!("Failed to send SIGTERM to process group {}: {}", pgid, e);
    }

    match tokio::time::timeout(TERMINATE_GRACE, child.wait()).await {
        Ok(Ok(status)) => debug!("Enrichment process exited after SIGTERM: {}", status),
        Ok(Err(e)) => warn!("Failed waiting for enrichment process: {}", e),
        Err(_) => debug!(
            "Enrichment process ignored SIGTERM for {:?}, sending SIGKILL",
            TERMINATE_GRACE
        ),
    }

    // Descendants may outlive the leader or ignore SIGTERM
    if let Err(e) = signal_group(pgid, libc::SIGKILL) {
        warn!("Failed to send SIGKILL to process group {}: {}", pgid, e);
    }

    if let Err(e) = child.wait().await {
        warn!("Failed to reap enrichment process: {}", e);
    }
}

#[cfg(not(unix))]
pub async fn terminate(child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!("Failed to kill enrichment process: {}", e);
    }
}

/// Kills the child's process group on drop unless disarmed
///
/// Covers the enrich future being dropped mid-run, where no `terminate`
/// call happens.
#[derive(Debug)]
pub struct GroupGuard {
    pgid: Option<u32>,
}

impl GroupGuard {
    pub fn new(child: &Child) -> Self {
        Self { pgid: child.id() }
    }

    pub fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(pgid) = self.pgid.take() {
            if let Err(e) = signal_group(pgid, libc::SIGKILL) {
                warn!("Failed to kill process group {} on drop: {}", pgid, e);
            }
        }
    }
}

/// Send `signal` to process group `pgid`; a group that is already gone is not an error
#[cfg(unix)]
fn signal_group(pgid: u32, signal: libc::c_int) -> std::io::Result<()> {
    let pgid = libc::pid_t::try_from(pgid)
        .map_err(|_| std::io::Error::from(std::io::ErrorKind::InvalidInput))?;

    // SAFETY: killpg takes plain integers and touches no memory of ours
    if unsafe { libc::killpg(pgid, signal) } == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        Ok(())
    } else {
        Err(err)
    }
}
