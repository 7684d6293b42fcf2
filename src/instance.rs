// src/instance.rs

//! Single-instance guard based on a pid marker file.
//!
//! The marker holds the pid of the instance that wrote it. A second launch
//! refuses to start while that pid is alive and is this same program running
//! from the same working directory. Stale or unreadable markers are simply
//! overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::{debug, info};

use crate::errors::{BatchError, Result};

/// File name of the marker inside the application directory.
pub const PID_FILE_NAME: &str = "app.pid";

/// Holds the marker for as long as this instance runs.
#[derive(Debug)]
pub struct InstanceGuard {
    marker: PathBuf,
    pid: u32,
}

impl InstanceGuard {
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        // Only remove the marker if it is still ours.
        if read_marker(&self.marker) == Some(self.pid) {
            if let Err(e) = fs::remove_file(&self.marker) {
                debug!(marker = %self.marker.display(), error = %e, "failed to remove pid marker");
            }
        }
    }
}

/// Claim the marker at `marker`, or fail with `AlreadyRunning`.
pub fn acquire(marker: &Path) -> Result<InstanceGuard> {
    let own = std::process::id();

    if let Some(pid) = read_marker(marker) {
        if pid != own && is_same_program_here(pid) {
            info!(pid, marker = %marker.display(), "another instance is running");
            return Err(BatchError::AlreadyRunning { pid });
        }
        debug!(pid, "stale pid marker; taking over");
    }

    if let Some(parent) = marker.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(marker, own.to_string())?;

    Ok(InstanceGuard {
        marker: marker.to_path_buf(),
        pid: own,
    })
}

fn read_marker(marker: &Path) -> Option<u32> {
    fs::read_to_string(marker).ok()?.trim().parse().ok()
}

fn is_same_program_here(pid: u32) -> bool {
    let spid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[spid]),
        true,
        ProcessRefreshKind::nothing().with_cwd(UpdateKind::Always),
    );

    let Some(process) = sys.process(spid) else {
        return false;
    };

    let same_name = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_name().map(|n| n.to_os_string()))
        .is_some_and(|name| name.as_os_str() == process.name());

    // When the other process's cwd is not readable, the name decides.
    let same_cwd = match (std::env::current_dir().ok(), process.cwd()) {
        (Some(ours), Some(theirs)) => ours == theirs,
        _ => true,
    };

    same_name && same_cwd
}
