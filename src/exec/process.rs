// src/exec/process.rs

//! Spawning the refinement executable with a timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{BatchError, Result};
use crate::exec::output::ToolOutput;

/// Wall-clock limit for one refinement run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(150);

/// How long to keep draining pipes once the process is gone.
const FINAL_READ_GRACE: Duration = Duration::from_secs(5);

/// Run `program <script>` and capture both output streams.
///
/// A run that exceeds `timeout` is killed; whatever the pipes still hold is
/// read on a best-effort basis and the result is returned with
/// `timed_out = true`. Only failing to start or wait on the process is an
/// error.
pub async fn run_tool(program: &Path, script: &Path, timeout: Duration) -> Result<ToolOutput> {
    let program_abs = std::path::absolute(program)?;
    let started = Instant::now();

    info!(
        program = %program_abs.display(),
        script = %script.display(),
        timeout_secs = timeout.as_secs(),
        "starting refinement"
    );

    let mut child = Command::new(&program_abs)
        .arg(script)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| BatchError::Process(format!("spawning {:?}: {e}", program_abs)))?;

    let stdout = spawn_reader(child.stdout.take());
    let stderr = spawn_reader(child.stderr.take());

    let (exit_code, timed_out) = tokio::select! {
        status = child.wait() => {
            let status = status
                .map_err(|e| BatchError::Process(format!("waiting for {:?}: {e}", program_abs)))?;
            (status.code(), false)
        }
        _ = tokio::time::sleep(timeout) => {
            warn!(
                program = %program_abs.display(),
                script = %script.display(),
                timeout_secs = timeout.as_secs(),
                "refinement timed out; killing process"
            );
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill timed-out process");
            }
            (None, true)
        }
    };

    let stdout = finish_reader(stdout, "stdout").await;
    let stderr = finish_reader(stderr, "stderr").await;

    let output = ToolOutput::new(stdout, stderr, exit_code, timed_out);
    if timed_out {
        info!(
            stdout = %output.stdout_string(),
            stderr = %output.stderr_string(),
            "output captured after timeout"
        );
    }

    info!(
        program = %program_abs.display(),
        exit_code = ?exit_code,
        timed_out,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "refinement finished"
    );

    Ok(output)
}

fn spawn_reader<R>(stream: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream.map(|mut stream| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = stream.read_to_end(&mut buf).await {
                debug!(error = %e, "pipe read ended with error");
            }
            buf
        })
    })
}

async fn finish_reader(handle: Option<JoinHandle<Vec<u8>>>, stream: &str) -> Vec<u8> {
    let Some(mut handle) = handle else {
        return Vec::new();
    };

    match tokio::time::timeout(FINAL_READ_GRACE, &mut handle).await {
        Ok(Ok(buf)) => buf,
        Ok(Err(e)) => {
            debug!(stream, error = %e, "pipe reader task failed");
            Vec::new()
        }
        Err(_) => {
            debug!(stream, "pipe still open after grace period; giving up");
            handle.abort();
            Vec::new()
        }
    }
}
