// src/exec/output.rs

/// Output from one run of the refinement executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Standard output from the process
    pub stdout: Vec<u8>,
    /// Standard error from the process
    pub stderr: Vec<u8>,
    /// Exit code from the process (None if killed or terminated by signal)
    pub exit_code: Option<i32>,
    /// Whether the run hit the timeout and was killed
    pub timed_out: bool,
}

impl ToolOutput {
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>, timed_out: bool) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
            timed_out,
        }
    }

    /// A run that completed with exit code 0 and no output.
    pub fn success() -> Self {
        Self::new(Vec::new(), Vec::new(), Some(0), false)
    }

    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}
