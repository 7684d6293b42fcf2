use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tracing::debug;
use xrdbatch::errors::{BatchError, Result};
use xrdbatch::exec::{ToolOutput, ToolRequest, ToolRunner};
use xrdbatch::fs::mock::MockFileSystem;
use xrdbatch::fs::FileSystem;
use xrdbatch::report::pattern_id;

/// What the fake tool does for one pattern.
#[derive(Debug, Clone)]
pub enum FakeRun {
    /// Write this text as the `.out` file and exit 0.
    Output(String),
    /// Exit 0 without writing an `.out` file.
    NoOutput,
    /// Hit the timeout, optionally leaving a partial `.out` file behind.
    Timeout(Option<String>),
    /// Fail to start at all.
    SpawnError(String),
}

/// A fake refinement tool that:
/// - records every request it receives
/// - finds the pattern the scratch script points at
/// - writes the canned output for that pattern next to the script.
#[derive(Debug, Clone)]
pub struct FakeToolRunner {
    fs: MockFileSystem,
    runs: HashMap<String, FakeRun>,
    default_run: FakeRun,
    requests: Arc<Mutex<Vec<ToolRequest>>>,
    patterns: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeToolRunner {
    pub fn new(fs: MockFileSystem) -> Self {
        Self {
            fs,
            runs: HashMap::new(),
            default_run: FakeRun::NoOutput,
            requests: Arc::new(Mutex::new(Vec::new())),
            patterns: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Behaviour for the pattern whose base name is `pattern_id`.
    pub fn with_run(mut self, pattern_id: &str, run: FakeRun) -> Self {
        self.runs.insert(pattern_id.to_string(), run);
        self
    }

    /// Behaviour for patterns without an explicit entry.
    pub fn with_default(mut self, run: FakeRun) -> Self {
        self.default_run = run;
        self
    }

    /// Shared log of requests; stays valid after the runner is boxed.
    pub fn requests(&self) -> Arc<Mutex<Vec<ToolRequest>>> {
        Arc::clone(&self.requests)
    }

    /// Shared log of the patterns the scratch scripts pointed at.
    pub fn patterns(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        Arc::clone(&self.patterns)
    }

    fn respond(&self, request: &ToolRequest) -> Result<ToolOutput> {
        let script = self.fs.read_to_string(&request.script)?;
        let pattern = pattern_in_script(&script).ok_or_else(|| {
            BatchError::Process(format!("scratch script {:?} has no xdd path", request.script))
        })?;
        debug!(script = %request.script.display(), pattern = %pattern.display(), "fake tool invoked");
        self.patterns.lock().unwrap().push(pattern.clone());

        let output_path = request.script.with_extension("out");
        let run = self
            .runs
            .get(&pattern_id(&pattern))
            .unwrap_or(&self.default_run);

        match run {
            FakeRun::Output(text) => {
                self.fs.add_file(&output_path, text.as_str());
                Ok(ToolOutput::success())
            }
            FakeRun::NoOutput => Ok(ToolOutput::success()),
            FakeRun::Timeout(partial) => {
                if let Some(text) = partial {
                    self.fs.add_file(&output_path, text.as_str());
                }
                Ok(ToolOutput::new(Vec::new(), Vec::new(), None, true))
            }
            FakeRun::SpawnError(msg) => Err(BatchError::Process(msg.clone())),
        }
    }
}

impl ToolRunner for FakeToolRunner {
    fn run(
        &mut self,
        request: ToolRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ToolOutput>> + Send + '_>> {
        self.requests.lock().unwrap().push(request.clone());
        let response = self.respond(&request);
        Box::pin(async move { response })
    }
}

/// The path inside the first `xdd "<path>"` clause of a patched script.
pub fn pattern_in_script(script: &str) -> Option<PathBuf> {
    let start = script.find("xdd \"")? + "xdd \"".len();
    let end = start + script[start..].find('"')?;
    Some(Path::new(&script[start..end]).to_path_buf())
}
