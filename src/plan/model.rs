// src/plan/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level plan as read from a TOML file.
///
/// ```toml
/// [defaults]
/// output = "results.csv"
///
/// [task.quartz]
/// template = "quartz.inp"
/// patterns = ["data/S1.raw", "data/S2.raw"]
/// pattern_dirs = ["data/run2"]
/// ```
///
/// All sections are optional; a plan without tasks is rejected by the loader.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanFile {
    /// Values applied to tasks that do not set their own.
    #[serde(default)]
    pub defaults: PlanDefaults,

    /// All tasks from `[task.<name>]`.
    #[serde(default)]
    pub task: BTreeMap<String, PlanTask>,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanDefaults {
    #[serde(default)]
    pub program: Option<PathBuf>,

    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Glob applied to file names found in `pattern_dirs`.
    #[serde(default)]
    pub pattern_glob: Option<String>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanTask {
    /// Catalog display name or path to the template script.
    pub template: String,

    #[serde(default)]
    pub patterns: Vec<PathBuf>,

    /// Directories scanned (non-recursively) for pattern files.
    #[serde(default)]
    pub pattern_dirs: Vec<PathBuf>,

    #[serde(default)]
    pub pattern_glob: Option<String>,

    /// Report file; falls back to `defaults.output`, then to a prompt.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Refinement executable; falls back to `defaults.program`, then to
    /// the configured `tc_location`.
    #[serde(default)]
    pub program: Option<PathBuf>,
}
