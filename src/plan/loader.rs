// src/plan/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{BatchError, Result};
use crate::plan::model::PlanFile;
use crate::plan::patterns::{compile_glob, DEFAULT_PATTERN_GLOB};
use crate::plan::{Plan, PlannedTask};

/// Load a plan file and resolve it against its own directory.
pub fn load_plan(path: impl AsRef<Path>) -> Result<Plan> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let file: PlanFile = toml::from_str(&contents)?;

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    resolve_plan(file, base_dir)
}

/// Apply defaults and resolve relative paths against `base_dir`.
pub fn resolve_plan(file: PlanFile, base_dir: PathBuf) -> Result<Plan> {
    if file.task.is_empty() {
        return Err(BatchError::Config(
            "plan must contain at least one [task.<name>] section".to_string(),
        ));
    }

    let defaults = file.defaults;
    let mut tasks = Vec::with_capacity(file.task.len());

    for (name, task) in file.task {
        if task.template.trim().is_empty() {
            return Err(BatchError::Config(format!(
                "task '{name}' has an empty `template`"
            )));
        }

        let pattern_glob = task
            .pattern_glob
            .or_else(|| defaults.pattern_glob.clone())
            .unwrap_or_else(|| DEFAULT_PATTERN_GLOB.to_string());
        compile_glob(&pattern_glob)?;

        let resolve = |p: &PathBuf| resolve_path(&base_dir, p);

        tasks.push(PlannedTask {
            name,
            template: task.template,
            patterns: task.patterns.iter().map(resolve).collect(),
            pattern_dirs: task.pattern_dirs.iter().map(resolve).collect(),
            pattern_glob,
            output: task.output.or_else(|| defaults.output.clone()).as_ref().map(resolve),
            program: task.program.or_else(|| defaults.program.clone()).as_ref().map(resolve),
        });
    }

    Ok(Plan { base_dir, tasks })
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
