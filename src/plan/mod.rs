// src/plan/mod.rs

//! Batch plan files.
//!
//! A plan describes the tasks of one session, replacing the per-row widgets
//! of an interactive front-end:
//!
//! - [`model`] is the TOML data model.
//! - [`loader`] reads a plan and resolves its relative paths.
//! - [`patterns`] expands pattern directories into pattern files.
//! - [`register`] turns planned tasks into registry entries.

pub mod loader;
pub mod model;
pub mod patterns;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::registry::TaskRegistry;
use crate::templates::TemplateCatalog;
use crate::types::TaskId;

pub use loader::load_plan;
pub use model::{PlanDefaults, PlanFile, PlanTask};
pub use patterns::{collect_patterns, DEFAULT_PATTERN_GLOB};

/// A plan task with every path resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTask {
    pub name: String,
    /// Catalog display name or resolved path.
    pub template: String,
    pub patterns: Vec<PathBuf>,
    pub pattern_dirs: Vec<PathBuf>,
    pub pattern_glob: String,
    pub output: Option<PathBuf>,
    pub program: Option<PathBuf>,
}

/// A loaded plan, tasks in name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub base_dir: PathBuf,
    pub tasks: Vec<PlannedTask>,
}

/// Add every planned task to `registry`.
///
/// Templates are looked up in `catalog` by display name first, then taken as
/// paths relative to the plan directory. Tasks without a program target the
/// configured `tc_location`. A pattern directory that does not exist is
/// logged and skipped.
pub fn register(
    plan: &Plan,
    registry: &mut TaskRegistry,
    catalog: &TemplateCatalog,
    config: &Config,
    fs: &dyn FileSystem,
) -> Result<Vec<TaskId>> {
    let mut ids = Vec::with_capacity(plan.tasks.len());

    for planned in &plan.tasks {
        let template = match catalog.get(&planned.template) {
            Some(path) => path.to_path_buf(),
            None => plan.base_dir.join(&planned.template),
        };
        let program = planned
            .program
            .clone()
            .unwrap_or_else(|| config.path.tc_location.clone());

        let id = registry.create(planned.name.clone(), program, template);
        let task = registry.get_mut(id)?;
        task.add_patterns(planned.patterns.iter().cloned());

        for dir in &planned.pattern_dirs {
            if !fs.is_dir(dir) {
                warn!(task = %planned.name, dir = %dir.display(), "pattern directory is invalid; skipped");
                continue;
            }
            let found = collect_patterns(fs, dir, &planned.pattern_glob)?;
            task.add_patterns(found);
        }

        if let Some(output) = &planned.output {
            task.set_output(output.clone());
        }

        info!(
            task = %id,
            name = %planned.name,
            patterns = task.patterns().len(),
            "task registered from plan"
        );
        ids.push(id);
    }

    Ok(ids)
}
