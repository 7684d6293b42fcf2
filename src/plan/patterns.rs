// src/plan/patterns.rs

//! Expanding pattern directories.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};

use crate::errors::{BatchError, Result};
use crate::fs::FileSystem;

/// Bruker raw files.
pub const DEFAULT_PATTERN_GLOB: &str = "*.raw";

/// Compile a file-name glob, reporting a bad one as a configuration error.
pub fn compile_glob(glob: &str) -> Result<GlobMatcher> {
    Glob::new(glob)
        .map(|g| g.compile_matcher())
        .map_err(|e| BatchError::Config(format!("invalid pattern_glob {glob:?}: {e}")))
}

/// Files directly inside `dir` whose name matches `glob`, sorted.
pub fn collect_patterns(fs: &dyn FileSystem, dir: &Path, glob: &str) -> Result<Vec<PathBuf>> {
    let matcher = compile_glob(glob)?;
    let mut found: Vec<PathBuf> = fs
        .read_dir(dir)?
        .into_iter()
        .filter(|path| fs.is_file(path))
        .filter(|path| path.file_name().is_some_and(|name| matcher.is_match(name)))
        .collect();
    found.sort();
    Ok(found)
}
