// src/templates/catalog.rs

//! Known template scripts, keyed by display name.
//!
//! The catalog is seeded from the `*.inp` files in the input-script
//! directory. Templates imported from elsewhere get a display name derived
//! from their file name; on a collision the first free `name(i)` is used.
//! The only guarantee is that no two entries share a display name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::fs::FileSystem;

const TEMPLATE_EXTENSION: &str = "inp";

#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    entries: BTreeMap<String, PathBuf>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from the `*.inp` files directly inside `dir`.
    pub fn scan(fs: &dyn FileSystem, dir: &Path) -> Result<Self> {
        let mut catalog = Self::new();
        if !fs.is_dir(dir) {
            debug!(dir = %dir.display(), "template directory missing; catalog is empty");
            return Ok(catalog);
        }

        for path in fs.read_dir(dir)? {
            let is_template = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION));
            if is_template && fs.is_file(&path) {
                catalog.import(path);
            }
        }

        info!(dir = %dir.display(), count = catalog.len(), "template catalog loaded");
        Ok(catalog)
    }

    /// Register a template and return its display name.
    ///
    /// Importing a path that is already registered returns the existing name.
    pub fn import(&mut self, path: impl Into<PathBuf>) -> String {
        let path = path.into();
        if let Some(name) = self.name_of(&path) {
            return name.to_string();
        }

        let base = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let name = if self.entries.contains_key(&base) {
            info!(template = %path.display(), name = %base, "template name already taken");
            let mut i = 0;
            loop {
                let candidate = format!("{base}({i})");
                if !self.entries.contains_key(&candidate) {
                    break candidate;
                }
                i += 1;
            }
        } else {
            base
        };

        self.entries.insert(name.clone(), path);
        name
    }

    /// Register a template chosen by the operator, if it is an existing file.
    pub fn import_file(
        &mut self,
        fs: &dyn FileSystem,
        path: impl Into<PathBuf>,
    ) -> Option<String> {
        let path = path.into();
        if !fs.is_file(&path) {
            warn!(template = %path.display(), "template is not a file; not imported");
            return None;
        }
        Some(self.import(path))
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    /// Resolve a display name, falling back to treating the value as a path.
    pub fn resolve(&self, name_or_path: &str) -> PathBuf {
        self.get(name_or_path)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(name_or_path))
    }

    pub fn name_of(&self, path: &Path) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, p)| p.as_path() == path)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
