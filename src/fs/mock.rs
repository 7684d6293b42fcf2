// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    /// Child file names, unordered.
    Dir(Vec<String>),
}

/// In-memory filesystem for tests.
///
/// Clones share the same underlying tree, so a test can keep one handle
/// for assertions while the orchestrator owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    tree: Arc<Mutex<HashMap<PathBuf, Node>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let root = HashMap::from([(PathBuf::from("."), Node::Dir(Vec::new()))]);
        Self {
            tree: Arc::new(Mutex::new(root)),
        }
    }

    /// Create or overwrite a file, creating missing parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut tree = self.lock();
        tree.insert(path.to_path_buf(), Node::File(contents.into()));
        Self::link_into_parent(&mut tree, path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut tree = self.lock();
        Self::ensure_dir_entry(&mut tree, path.as_ref());
    }

    /// Contents of a file as UTF-8, if it exists.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.lock().get(path.as_ref()) {
            Some(Node::File(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// All file paths currently stored, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let tree = self.lock();
        let mut paths: Vec<PathBuf> = tree
            .iter()
            .filter(|(_, entry)| matches!(entry, Node::File(_)))
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort();
        paths
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Node>> {
        // A poisoned lock only means another test thread panicked.
        self.tree.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn parent_of(path: &Path) -> Option<&Path> {
        path.parent().map(|parent| {
            if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            }
        })
    }

    fn link_into_parent(tree: &mut HashMap<PathBuf, Node>, path: &Path) {
        let Some(parent) = Self::parent_of(path) else {
            return;
        };
        if parent == path {
            return;
        }
        Self::ensure_dir_entry(tree, parent);
        if let Some(Node::Dir(children)) = tree.get_mut(parent) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn ensure_dir_entry(tree: &mut HashMap<PathBuf, Node>, path: &Path) {
        if tree.contains_key(path) {
            return;
        }
        tree.insert(path.to_path_buf(), Node::Dir(Vec::new()));
        Self::link_into_parent(tree, path);
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let tree = self.lock();
        match tree.get(path) {
            Some(Node::File(bytes)) => String::from_utf8(bytes.clone())
                .map_err(|e| anyhow!("{} is not UTF-8: {e}", path.display())),
            Some(Node::Dir(_)) => Err(anyhow!("{} is a directory", path.display())),
            None => Err(anyhow!("{} does not exist", path.display())),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn append(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut tree = self.lock();
        match tree.get_mut(path) {
            Some(Node::File(existing)) => {
                existing.extend_from_slice(contents);
                Ok(())
            }
            Some(Node::Dir(_)) => Err(anyhow!("{} is a directory", path.display())),
            None => {
                tree.insert(path.to_path_buf(), Node::File(contents.to_vec()));
                Self::link_into_parent(&mut tree, path);
                Ok(())
            }
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut tree = self.lock();
        match tree.get(path) {
            Some(Node::File(_)) => {
                tree.remove(path);
                if let Some(parent) = Self::parent_of(path) {
                    if let (Some(Node::Dir(children)), Some(name)) = (
                        tree.get_mut(parent),
                        path.file_name().and_then(|n| n.to_str()),
                    ) {
                        children.retain(|c| c != name);
                    }
                }
                Ok(())
            }
            Some(Node::Dir(_)) => Err(anyhow!("{} is a directory", path.display())),
            None => Err(anyhow!("{} does not exist", path.display())),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(Node::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(Node::Dir(_)))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let tree = self.lock();
        match tree.get(path) {
            Some(Node::Dir(children)) => {
                let mut entries: Vec<PathBuf> =
                    children.iter().map(|name| path.join(name)).collect();
                entries.sort();
                Ok(entries)
            }
            _ => Err(anyhow!("{} is not a directory", path.display())),
        }
    }
}
