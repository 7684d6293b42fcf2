// src/exec/scratch.rs

//! Per-pattern scratch files.
//!
//! The patched template is written to `<dir>/<unix-millis>.inp`; the tool
//! writes its results next to it as `<dir>/<unix-millis>.out`. Both files
//! are removed when the guard is dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing::debug;

use crate::fs::FileSystem;

pub const SCRIPT_EXTENSION: &str = "inp";
pub const OUTPUT_EXTENSION: &str = "out";

#[derive(Debug)]
pub struct ScratchScript {
    fs: Arc<dyn FileSystem>,
    script: PathBuf,
    output: PathBuf,
}

impl ScratchScript {
    /// Write `contents` to a fresh timestamp-named script in `dir`.
    pub fn create(fs: Arc<dyn FileSystem>, dir: &Path, contents: &str) -> Result<Self> {
        let stem = unique_stem(fs.as_ref(), dir);
        let script = dir.join(format!("{stem}.{SCRIPT_EXTENSION}"));
        let output = script.with_extension(OUTPUT_EXTENSION);

        fs.write(&script, contents.as_bytes())?;
        debug!(script = %script.display(), "scratch script written");

        Ok(Self { fs, script, output })
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Where the tool is expected to leave its output.
    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl Drop for ScratchScript {
    fn drop(&mut self) {
        for path in [&self.script, &self.output] {
            if self.fs.exists(path) {
                if let Err(e) = self.fs.remove_file(path) {
                    debug!(path = %path.display(), error = %e, "failed to remove scratch file");
                }
            }
        }
    }
}

fn unique_stem(fs: &dyn FileSystem, dir: &Path) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    let taken = |stem: &str| {
        fs.exists(&dir.join(format!("{stem}.{SCRIPT_EXTENSION}")))
            || fs.exists(&dir.join(format!("{stem}.{OUTPUT_EXTENSION}")))
    };

    let base = millis.to_string();
    if !taken(&base) {
        return base;
    }
    let mut n = 1u32;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn guard_removes_script_and_output() {
        let mock = MockFileSystem::new();
        let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());

        let (script, output) = {
            let scratch = ScratchScript::create(fs, Path::new("/work"), "xdd \"a.raw\"").unwrap();
            mock.add_file(scratch.output(), "r_wp  1.00");
            assert_eq!(
                mock.contents(scratch.script()).as_deref(),
                Some("xdd \"a.raw\"")
            );
            (scratch.script().to_path_buf(), scratch.output().to_path_buf())
        };

        assert!(!mock.exists(&script));
        assert!(!mock.exists(&output));
    }

    #[test]
    fn names_do_not_collide_within_one_millisecond() {
        let mock = MockFileSystem::new();
        let fs: Arc<dyn FileSystem> = Arc::new(mock.clone());

        let a = ScratchScript::create(fs.clone(), Path::new("/work"), "a").unwrap();
        let b = ScratchScript::create(fs, Path::new("/work"), "b").unwrap();
        assert_ne!(a.script(), b.script());
        assert_eq!(b.output().extension().unwrap(), "out");
    }
}
