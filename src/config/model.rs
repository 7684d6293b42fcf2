// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{BatchError, Result};
use crate::types::EngineRole;

/// Settings file as read from disk, before defaults are applied.
///
/// ```toml
/// [PATH]
/// inp_path = "INP"
/// tc_location = 'C:\TOPAS5\tc.exe'
/// topas_location = 'C:\TOPAS5\Topas.exe'
///
/// [APPEARANCE]
/// theme = "clam"
/// ```
///
/// Every section and key is optional here. Anything absent is filled in
/// from the defaults and the loader writes the completed file back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(rename = "PATH", default)]
    pub path: Option<RawPathSection>,

    #[serde(rename = "APPEARANCE", default)]
    pub appearance: Option<RawAppearanceSection>,
}

impl RawConfig {
    /// True when no section and no key had to be defaulted.
    pub fn is_complete(&self) -> bool {
        self.path.as_ref().is_some_and(RawPathSection::is_complete)
            && self
                .appearance
                .as_ref()
                .is_some_and(RawAppearanceSection::is_complete)
    }
}

/// `[PATH]` as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPathSection {
    pub inp_path: Option<PathBuf>,
    pub tc_location: Option<PathBuf>,
    pub topas_location: Option<PathBuf>,
}

impl RawPathSection {
    fn is_complete(&self) -> bool {
        self.inp_path.is_some() && self.tc_location.is_some() && self.topas_location.is_some()
    }
}

impl From<RawPathSection> for PathSection {
    fn from(raw: RawPathSection) -> Self {
        Self {
            inp_path: raw.inp_path.unwrap_or_else(default_inp_path),
            tc_location: raw.tc_location.unwrap_or_else(default_tc_location),
            topas_location: raw.topas_location.unwrap_or_else(default_topas_location),
        }
    }
}

/// `[APPEARANCE]` as read from disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAppearanceSection {
    pub theme: Option<String>,
}

impl RawAppearanceSection {
    fn is_complete(&self) -> bool {
        self.theme.is_some()
    }
}

impl From<RawAppearanceSection> for AppearanceSection {
    fn from(raw: RawAppearanceSection) -> Self {
        Self {
            theme: raw.theme.unwrap_or_else(default_theme),
        }
    }
}

/// Validated settings with every section present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    #[serde(rename = "PATH")]
    pub path: PathSection,

    #[serde(rename = "APPEARANCE")]
    pub appearance: AppearanceSection,
}

impl Config {
    pub(crate) fn new_unchecked(path: PathSection, appearance: AppearanceSection) -> Self {
        Self { path, appearance }
    }

    /// Map a task's program path onto one of the two known tools.
    ///
    /// Paths are compared in absolute form, so `./tc.exe` and the absolute
    /// path to the same file dispatch identically.
    pub fn dispatch(&self, program: &Path) -> Result<EngineRole> {
        if same_program(program, &self.path.tc_location) {
            Ok(EngineRole::Tc)
        } else if same_program(program, &self.path.topas_location) {
            Ok(EngineRole::Topas)
        } else {
            Err(BatchError::Dispatch {
                program: program.to_path_buf(),
            })
        }
    }

    pub fn tool_for(&self, role: EngineRole) -> &Path {
        match role {
            EngineRole::Tc => &self.path.tc_location,
            EngineRole::Topas => &self.path.topas_location,
        }
    }

    /// Input-script directory resolved against the application directory.
    pub fn inp_dir(&self, app_dir: &Path) -> PathBuf {
        if self.path.inp_path.is_absolute() {
            self.path.inp_path.clone()
        } else {
            app_dir.join(&self.path.inp_path)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new_unchecked(PathSection::default(), AppearanceSection::default())
    }
}

/// Whether two program paths name the same file once made absolute.
pub(crate) fn same_program(a: &Path, b: &Path) -> bool {
    absolute(a) == absolute(b)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// `[PATH]` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSection {
    /// Directory scanned for `*.inp` templates at startup.
    pub inp_path: PathBuf,

    /// TOPAS command-line kernel.
    pub tc_location: PathBuf,

    /// TOPAS GUI executable.
    pub topas_location: PathBuf,
}

fn default_inp_path() -> PathBuf {
    PathBuf::from("INP")
}

fn default_tc_location() -> PathBuf {
    PathBuf::from(r"C:\TOPAS5\tc.exe")
}

fn default_topas_location() -> PathBuf {
    PathBuf::from(r"C:\TOPAS5\Topas.exe")
}

impl Default for PathSection {
    fn default() -> Self {
        Self {
            inp_path: default_inp_path(),
            tc_location: default_tc_location(),
            topas_location: default_topas_location(),
        }
    }
}

/// `[APPEARANCE]` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppearanceSection {
    pub theme: String,
}

fn default_theme() -> String {
    "clam".to_string()
}

impl Default for AppearanceSection {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}
