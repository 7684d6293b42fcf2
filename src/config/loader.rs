// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::{Config, RawConfig};
use crate::errors::Result;

/// File name of the settings file inside the application directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load the settings file, substituting defaults where needed.
///
/// - Missing or empty file: defaults are used and written immediately.
/// - A section or a key is absent: it takes its default and the file is
///   rewritten so it is complete on the next launch.
/// - Malformed TOML is an error; the file is left untouched.
pub fn load_or_init(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();

    let contents = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    if contents.trim().is_empty() {
        info!(path = %path.display(), "no settings found; writing defaults");
        let cfg = Config::default();
        save(path, &cfg)?;
        return Ok(cfg);
    }

    let raw: RawConfig = toml::from_str(&contents)?;
    let complete = raw.is_complete();
    let cfg = Config::try_from(raw)?;

    if !complete {
        debug!(path = %path.display(), "settings incomplete; persisting defaults");
        save(path, &cfg)?;
    }

    Ok(cfg)
}

/// Write the whole settings file.
pub fn save(path: impl AsRef<Path>, cfg: &Config) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let text = toml::to_string(cfg)?;
    fs::write(path, text)?;
    Ok(())
}

/// Settings path for a given application directory.
pub fn default_config_path(app_dir: &Path) -> PathBuf {
    app_dir.join(CONFIG_FILE_NAME)
}
