// src/config/validate.rs

use crate::config::model::{same_program, Config, PathSection, RawConfig};
use crate::errors::{BatchError, Result};

impl TryFrom<RawConfig> for Config {
    type Error = BatchError;

    /// Fill in missing sections and keys with defaults, then validate.
    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        let cfg = Config::new_unchecked(
            raw.path.unwrap_or_default().into(),
            raw.appearance.unwrap_or_default().into(),
        );
        validate_config(&cfg)?;
        Ok(cfg)
    }
}

pub fn validate_config(cfg: &Config) -> Result<()> {
    validate_paths(&cfg.path)?;
    Ok(())
}

fn validate_paths(path: &PathSection) -> Result<()> {
    if path.inp_path.as_os_str().is_empty() {
        return Err(BatchError::Config(
            "[PATH].inp_path must not be empty".to_string(),
        ));
    }

    // Dispatch compares a task's program against both tools; identical
    // paths would make the role ambiguous.
    if same_program(&path.tc_location, &path.topas_location) {
        return Err(BatchError::Config(format!(
            "[PATH].tc_location and [PATH].topas_location are both {:?}",
            path.tc_location
        )));
    }

    Ok(())
}
