// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::TaskId;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Cannot find process program (TC/TP): {program:?} matches no configured tool")]
    Dispatch { program: PathBuf },

    #[error("Refinement engine {program:?} cannot be driven from the command line")]
    UnsupportedEngine { program: PathBuf },

    #[error("Template {template:?} has no `{keyword}` directive")]
    TemplateFormat { template: PathBuf, keyword: String },

    #[error("Input file does not exist: {0:?}")]
    MissingInput(PathBuf),

    #[error("Process error: {0}")]
    Process(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Task {0} has no output file")]
    OutputUnset(TaskId),

    #[error("Another instance is already running (pid {pid})")]
    AlreadyRunning { pid: u32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BatchError>;
