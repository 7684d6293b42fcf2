// src/config/mod.rs

//! Durable application settings.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load the settings file, substituting and persisting defaults (`loader.rs`).
//! - Validate basic invariants like distinct tool paths (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_or_init, save};
pub use model::{
    AppearanceSection, Config, PathSection, RawAppearanceSection, RawConfig, RawPathSection,
};
