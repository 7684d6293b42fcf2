// src/templates/mod.rs

//! Template scripts: the catalog of known templates and the directive
//! patcher that points a template at one pattern file.

pub mod catalog;
pub mod patch;

pub use catalog::TemplateCatalog;
pub use patch::{patch_template, DIRECTIVE_KEYWORD};
