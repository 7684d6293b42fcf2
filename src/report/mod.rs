// src/report/mod.rs

//! Turning tool output into report rows.
//!
//! - [`row`] is the flat named-value row for one pattern.
//! - [`extract`] scrapes the refinement output text into a row.
//! - [`writer`] appends one task's rows to the CSV report.

pub mod extract;
pub mod row;
pub mod writer;

pub use extract::{extract, FIT_QUALITY_FIELD};
pub use row::{pattern_id, ResultRow, ID_FIELD};
pub use writer::{header_union, render_batch, write_batch};
