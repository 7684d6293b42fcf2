// src/templates/patch.rs

//! Directive substitution.
//!
//! This is a textual substitution, not a parse of the template language.
//! The clause starts at the first `xdd` keyword and runs up to (not
//! including) the next line break followed by a tab, which is how TOPAS
//! templates indent the block that follows the data directive.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{BatchError, Result};

/// Keyword that introduces the pattern-file directive.
pub const DIRECTIVE_KEYWORD: &str = "xdd";

/// Marks where the directive clause ends.
const CLAUSE_END: &str = "\n\t";

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bxdd\b").expect("directive regex is valid"));

/// Replace the directive clause of `text` so it references `pattern`.
///
/// Only the first clause is touched; every byte outside it is preserved.
/// When no clause-end marker follows the keyword the clause runs to the end
/// of the text. `template` is used for error reporting only.
pub fn patch_template(template: &Path, text: &str, pattern: &Path) -> Result<String> {
    let start = DIRECTIVE
        .find(text)
        .map(|m| m.start())
        .ok_or_else(|| BatchError::TemplateFormat {
            template: template.to_path_buf(),
            keyword: DIRECTIVE_KEYWORD.to_string(),
        })?;

    let end = text[start..]
        .find(CLAUSE_END)
        .map(|offset| start + offset)
        .unwrap_or(text.len());

    let mut patched = String::with_capacity(text.len() + pattern.as_os_str().len());
    patched.push_str(&text[..start]);
    patched.push_str(&directive_clause(pattern));
    patched.push_str(&text[end..]);
    Ok(patched)
}

fn directive_clause(pattern: &Path) -> String {
    format!("{DIRECTIVE_KEYWORD} \"{}\"", pattern.display())
}
