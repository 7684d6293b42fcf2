// src/report/extract.rs

//! Fixed-format extraction from the refinement engine's output file.
//!
//! The rules are plain regular expressions over the whole text; no attempt
//! is made to parse the TOPAS language. Extraction is total: text that does
//! not match simply contributes no fields.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::report::row::{ResultRow, ID_FIELD};

/// Field name of the weighted-profile residual.
pub const FIT_QUALITY_FIELD: &str = "r_wp";

static FIT_QUALITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"r_wp  (\d+\.\d+)").expect("r_wp regex is valid"));

/// `phase_name "<name>" ... MVW( <num>, <num>, <weight> )`
///
/// Refined values may carry a back-tick and an `_error` suffix, e.g.
/// ``MVW( 1.0`, 2.0`, 45.6`_0.3)``.
static PHASE_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    let num = r"\d+(?:\.\d+)?";
    let tail = r"`?(?:_\d+(?:\.\d+)?)?`?";
    let pattern = format!(
        r#"(?s)phase_name\s+"(.*?)".*?MVW\(\s*{num}{tail}\s*,\s*{num}{tail}\s*,\s*({num}){tail}\s*\)"#
    );
    Regex::new(&pattern).expect("phase weight regex is valid")
});

/// Build the result row for one pattern from the tool's output text.
///
/// Fields, in order: `id`, `r_wp` (first occurrence, if any), then one field
/// per phase name holding the third MVW value. A phase name seen twice keeps
/// its first column and the later value. Phases named like a reserved field
/// (`id`, `r_wp`) are skipped.
pub fn extract(output: &str, pattern: &Path) -> ResultRow {
    let mut row = ResultRow::for_pattern(pattern);

    if let Some(caps) = FIT_QUALITY.captures(output) {
        row.insert(FIT_QUALITY_FIELD, &caps[1]);
    }

    let mut phases = 0usize;
    for caps in PHASE_WEIGHT.captures_iter(output) {
        let name = &caps[1];
        if name == ID_FIELD || name == FIT_QUALITY_FIELD {
            warn!(
                pattern = %pattern.display(),
                phase = name,
                "phase name collides with a report field; skipped"
            );
            continue;
        }
        row.insert(name, &caps[2]);
        phases += 1;
    }

    debug!(
        pattern = %pattern.display(),
        fields = row.len(),
        phases,
        "extracted result row"
    );
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = r#"
r_exp  3.21 r_exp_dash  5.67 r_wp  12.34 r_wp_dash  20.1
xdd "C:\data\S1.raw"
	str
		phase_name "Quartz"
		scale @ 0.001`
		MVW( 60.08, 113.0`, 45.6`)
	str
		phase_name "Calcite"
		MVW( 100.09, 367.8`, 54.4`)
"#;

    #[test]
    fn extracts_fit_quality_and_phase_weights() {
        let row = extract(OUTPUT, Path::new("/data/S1.raw"));
        let fields: Vec<(&str, &str)> = row.iter().collect();
        assert_eq!(
            fields,
            vec![
                ("id", "S1"),
                ("r_wp", "12.34"),
                ("Quartz", "45.6"),
                ("Calcite", "54.4")
            ]
        );
    }

    #[test]
    fn third_mvw_value_is_the_weight() {
        let text = "phase_name \"Quartz\" x MVW( 1.0, 2.0, 45.6`)";
        let row = extract(text, Path::new("p.raw"));
        assert_eq!(row.get("Quartz"), Some("45.6"));
    }

    #[test]
    fn error_suffix_is_ignored() {
        let text = "phase_name \"Rutile\"\n\tMVW( 79.87`_0.1, 62.4`_0.01, 12.5`_0.35)";
        let row = extract(text, Path::new("p.raw"));
        assert_eq!(row.get("Rutile"), Some("12.5"));
    }

    #[test]
    fn repeated_phase_keeps_last_value() {
        let text = "phase_name \"Quartz\" MVW( 1.0, 2.0, 10.0)\n\
                    phase_name \"Quartz\" MVW( 1.0, 2.0, 45.6`)";
        let row = extract(text, Path::new("p.raw"));
        assert_eq!(row.get("Quartz"), Some("45.6"));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn unrelated_text_yields_id_only() {
        let row = extract("no refinement happened", Path::new("/x/empty.raw"));
        assert_eq!(row, ResultRow::new("empty"));
    }

    #[test]
    fn only_first_r_wp_is_used() {
        let row = extract("r_wp  1.50\nr_wp  9.99", Path::new("p.raw"));
        assert_eq!(row.get("r_wp"), Some("1.50"));
    }

    #[test]
    fn phases_named_like_reserved_fields_are_skipped() {
        let text = "r_wp  7.00\n\
                    phase_name \"id\" MVW( 1.0, 2.0, 45.6`)\n\
                    phase_name \"r_wp\" MVW( 1.0, 2.0, 99.9`)\n\
                    phase_name \"Quartz\" MVW( 1.0, 2.0, 54.4`)";
        let row = extract(text, Path::new("/d/S1.raw"));

        assert_eq!(row.id(), "S1");
        assert_eq!(row.get("r_wp"), Some("7.00"));
        assert_eq!(row.get("Quartz"), Some("54.4"));
        assert_eq!(row.len(), 3);
    }
}
