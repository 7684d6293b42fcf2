// src/report/writer.rs

//! CSV report writer.
//!
//! Every call appends one complete batch: a header line followed by one
//! record per row. The file is never re-read, so several runs against the
//! same report produce several header lines.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::fs::FileSystem;
use crate::report::row::ResultRow;

const DELIMITER: char = ',';
const LINE_END: &str = "\r\n";

/// Ordered union of all field names, first-seen order.
pub fn header_union(rows: &[ResultRow]) -> Vec<String> {
    let mut header: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !header.iter().any(|h| h == key) {
                header.push(key.to_string());
            }
        }
    }
    header
}

/// Render a header line plus one record per row. Empty for no rows.
pub fn render_batch(rows: &[ResultRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let header = header_union(rows);
    let mut out = String::new();
    push_record(&mut out, header.iter().map(String::as_str));
    for row in rows {
        push_record(
            &mut out,
            header.iter().map(|field| row.get(field).unwrap_or("")),
        );
    }
    out
}

/// Append one task's rows to `output`.
pub fn write_batch(fs: &dyn FileSystem, output: &Path, rows: &[ResultRow]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }
    fs.append(output, render_batch(rows).as_bytes())?;
    info!(output = %output.display(), rows = rows.len(), "report rows appended");
    Ok(())
}

fn push_record<'a>(out: &mut String, values: impl Iterator<Item = &'a str>) {
    for (i, value) in values.enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        push_field(out, value);
    }
    out.push_str(LINE_END);
}

fn push_field(out: &mut String, value: &str) {
    let needs_quotes = value.contains(DELIMITER)
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');
    if needs_quotes {
        out.push('"');
        out.push_str(&value.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn row(fields: &[(&str, &str)]) -> ResultRow {
        let (first, rest) = fields.split_first().expect("at least an id");
        assert_eq!(first.0, "id");
        let mut row = ResultRow::new(first.1);
        for (k, v) in rest {
            row.insert(*k, *v);
        }
        row
    }

    #[test]
    fn header_is_first_seen_union() {
        let rows = vec![
            row(&[("id", "1"), ("a", "x"), ("b", "y")]),
            row(&[("id", "2"), ("b", "z"), ("c", "w")]),
        ];
        assert_eq!(header_union(&rows), vec!["id", "a", "b", "c"]);
    }

    #[test]
    fn absent_fields_are_blank() {
        let rows = vec![
            row(&[("id", "S1"), ("r_wp", "12.34"), ("Quartz", "45.6")]),
            row(&[("id", "S2"), ("Calcite", "54.4")]),
        ];
        assert_eq!(
            render_batch(&rows),
            "id,r_wp,Quartz,Calcite\r\nS1,12.34,45.6,\r\nS2,,,54.4\r\n"
        );
    }

    #[test]
    fn values_with_delimiters_are_quoted() {
        let rows = vec![row(&[("id", "a,b"), ("Phase \"B\"", "1.0")])];
        assert_eq!(
            render_batch(&rows),
            "id,\"Phase \"\"B\"\"\"\r\n\"a,b\",1.0\r\n"
        );
    }

    #[test]
    fn repeated_batches_repeat_the_header() {
        let fs = MockFileSystem::new();
        let out = Path::new("/out/report.csv");
        let rows = vec![row(&[("id", "S1"), ("r_wp", "1.0")])];

        write_batch(&fs, out, &rows).unwrap();
        write_batch(&fs, out, &rows).unwrap();

        let text = fs.contents(out).unwrap();
        let headers = text.lines().filter(|l| *l == "id,r_wp").count();
        assert_eq!(headers, 2);
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn no_rows_writes_nothing() {
        let fs = MockFileSystem::new();
        let out = Path::new("/out/report.csv");
        write_batch(&fs, out, &[]).unwrap();
        assert!(!fs.exists(out));
    }
}
