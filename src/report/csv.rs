// src/report/csv.rs
// =============================================================================
// Writes the report as a flat table to <base_name>.csv
//
// Layout:
//   url,status,time_duration_ms,excedded_max_time
//   <ok rows>          ..., false
//   <error rows>       ..., false
//   <slow ok rows>     ..., true
//   <slow error rows>  ..., true
//
// Slow outcomes therefore appear twice: once in their main bucket and once
// more, flagged, at the end. The header spelling and the ", " separators in
// rows match the format downstream tooling already reads.
// =============================================================================

use super::{output_path, write_file, Report, ReportWriter};
use crate::checker::ProbeOutcome;
use crate::error::ReportError;
use std::path::PathBuf;

const HEADER: &str = "url,status,time_duration_ms,excedded_max_time";

pub struct CsvReportWriter;

impl ReportWriter for CsvReportWriter {
    fn write(&self, base_name: &str, report: &Report) -> Result<PathBuf, ReportError> {
        let path = output_path(base_name, "csv");
        write_file(&path, render(report).as_bytes())?;
        Ok(path)
    }
}

fn render(report: &Report) -> String {
    let mut out = String::with_capacity(64 * (report.links_ok.len() + report.links_error.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    let sections = [
        (&report.links_ok, false),
        (&report.links_error, false),
        (&report.links_ok_slow, true),
        (&report.links_error_slow, true),
    ];

    for (outcomes, exceeded) in sections {
        for outcome in outcomes {
            out.push_str(&row(outcome, exceeded));
        }
    }

    out
}

fn row(outcome: &ProbeOutcome, exceeded: bool) -> String {
    format!(
        "{}, {}, {}, {}\n",
        outcome.url, outcome.status, outcome.elapsed_ms, exceeded
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::outcome;
    use tempfile::TempDir;

    #[test]
    fn test_empty_report_is_header_only() {
        assert_eq!(render(&Report::default()), format!("{}\n", HEADER));
    }

    #[test]
    fn test_slow_rows_come_last_and_are_flagged() {
        let report = Report {
            links_ok: vec![
                outcome("https://a.test", 200, 12),
                outcome("https://slow.test", 200, 6000),
            ],
            links_error: vec![outcome("https://b.test", 404, 30)],
            links_ok_slow: vec![outcome("https://slow.test", 200, 6000)],
            links_error_slow: vec![],
        };

        let csv = render(&report);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "url,status,time_duration_ms,excedded_max_time",
                "https://a.test, 200, 12, false",
                "https://slow.test, 200, 6000, false",
                "https://b.test, 404, 30, false",
                "https://slow.test, 200, 6000, true",
            ]
        );
    }

    #[test]
    fn test_error_slow_rows_follow_ok_slow_rows() {
        let report = Report {
            links_ok: vec![],
            links_error: vec![outcome("https://e.test", 408, 5004)],
            links_ok_slow: vec![outcome("https://o.test", 200, 5100)],
            links_error_slow: vec![outcome("https://e.test", 408, 5004)],
        };

        let csv = render(&report);
        let tail: Vec<&str> = csv.lines().skip(2).collect();
        assert_eq!(
            tail,
            vec!["https://o.test, 200, 5100, true", "https://e.test, 408, 5004, true"]
        );
    }

    #[test]
    fn test_write_uses_csv_extension() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("audit");

        let path = CsvReportWriter
            .write(base.to_str().unwrap(), &Report::default())
            .unwrap();

        assert_eq!(path, dir.path().join("audit.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), format!("{}\n", HEADER));
    }
}
