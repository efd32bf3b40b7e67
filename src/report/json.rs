// src/report/json.rs
// Writes the report as a single JSON object to <base_name>.json

use super::{output_path, write_file, Report, ReportWriter};
use crate::error::ReportError;
use std::path::PathBuf;

pub struct JsonReportWriter;

impl ReportWriter for JsonReportWriter {
    fn write(&self, base_name: &str, report: &Report) -> Result<PathBuf, ReportError> {
        let path = output_path(base_name, "json");
        let json = serde_json::to_vec(report)?;
        write_file(&path, &json)?;
        Ok(path)
    }
}
