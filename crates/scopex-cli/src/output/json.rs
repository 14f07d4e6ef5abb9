//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use scopex_core::ExtractionReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

#[derive(Serialize)]
struct ExtractionOutput<'a> {
    files_extracted: usize,
    archives_expanded: usize,
    entries_skipped: usize,
    bytes_written: u64,
    scopes: Vec<&'a str>,
    duration_ms: u128,
}

impl<'a> From<&'a ExtractionReport> for ExtractionOutput<'a> {
    fn from(report: &'a ExtractionReport) -> Self {
        Self {
            files_extracted: report.files_extracted,
            archives_expanded: report.archives_expanded,
            entries_skipped: report.entries_skipped,
            bytes_written: report.bytes_written,
            scopes: report.scopes.iter().map(String::as_str).collect(),
            duration_ms: report.duration.as_millis(),
        }
    }
}

#[derive(Serialize)]
struct MessageData {
    message: String,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    /// Warnings go to stderr so stdout holds a single result document.
    fn output_stderr<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        writeln!(io::stderr(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        let output = JsonOutput::success("extract", ExtractionOutput::from(report));
        Self::output(&output)
    }

    fn format_warning(&self, message: &str) {
        let output = JsonOutput::warning(
            "warning",
            MessageData {
                message: message.to_string(),
            },
        );
        let _ = Self::output_stderr(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::time::Duration;

    #[test]
    fn test_extraction_output_structure() {
        let report = ExtractionReport {
            files_extracted: 5,
            archives_expanded: 2,
            entries_skipped: 3,
            bytes_written: 1024,
            scopes: BTreeSet::from(["alice@org.co.uk".to_string(), "Resource: 42".to_string()]),
            duration: Duration::from_millis(1500),
        };

        let output = JsonOutput::success("extract", ExtractionOutput::from(&report));
        let value: serde_json::Value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["operation"], "extract");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["files_extracted"], 5);
        assert_eq!(value["data"]["archives_expanded"], 2);
        assert_eq!(value["data"]["duration_ms"], 1500);
        assert_eq!(
            value["data"]["scopes"],
            serde_json::json!(["Resource: 42", "alice@org.co.uk"])
        );
    }

    #[test]
    fn test_warning_status() {
        let output = JsonOutput::warning(
            "warning",
            MessageData {
                message: "careful".to_string(),
            },
        );
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"status\":\"warning\""));
        assert!(json.contains("careful"));
    }
}
