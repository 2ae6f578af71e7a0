//! Report rendering
//!
//! Turns a finished [`Report`] into plain text or JSON.

use big_log_parser::Report;
use chrono::{DateTime, Local};
use std::fmt;
use std::path::Path;

const HEAVY_RULE: &str = "═══════════════════════════════════════════════";
const LIGHT_RULE: &str = "───────────────────────────────────────────────";

/// Plain-text rendering of a report
pub struct TxtReport<'a> {
    report: &'a Report,
    source: &'a Path,
    generated_at: DateTime<Local>,
}

impl<'a> TxtReport<'a> {
    pub fn new(report: &'a Report, source: &'a Path, generated_at: DateTime<Local>) -> Self {
        Self {
            report,
            source,
            generated_at,
        }
    }
}

impl fmt::Display for TxtReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        writeln!(f, "{}", HEAVY_RULE)?;
        writeln!(f, "  BIG Device Status Report")?;
        writeln!(f, "{}", HEAVY_RULE)?;
        writeln!(f, "Source:    {}", self.source.display())?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f)?;

        writeln!(f, "BIG messages:  {}", report.total_seen)?;
        writeln!(f, "  OK:          {}", report.total_ok)?;
        writeln!(f, "  FAILED:      {}", report.total_failed)?;
        writeln!(f, "  Skipped:     {}", report.total_malformed())?;

        let healthy = report.healthy_devices();
        writeln!(f)?;
        writeln!(f, "Healthy devices ({})", healthy.len())?;
        writeln!(f, "{}", LIGHT_RULE)?;
        if healthy.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (device, count) in healthy {
            writeln!(f, "  {}  {:>6} OK", device, count)?;
        }

        writeln!(f)?;
        writeln!(f, "Failed devices ({})", report.error_catalog_by_device.len())?;
        writeln!(f, "{}", LIGHT_RULE)?;
        if report.error_catalog_by_device.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (device, errors) in report.failed_devices() {
            writeln!(f, "  {}", device)?;
            for (description, count) in errors {
                writeln!(f, "    {}: {}", description, count)?;
            }
        }

        Ok(())
    }
}

/// Plain-text rendering of a report as a string
pub fn render_txt(report: &Report, source: &Path, generated_at: DateTime<Local>) -> String {
    TxtReport::new(report, source, generated_at).to_string()
}

/// Pretty-printed JSON rendering of a report
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
