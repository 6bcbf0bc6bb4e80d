use crate::types::ScanReport;
use anyhow::{Context, Result};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Plain-text report: open ports first, then the summary block.
pub fn render_human(report: &ScanReport) -> String {
    HumanReport(report).to_string()
}

struct HumanReport<'a>(&'a ScanReport);

impl fmt::Display for HumanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let s = &report.summary;

        writeln!(f, "\n=== Open Ports ===")?;
        for r in report.open_results() {
            match &r.banner {
                Some(banner) => writeln!(f, "{}:{} - Banner: {banner}", r.target, r.port)?,
                None => writeln!(f, "{}:{}", r.target, r.port)?,
            }
        }

        writeln!(f, "\n=== Scan Summary ===")?;
        writeln!(f, "Targets: {}", s.targets.join(", "))?;
        writeln!(f, "Port range: {}", s.port_range)?;
        writeln!(f, "Total ports scanned: {}", s.total_ports)?;
        writeln!(f, "Open ports found: {}", s.open_ports)?;
        writeln!(f, "Worker count: {}", s.worker_count)?;
        writeln!(f, "Time taken: {:?}", round_to_millis(s.time_taken))
    }
}

/// Indented JSON document with `results` and `summary`.
pub fn render_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to encode scan report as JSON")
}

pub fn write_report_json(path: &Path, report: &ScanReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("failed to write JSON to {}", path.display()))?;
    Ok(())
}

fn round_to_millis(d: Duration) -> Duration {
    Duration::from_millis(((d.as_micros() + 500) / 1000) as u64)
}
