use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A single (target, port) pair waiting in the task channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub target: Arc<str>,
    pub port: u16,
}

impl Probe {
    pub fn new(target: Arc<str>, port: u16) -> Self {
        Self { target, port }
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.target.contains(':') {
            write!(f, "[{}]:{}", self.target, self.port)
        } else {
            write!(f, "{}:{}", self.target, self.port)
        }
    }
}

/// Outcome of one probe. A closed port never carries a banner.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub target: String,
    pub port: u16,
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl ScanResult {
    pub fn open(probe: &Probe, banner: Option<String>) -> Self {
        Self {
            target: probe.target.to_string(),
            port: probe.port,
            open: true,
            banner,
        }
    }

    pub fn closed(probe: &Probe) -> Self {
        Self {
            target: probe.target.to_string(),
            port: probe.port,
            open: false,
            banner: None,
        }
    }
}

/// Aggregate figures, computed once after every probe has reported.
#[derive(Serialize, Debug, Clone)]
pub struct ScanSummary {
    pub total_ports: u64,
    pub open_ports: u64,
    #[serde(serialize_with = "duration_as_nanos")]
    pub time_taken: Duration,
    pub started_at: String,
    pub targets: Vec<String>,
    pub port_range: String,
    pub worker_count: usize,
}

/// Everything a scan produces; also the layout of the JSON document.
#[derive(Serialize, Debug, Clone)]
pub struct ScanReport {
    pub results: Vec<ScanResult>,
    pub summary: ScanSummary,
}

impl ScanReport {
    pub fn open_results(&self) -> impl Iterator<Item = &ScanResult> {
        self.results.iter().filter(|r| r.open)
    }
}

fn duration_as_nanos<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
}
