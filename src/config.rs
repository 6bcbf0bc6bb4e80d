use crate::error::ConfigError;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const MAX_PORT: u32 = 65_535;

/// Upper bound on concurrent workers, and so on in-flight connects.
pub const MAX_WORKERS: usize = 5_000;

/// Scan parameters as they arrive from the command line, before validation.
///
/// Numeric fields are wider than their validated counterparts so that
/// out-of-range values (port 0, port 65536, zero workers) are reported
/// instead of silently wrapping.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub targets: Vec<String>,
    pub start_port: u32,
    pub end_port: u32,
    /// Explicit ports; when non-empty they take precedence over the range.
    pub ports: Vec<u32>,
    pub workers: usize,
    pub timeout_secs: u64,
}

impl ScanRequest {
    pub fn validate(self) -> Result<ScanConfig, ConfigError> {
        let targets: Vec<Arc<str>> = self
            .targets
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(Arc::from)
            .collect();
        if targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        let ports = if self.ports.is_empty() {
            if !valid_port(self.start_port) {
                return Err(ConfigError::InvalidStartPort(self.start_port));
            }
            if !valid_port(self.end_port) {
                return Err(ConfigError::InvalidEndPort(self.end_port));
            }
            if self.start_port > self.end_port {
                return Err(ConfigError::StartAfterEnd {
                    start: self.start_port,
                    end: self.end_port,
                });
            }
            PortSelection::Range {
                start: self.start_port as u16,
                end: self.end_port as u16,
            }
        } else {
            let mut seen = HashSet::new();
            let mut list = Vec::with_capacity(self.ports.len());
            for &p in &self.ports {
                if !valid_port(p) {
                    return Err(ConfigError::InvalidPort(p));
                }
                if seen.insert(p) {
                    list.push(p as u16);
                }
            }
            PortSelection::List(list)
        };

        if self.workers < 1 {
            return Err(ConfigError::NoWorkers);
        }
        if self.workers > MAX_WORKERS {
            return Err(ConfigError::TooManyWorkers(self.workers));
        }
        if self.timeout_secs < 1 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(ScanConfig {
            targets,
            ports,
            workers: self.workers,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn valid_port(p: u32) -> bool {
    (1..=MAX_PORT).contains(&p)
}

/// Which ports every target is probed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSelection {
    /// Inclusive range, probed in ascending order.
    Range { start: u16, end: u16 },
    /// Explicit ports, probed in the configured order.
    List(Vec<u16>),
}

impl PortSelection {
    pub fn iter(&self) -> impl Iterator<Item = u16> + Send + '_ {
        let (range, list) = match self {
            PortSelection::Range { start, end } => (Some(*start..=*end), None),
            PortSelection::List(ports) => (None, Some(ports.iter().copied())),
        };
        range.into_iter().flatten().chain(list.into_iter().flatten())
    }

    pub fn len(&self) -> usize {
        match self {
            PortSelection::Range { start, end } if start <= end => usize::from(end - start) + 1,
            PortSelection::Range { .. } => 0,
            PortSelection::List(ports) => ports.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for PortSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSelection::Range { start, end } => write!(f, "{start}-{end}"),
            PortSelection::List(ports) => write!(f, "specific ports: {ports:?}"),
        }
    }
}

/// Validated, immutable scan configuration.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    targets: Vec<Arc<str>>,
    ports: PortSelection,
    workers: usize,
    timeout: Duration,
}

impl ScanConfig {
    pub fn targets(&self) -> &[Arc<str>] {
        &self.targets
    }

    pub fn ports(&self) -> &PortSelection {
        &self.ports
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Applied separately to the connect and the banner read.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn total_probes(&self) -> u64 {
        self.targets.len() as u64 * self.ports.len() as u64
    }

    /// Capacity of both the task and the result channel.
    pub fn channel_capacity(&self) -> usize {
        self.workers.clamp(1, MAX_WORKERS) * 2
    }
}
