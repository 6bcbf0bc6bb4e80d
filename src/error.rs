//! Configuration errors. These are detected before any probe is generated.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no targets specified")]
    NoTargets,

    #[error("invalid start port: {0}")]
    InvalidStartPort(u32),

    #[error("invalid end port: {0}")]
    InvalidEndPort(u32),

    #[error("start port cannot be greater than end port ({start} > {end})")]
    StartAfterEnd { start: u32, end: u32 },

    #[error("invalid port in specific ports list: {0}")]
    InvalidPort(u32),

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("worker count {0} exceeds the limit of {max}", max = crate::config::MAX_WORKERS)]
    TooManyWorkers(usize),

    #[error("timeout must be at least 1 second")]
    InvalidTimeout,
}
