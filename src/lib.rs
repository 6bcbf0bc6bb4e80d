//! Library crate for portsweep: a concurrent TCP connect scanner.
pub mod config;
pub mod error;
pub mod output;
pub mod ports;
pub mod scanner;
pub mod types;
