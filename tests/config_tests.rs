use portsweep::config::{PortSelection, ScanRequest, MAX_WORKERS};
use portsweep::error::ConfigError;
use std::time::Duration;

fn base() -> ScanRequest {
    ScanRequest {
        targets: vec!["scanme.nmap.org".into()],
        start_port: 1,
        end_port: 1024,
        ports: Vec::new(),
        workers: 100,
        timeout_secs: 5,
    }
}

#[test]
fn defaults_validate() {
    let cfg = base().validate().expect("valid");
    assert_eq!(cfg.ports(), &PortSelection::Range { start: 1, end: 1024 });
    assert_eq!(cfg.workers(), 100);
    assert_eq!(cfg.timeout(), Duration::from_secs(5));
    assert_eq!(cfg.targets().len(), 1);
}

#[test]
fn port_bounds_are_inclusive() {
    let cfg = ScanRequest { start_port: 1, end_port: 65535, ..base() }
        .validate()
        .expect("1 and 65535 accepted");
    assert_eq!(cfg.ports().len(), 65535);

    assert!(ScanRequest { ports: vec![1, 65535], ..base() }.validate().is_ok());
}

#[test]
fn port_zero_and_65536_rejected() {
    assert_eq!(
        ScanRequest { start_port: 0, ..base() }.validate().unwrap_err(),
        ConfigError::InvalidStartPort(0)
    );
    assert_eq!(
        ScanRequest { end_port: 65536, ..base() }.validate().unwrap_err(),
        ConfigError::InvalidEndPort(65536)
    );
    assert_eq!(
        ScanRequest { ports: vec![80, 0], ..base() }.validate().unwrap_err(),
        ConfigError::InvalidPort(0)
    );
    assert_eq!(
        ScanRequest { ports: vec![65536], ..base() }.validate().unwrap_err(),
        ConfigError::InvalidPort(65536)
    );
}

#[test]
fn start_after_end_rejected() {
    let err = ScanRequest { start_port: 100, end_port: 99, ..base() }
        .validate()
        .unwrap_err();
    assert_eq!(err, ConfigError::StartAfterEnd { start: 100, end: 99 });
}

#[test]
fn range_is_not_checked_when_specific_ports_given() {
    let cfg = ScanRequest { start_port: 0, end_port: 0, ports: vec![22], ..base() }
        .validate()
        .expect("range ignored");
    assert_eq!(cfg.ports(), &PortSelection::List(vec![22]));
}

#[test]
fn empty_targets_rejected() {
    let err = ScanRequest { targets: Vec::new(), ..base() }.validate().unwrap_err();
    assert_eq!(err, ConfigError::NoTargets);
    assert_eq!(err.to_string(), "no targets specified");
}

#[test]
fn zero_workers_and_timeout_rejected() {
    assert_eq!(
        ScanRequest { workers: 0, ..base() }.validate().unwrap_err(),
        ConfigError::NoWorkers
    );
    assert_eq!(
        ScanRequest { timeout_secs: 0, ..base() }.validate().unwrap_err(),
        ConfigError::InvalidTimeout
    );
}

#[test]
fn targets_keep_order_and_are_trimmed() {
    let cfg = ScanRequest { targets: vec![" b ".into(), "a".into()], ..base() }
        .validate()
        .unwrap();
    let names: Vec<&str> = cfg.targets().iter().map(|t| &**t).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn total_probes_multiplies_targets_and_ports() {
    let cfg = ScanRequest {
        targets: vec!["a".into(), "b".into()],
        ports: vec![80, 443],
        ..base()
    }
    .validate()
    .unwrap();
    assert_eq!(cfg.total_probes(), 4);
}

#[test]
fn oversized_worker_count_rejected() {
    assert_eq!(
        ScanRequest { workers: MAX_WORKERS + 1, ..base() }.validate().unwrap_err(),
        ConfigError::TooManyWorkers(MAX_WORKERS + 1)
    );
    let err = ScanRequest { workers: usize::MAX / 2, ..base() }.validate().unwrap_err();
    assert_eq!(err, ConfigError::TooManyWorkers(usize::MAX / 2));
    assert!(err.to_string().contains("5000"));
}
