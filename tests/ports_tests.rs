use portsweep::config::{PortSelection, ScanRequest};
use portsweep::ports::parse_port_list;

fn request_with(ports: Vec<u32>) -> ScanRequest {
    ScanRequest {
        targets: vec!["10.0.0.1".into()],
        start_port: 1,
        end_port: 1024,
        ports,
        workers: 8,
        timeout_secs: 1,
    }
}

#[test]
fn cli_list_keeps_order() {
    assert_eq!(parse_port_list("443,80,8080").unwrap(), vec![443, 80, 8080]);
}

#[test]
fn parsed_list_becomes_explicit_selection() {
    let ports = parse_port_list("22, 25,x,22").unwrap();
    let cfg = request_with(ports).validate().unwrap();
    assert_eq!(cfg.ports(), &PortSelection::List(vec![22, 25]));
}

#[test]
fn unusable_list_does_not_fall_back_to_range() {
    let err = parse_port_list("# none").unwrap_err();
    assert!(err.to_string().contains("no valid ports"));
    assert!(parse_port_list("").is_err());
}

#[test]
fn out_of_range_entry_fails_validation() {
    let ports = parse_port_list("80,70000").unwrap();
    assert!(request_with(ports).validate().is_err());
}
