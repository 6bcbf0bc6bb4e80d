use anyhow::{ensure, Result};
use tracing::warn;

/// Split a comma-separated `--ports` value into raw port numbers.
///
/// Tokens that are not integers are skipped with a warning. Range checks
/// happen later, during configuration validation, so `0` and `65536` are
/// passed through here and rejected there.
///
/// A value with no usable token at all is an error: an empty explicit list
/// would otherwise fall back to the start/end range.
pub fn parse_port_list(s: &str) -> Result<Vec<u32>> {
    let ports: Vec<u32> = s
        .split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty())
        .filter_map(|tok| match tok.parse::<u32>() {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(token = tok, error = %e, "ignoring non-numeric port");
                None
            }
        })
        .collect();
    ensure!(!ports.is_empty(), "no valid ports in list: {s:?}");
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_trims_and_skips_garbage() {
        assert_eq!(parse_port_list("80, 443,abc,,22").unwrap(), vec![80, 443, 22]);
    }

    #[test]
    fn list_passes_out_of_range_through() {
        assert_eq!(parse_port_list("0,65536").unwrap(), vec![0, 65536]);
    }

    #[test]
    fn list_without_any_number_is_rejected() {
        assert!(parse_port_list("http,ssh").is_err());
        assert!(parse_port_list(" , ").is_err());
    }
}
