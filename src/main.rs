use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use portsweep::config::ScanRequest;
use portsweep::{output, ports, scanner};

/// portsweep — concurrent TCP connect scanner with passive banner grabbing.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "portsweep",
    version,
    about = "Concurrent TCP connect scanner with passive banner grabbing.",
    long_about = None
)]
struct Cli {
    /// Single target to scan.
    #[arg(long, default_value = "scanme.nmap.org")]
    target: String,

    /// Comma-separated list of targets; overrides --target.
    #[arg(long)]
    targets: Option<String>,

    /// First port of the range.
    #[arg(long = "start-port", default_value_t = 1)]
    start_port: u32,

    /// Last port of the range (inclusive).
    #[arg(long = "end-port", default_value_t = 1024)]
    end_port: u32,

    /// Comma-separated list of specific ports; overrides the range.
    #[arg(long)]
    ports: Option<String>,

    /// Number of concurrent workers.
    #[arg(long, default_value_t = 100)]
    workers: usize,

    /// Connect and banner-read timeout in seconds.
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Print results as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Also write results as pretty JSON to this path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log progress to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn scan_request(&self) -> Result<ScanRequest> {
        let targets = match self.targets.as_deref() {
            Some(list) if !list.is_empty() => list.split(',').map(String::from).collect(),
            _ => vec![self.target.clone()],
        };

        let specific = match self.ports.as_deref() {
            Some(list) => ports::parse_port_list(list)?,
            None => Vec::new(),
        };

        Ok(ScanRequest {
            targets,
            start_port: self.start_port,
            end_port: self.end_port,
            ports: specific,
            workers: self.workers,
            timeout_secs: self.timeout,
        })
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "portsweep=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.scan_request()?.validate()?;
    let report = scanner::run_scan(&config).await?;

    if cli.json {
        println!("{}", output::render_json(&report)?);
    } else {
        print!("{}", output::render_human(&report));
    }

    if let Some(path) = cli.output.as_deref() {
        output::write_report_json(path, &report)?;
        tracing::info!(path = %path.display(), "wrote JSON report");
    }

    Ok(())
}
