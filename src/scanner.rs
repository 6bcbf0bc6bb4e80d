use crate::config::ScanConfig;
use crate::types::{Probe, ScanReport, ScanResult, ScanSummary};
use ::time::{format_description::well_known, OffsetDateTime};
use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// Upper bound on the bytes read while grabbing a banner.
pub const BANNER_BUF_LEN: usize = 1024;

/// Opens outbound connections for the worker pool.
///
/// Implementations do not need to enforce a deadline themselves: workers
/// wrap every `connect` call in the configured timeout.
#[async_trait]
pub trait Dialer: Send + Sync + 'static {
    type Stream: AsyncRead + Unpin + Send;

    async fn connect(&self, host: &str, port: u16) -> io::Result<Self::Stream>;
}

/// Plain TCP connect, resolving host names through the system resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpDialer;

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        TcpStream::connect((host, port)).await
    }
}

/// Scan every (target, port) pair in `config` over plain TCP.
pub async fn run_scan(config: &ScanConfig) -> Result<ScanReport> {
    run_scan_with(config, TcpDialer).await
}

/// Scan every (target, port) pair in `config` using `dialer` for connects.
///
/// - `config.workers()` tasks pull probes from a bounded task channel, so at
///   most that many connection attempts are in flight at once.
/// - A collector task owns the result list and hands it back on completion.
/// - Workers are joined first, then the result channel is closed and the
///   collector is joined, then the summary is computed.
///
/// The returned results are in completion order. Failing to connect is a
/// normal outcome (`open: false`); an `Err` here means an internal task died.
pub async fn run_scan_with<D: Dialer>(config: &ScanConfig, dialer: D) -> Result<ScanReport> {
    let config = Arc::new(config.clone());
    let dialer = Arc::new(dialer);
    let capacity = config.channel_capacity();

    let (task_tx, task_rx) = mpsc::channel::<Probe>(capacity);
    let (result_tx, result_rx) = mpsc::channel::<ScanResult>(capacity);
    let task_rx = Arc::new(Mutex::new(task_rx));

    let expected = usize::try_from(config.total_probes()).unwrap_or(usize::MAX);
    let collector = tokio::spawn(collect_results(result_rx, expected));

    let mut workers = JoinSet::new();
    for id in 0..config.workers() {
        workers.spawn(worker(
            id,
            Arc::clone(&dialer),
            Arc::clone(&task_rx),
            result_tx.clone(),
            config.timeout(),
        ));
    }
    // Only workers hold the task receiver, so the generator cannot block
    // forever if every worker has gone away.
    drop(task_rx);

    info!(
        targets = config.targets().len(),
        ports = %config.ports(),
        workers = config.workers(),
        timeout_secs = config.timeout().as_secs(),
        "starting scan"
    );
    let started_at = now_rfc3339();
    let start = Instant::now();
    let generator = tokio::spawn(generate_probes(Arc::clone(&config), task_tx));

    let mut probed = 0u64;
    while let Some(joined) = workers.join_next().await {
        probed += joined.context("scan worker terminated abnormally")?;
    }
    drop(result_tx);
    generator
        .await
        .context("probe generator terminated abnormally")?;
    let results = collector
        .await
        .context("result collector terminated abnormally")?;
    let time_taken = start.elapsed();

    let total_ports = config.total_probes();
    ensure!(
        results.len() as u64 == total_ports,
        "collected {} results for {} probes",
        results.len(),
        total_ports
    );

    let open_ports = results.iter().filter(|r| r.open).count() as u64;
    info!(
        probed,
        open = open_ports,
        elapsed_ms = time_taken.as_millis() as u64,
        "scan finished"
    );

    let summary = ScanSummary {
        total_ports,
        open_ports,
        time_taken,
        started_at,
        targets: config.targets().iter().map(|t| t.to_string()).collect(),
        port_range: config.ports().to_string(),
        worker_count: config.workers(),
    };
    Ok(ScanReport { results, summary })
}

/// Queue every probe, targets outermost, then close the channel by dropping `tx`.
async fn generate_probes(config: Arc<ScanConfig>, tx: mpsc::Sender<Probe>) {
    for target in config.targets() {
        for port in config.ports().iter() {
            if tx.send(Probe::new(Arc::clone(target), port)).await.is_err() {
                warn!("task channel closed before all probes were queued");
                return;
            }
        }
    }
    debug!("all probes queued");
}

/// Pull probes until the task channel is closed and drained. Returns the
/// number of probes handled.
async fn worker<D: Dialer>(
    id: usize,
    dialer: Arc<D>,
    tasks: Arc<Mutex<mpsc::Receiver<Probe>>>,
    results: mpsc::Sender<ScanResult>,
    timeout: Duration,
) -> u64 {
    let mut handled = 0u64;
    loop {
        let next = tasks.lock().await.recv().await;
        let Some(probe) = next else { break };

        let result = probe_port(dialer.as_ref(), &probe, timeout).await;
        handled += 1;
        if results.send(result).await.is_err() {
            warn!(worker = id, "result channel closed, stopping worker");
            break;
        }
    }
    debug!(worker = id, probes = handled, "worker finished");
    handled
}

async fn collect_results(mut rx: mpsc::Receiver<ScanResult>, expected: usize) -> Vec<ScanResult> {
    let mut all = Vec::with_capacity(expected.min(1 << 16));
    while let Some(result) = rx.recv().await {
        all.push(result);
    }
    all
}

/// Connect to one probe and, if that succeeds, try to grab a banner.
///
/// Connect and read each get the full `timeout`. The stream is dropped,
/// closing the connection, before this returns.
pub async fn probe_port<D: Dialer>(dialer: &D, probe: &Probe, timeout: Duration) -> ScanResult {
    match time::timeout(timeout, dialer.connect(&probe.target, probe.port)).await {
        Ok(Ok(mut stream)) => {
            let banner = read_banner(&mut stream, timeout).await;
            debug!(%probe, banner = banner.as_deref().unwrap_or(""), "port open");
            ScanResult::open(probe, banner)
        }
        _ => ScanResult::closed(probe),
    }
}

/// Read whatever the peer sends first, up to [`BANNER_BUF_LEN`] bytes.
///
/// Timeout, EOF, read errors and whitespace-only data all yield `None`.
pub async fn read_banner<S>(stream: &mut S, timeout: Duration) -> Option<String>
where
    S: AsyncRead + Unpin + ?Sized,
{
    let mut buf = [0u8; BANNER_BUF_LEN];
    match time::timeout(timeout, stream.read(&mut buf)).await {
        Ok(Ok(n)) if n > 0 => {
            let text = String::from_utf8_lossy(&buf[..n]);
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
