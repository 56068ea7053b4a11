//! TCP connect port scanning.

use async_trait::async_trait;
use futures_util::future::join_all;
use reconguard_core::{PortRecord, PortState};
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::{ReconError, ReconResult};

/// Probes ports on a host
#[async_trait]
pub trait PortScanner: Send + Sync {
    /// One record per probed port, ordered by port number
    async fn scan(&self, target: &str) -> ReconResult<Vec<PortRecord>>;
}

/// Port scanning configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Ports to scan
    pub ports: PortSpec,
    /// Timeout per probe
    pub timeout: Duration,
    /// Maximum concurrent probes
    pub concurrent: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ports: PortSpec::Top20,
            timeout: Duration::from_millis(1500),
            concurrent: 20,
        }
    }
}

/// Port specification for scanning
#[derive(Debug, Clone, Default)]
pub enum PortSpec {
    /// nmap's 20 most common TCP ports
    #[default]
    Top20,
    /// Custom port range
    Range(std::ops::RangeInclusive<u16>),
    /// Specific list of ports
    List(Vec<u16>),
}

impl PortSpec {
    /// Convert to a deduplicated, sorted list of ports
    #[must_use]
    pub fn to_ports(&self) -> Vec<u16> {
        let mut ports = match self {
            Self::Top20 => TOP_20_PORTS.to_vec(),
            Self::Range(r) => r.clone().collect(),
            Self::List(l) => l.clone(),
        };
        ports.sort_unstable();
        ports.dedup();
        ports
    }
}

/// TCP connect scanner. Needs no raw sockets.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScanConfig,
}

impl Scanner {
    /// Create a new scanner with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with custom configuration
    #[must_use]
    pub const fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Set the ports to scan
    #[must_use]
    pub fn ports(mut self, ports: PortSpec) -> Self {
        self.config.ports = ports;
        self
    }

    /// Set the timeout per probe
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum number of probes in flight
    #[must_use]
    pub const fn concurrent(mut self, concurrent: usize) -> Self {
        self.config.concurrent = concurrent;
        self
    }

    async fn probe_all(&self, ip: IpAddr) -> Vec<PortRecord> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrent.max(1)));
        let timeout = self.config.timeout;

        let handles = self.config.ports.to_ports().into_iter().map(|port| {
            let sem = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                let state = probe(SocketAddr::new(ip, port), timeout).await;
                PortRecord {
                    port,
                    service: service_name(port).to_string(),
                    state,
                }
            })
        });

        let mut records: Vec<PortRecord> = join_all(handles)
            .await
            .into_iter()
            .filter_map(Result::ok)
            .collect();
        records.sort_by_key(|r| r.port);
        records
    }
}

#[async_trait]
impl PortScanner for Scanner {
    async fn scan(&self, target: &str) -> ReconResult<Vec<PortRecord>> {
        let ip = resolve(target).await?;
        debug!(target, %ip, "starting TCP connect scan");
        Ok(self.probe_all(ip).await)
    }
}

async fn probe(addr: SocketAddr, timeout: Duration) -> PortState {
    match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(_)) => PortState::Open,
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => PortState::Closed,
        _ => PortState::Filtered,
    }
}

/// Resolve a target to one address, preferring IPv4
async fn resolve(target: &str) -> ReconResult<IpAddr> {
    if let Ok(ip) = target.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs: Vec<IpAddr> = tokio::net::lookup_host((target, 0))
        .await
        .map_err(|e| ReconError::Scan(format!("failed to resolve {target}: {e}")))?
        .map(|a| a.ip())
        .collect();

    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| ReconError::InvalidTarget(format!("{target} has no addresses")))
}

/// Well-known service for a port
#[must_use]
pub const fn service_name(port: u16) -> &'static str {
    match port {
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        53 => "domain",
        80 => "http",
        110 => "pop3",
        111 => "rpcbind",
        135 => "msrpc",
        139 => "netbios-ssn",
        143 => "imap",
        443 => "https",
        445 => "microsoft-ds",
        993 => "imaps",
        995 => "pop3s",
        1723 => "pptp",
        3306 => "mysql",
        3389 => "ms-wbt-server",
        5900 => "vnc",
        8080 => "http-proxy",
        _ => "unknown",
    }
}

// nmap top 20 TCP ports
const TOP_20_PORTS: [u16; 20] = [
    21, 22, 23, 25, 53, 80, 110, 111, 135, 139, 143, 443, 445, 993, 995, 1723, 3306, 3389, 5900,
    8080,
];
