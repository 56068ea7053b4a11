//! Gateway configuration.

use reconguard_core::{GuardError, Result};
use reconguard_tools::{
    GeoClient, PortSpec, ScanConfig, Scanner, Toolbox, ToolboxBuilder, WhoisClient,
};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Configuration for a gateway instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP listen address (default: 127.0.0.1:8000).
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// `sqlite:` URL of the durable registry. None keeps the registry in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Seed entries for the general (passive) registry.
    #[serde(default = "default_scope_targets")]
    pub scope_targets: Vec<String>,

    /// The lab-only allow-list that active probes must also pass.
    #[serde(default = "default_lab_targets")]
    pub lab_targets: Vec<String>,

    /// Upper bound on each collaborator call (seconds).
    #[serde(default = "default_collaborator_timeout")]
    pub collaborator_timeout_secs: u64,

    /// Geolocation API settings.
    #[serde(default)]
    pub geo: GeoSettings,

    /// Port scanner settings.
    #[serde(default)]
    pub scanner: ScannerSettings,
}

/// Geolocation API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoSettings {
    /// API base URL (default: http://ip-api.com).
    #[serde(default = "default_geo_base_url")]
    pub base_url: String,

    /// Client-side request budget.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

/// Port scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Ports to probe. Empty means the nmap top 20.
    #[serde(default)]
    pub ports: Vec<u16>,

    /// Per-port connect timeout (milliseconds).
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,

    /// Maximum probes in flight.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            database_url: None,
            scope_targets: default_scope_targets(),
            lab_targets: default_lab_targets(),
            collaborator_timeout_secs: default_collaborator_timeout(),
            geo: GeoSettings::default(),
            scanner: ScannerSettings::default(),
        }
    }
}

impl Default for GeoSettings {
    fn default() -> Self {
        Self {
            base_url: default_geo_base_url(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            ports: Vec::new(),
            probe_timeout_ms: default_probe_timeout(),
            concurrency: default_concurrency(),
        }
    }
}

impl GatewayConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GuardError::Config(e.to_string()))
    }

    /// Bound applied to every collaborator call.
    #[must_use]
    pub const fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }

    /// Scanner configuration derived from these settings.
    #[must_use]
    pub fn scan_config(&self) -> ScanConfig {
        let ports = if self.scanner.ports.is_empty() {
            PortSpec::Top20
        } else {
            PortSpec::List(self.scanner.ports.clone())
        };
        ScanConfig {
            ports,
            timeout: Duration::from_millis(self.scanner.probe_timeout_ms),
            concurrent: self.scanner.concurrency,
        }
    }

    /// Toolbox builder with the geolocation, WHOIS and scan clients configured.
    ///
    /// WHOIS queries share the collaborator timeout. DNS uses its default
    /// unless the caller sets it.
    pub fn toolbox_builder(&self) -> Result<ToolboxBuilder> {
        let geo = GeoClient::builder()
            .base_url(&self.geo.base_url)
            .requests_per_minute(self.geo.requests_per_minute)
            .build()
            .map_err(|e| GuardError::Config(e.to_string()))?;
        let whois = WhoisClient::new()
            .map_err(|e| GuardError::Config(e.to_string()))?
            .with_timeout(self.collaborator_timeout());

        Ok(Toolbox::builder()
            .with_geo(geo)
            .with_whois(whois)
            .with_scanner(Scanner::with_config(self.scan_config())))
    }
}

// Default value functions for serde.
const fn default_listen() -> SocketAddr {
    SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::LOCALHOST), 8000)
}

fn default_scope_targets() -> Vec<String> {
    ["127.0.0.1", "localhost", "scanme.nmap.org"]
        .map(String::from)
        .to_vec()
}

fn default_lab_targets() -> Vec<String> {
    ["scanme.nmap.org", "localhost", "127.0.0.1"]
        .map(String::from)
        .to_vec()
}

const fn default_collaborator_timeout() -> u64 {
    20
}

fn default_geo_base_url() -> String {
    String::from("http://ip-api.com")
}

const fn default_requests_per_minute() -> u32 {
    45
}

const fn default_probe_timeout() -> u64 {
    1500
}

const fn default_concurrency() -> usize {
    20
}
