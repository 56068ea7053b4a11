//! WHOIS lookup integration using whois-rust.

use async_trait::async_trait;
use reconguard_core::WhoisData;
use std::sync::Arc;
use std::time::Duration;
use whois_rust::{WhoIs, WhoIsLookupOptions};

use crate::error::{ReconError, ReconResult};

/// Registry replies that mean the domain does not exist
const NOT_FOUND_MARKERS: [&str; 7] = [
    "no match for",
    "domain not found",
    "not found",
    "no object found",
    "no data found",
    "no entries found",
    "status: free",
];

/// Registrar lookup for a domain
#[async_trait]
pub trait WhoisLookup: Send + Sync {
    /// Normalized registrar fields for the domain
    async fn lookup(&self, domain: &str) -> ReconResult<WhoisData>;
}

/// WHOIS client.
///
/// The underlying protocol client blocks, so each lookup runs on tokio's
/// blocking pool.
#[derive(Clone)]
pub struct WhoisClient {
    whois: Arc<WhoIs>,
    timeout: Option<Duration>,
}

impl WhoisClient {
    /// Create a new WHOIS client from the embedded server list
    pub fn new() -> ReconResult<Self> {
        let whois = WhoIs::from_string(include_str!("whois_servers.json"))
            .map_err(|e| ReconError::Whois(e.to_string()))?;
        Ok(Self {
            whois: Arc::new(whois),
            timeout: None,
        })
    }

    /// Bound each query's socket reads and writes.
    ///
    /// The blocking call cannot be cancelled from async code, so this should
    /// not exceed the caller's own deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn lookup_options(&self, domain: &str) -> ReconResult<WhoIsLookupOptions> {
        let mut options = WhoIsLookupOptions::from_string(domain)
            .map_err(|e| ReconError::Whois(e.to_string()))?;
        if self.timeout.is_some() {
            options.timeout = self.timeout;
        }
        Ok(options)
    }
}

#[async_trait]
impl WhoisLookup for WhoisClient {
    async fn lookup(&self, domain: &str) -> ReconResult<WhoisData> {
        let options = self.lookup_options(domain)?;
        let whois = Arc::clone(&self.whois);

        let raw = tokio::task::spawn_blocking(move || whois.lookup(options))
            .await
            .map_err(|e| ReconError::Whois(format!("Unexpected WHOIS error: {e}")))?
            .map_err(|e| ReconError::Whois(e.to_string()))?;

        parse_whois_response(domain, &raw)
    }
}

/// Parse a raw WHOIS reply into the normalized field set.
///
/// A reply with a not-found marker, or with no recognized field at all, is a
/// failed lookup.
fn parse_whois_response(domain: &str, raw: &str) -> ReconResult<WhoisData> {
    let mut data = WhoisData::default();

    for line in raw.lines() {
        let line = line.trim();
        if line.starts_with('%') || line.starts_with('#') || line.starts_with(">>>") {
            continue;
        }

        let lowered = line.to_lowercase();
        if NOT_FOUND_MARKERS.iter().any(|m| lowered.contains(m)) {
            return Err(not_found(domain));
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            "domain name" | "domain" => set_once(&mut data.domain_name, value),
            "registrar" | "sponsoring registrar" => set_once(&mut data.registrar, value),
            "creation date" | "created" | "registered on" | "registration time" => {
                set_once(&mut data.creation_date, value);
            }
            "registry expiry date"
            | "registrar registration expiration date"
            | "expiration date"
            | "expiry date"
            | "expires"
            | "paid-till" => set_once(&mut data.expiration_date, value),
            "updated date" | "last updated" | "last-modified" | "changed" => {
                set_once(&mut data.updated_date, value);
            }
            "name server" | "nserver" | "nameserver" => {
                push_unique(&mut data.name_servers, &value.to_lowercase());
            }
            "domain status" | "status" => {
                // Drop the trailing ICANN reference URL.
                let code = value.split_whitespace().next().unwrap_or(value);
                push_unique(&mut data.status, code);
            }
            k if k.contains("email") && value.contains('@') => {
                push_unique(&mut data.emails, &value.to_lowercase());
            }
            _ => {}
        }
    }

    if data == WhoisData::default() {
        return Err(not_found(domain));
    }
    Ok(data)
}

fn not_found(domain: &str) -> ReconError {
    ReconError::Whois(format!("No match for domain {domain}"))
}

fn set_once(slot: &mut Option<String>, value: &str) {
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
