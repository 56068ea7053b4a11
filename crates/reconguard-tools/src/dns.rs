//! DNS resolution integration.

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use reconguard_core::{trim_root_label, ARecord, MxRecord, NsRecord};
use tracing::debug;

use crate::error::{ReconError, ReconResult};

/// Per-record-type DNS lookups.
///
/// Each method fails independently so a missing record type never hides
/// the others.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    /// IPv4 address records
    async fn a_records(&self, domain: &str) -> ReconResult<Vec<ARecord>>;

    /// Mail exchange records
    async fn mx_records(&self, domain: &str) -> ReconResult<Vec<MxRecord>>;

    /// Name server records
    async fn ns_records(&self, domain: &str) -> ReconResult<Vec<NsRecord>>;

    /// TXT records, character strings joined per record
    async fn txt_records(&self, domain: &str) -> ReconResult<Vec<String>>;
}

/// DNS resolver backed by hickory
#[derive(Clone)]
pub struct DnsResolver {
    resolver: TokioResolver,
}

impl DnsResolver {
    /// Create a resolver from the system configuration
    pub fn new() -> ReconResult<Self> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| ReconError::Dns(format!("failed to create resolver: {e}")))?
            .build();
        Ok(Self { resolver })
    }

    /// Wrap a preconfigured resolver
    #[must_use]
    pub const fn from_resolver(resolver: TokioResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl DnsLookup for DnsResolver {
    async fn a_records(&self, domain: &str) -> ReconResult<Vec<ARecord>> {
        let response = self.resolver.ipv4_lookup(domain).await.map_err(|e| {
            debug!(domain, error = %e, "A lookup failed");
            ReconError::Dns(e.to_string())
        })?;

        Ok(response
            .iter()
            .map(|a| ARecord {
                address: a.to_string(),
            })
            .collect())
    }

    async fn mx_records(&self, domain: &str) -> ReconResult<Vec<MxRecord>> {
        let response = self.resolver.mx_lookup(domain).await.map_err(|e| {
            debug!(domain, error = %e, "MX lookup failed");
            ReconError::Dns(e.to_string())
        })?;

        Ok(response
            .iter()
            .map(|mx| MxRecord {
                preference: mx.preference(),
                exchange: trim_root_label(&mx.exchange().to_string()),
            })
            .collect())
    }

    async fn ns_records(&self, domain: &str) -> ReconResult<Vec<NsRecord>> {
        let response = self.resolver.ns_lookup(domain).await.map_err(|e| {
            debug!(domain, error = %e, "NS lookup failed");
            ReconError::Dns(e.to_string())
        })?;

        Ok(response
            .iter()
            .map(|ns| NsRecord {
                host: trim_root_label(&ns.to_string()),
            })
            .collect())
    }

    async fn txt_records(&self, domain: &str) -> ReconResult<Vec<String>> {
        let response = self.resolver.txt_lookup(domain).await.map_err(|e| {
            debug!(domain, error = %e, "TXT lookup failed");
            ReconError::Dns(e.to_string())
        })?;

        Ok(response
            .iter()
            .map(|txt| {
                txt.iter()
                    .map(|data| String::from_utf8_lossy(data).to_string())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .collect())
    }
}
