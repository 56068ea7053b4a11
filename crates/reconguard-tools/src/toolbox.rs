//! The set of collaborators a gateway dispatches to.

use std::sync::Arc;

use crate::dns::{DnsLookup, DnsResolver};
use crate::error::ReconResult;
use crate::geo::{GeoClient, GeoLocator};
use crate::scanner::{PortScanner, Scanner};
use crate::whois::{WhoisClient, WhoisLookup};

/// One handle per lookup kind
#[derive(Clone)]
pub struct Toolbox {
    geo: Arc<dyn GeoLocator>,
    dns: Arc<dyn DnsLookup>,
    whois: Arc<dyn WhoisLookup>,
    scanner: Arc<dyn PortScanner>,
}

impl std::fmt::Debug for Toolbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolbox").finish_non_exhaustive()
    }
}

impl Toolbox {
    /// Create a builder
    #[must_use]
    pub fn builder() -> ToolboxBuilder {
        ToolboxBuilder::default()
    }

    /// Geolocation collaborator
    #[must_use]
    pub fn geo(&self) -> &dyn GeoLocator {
        self.geo.as_ref()
    }

    /// DNS collaborator
    #[must_use]
    pub fn dns(&self) -> &dyn DnsLookup {
        self.dns.as_ref()
    }

    /// WHOIS collaborator
    #[must_use]
    pub fn whois(&self) -> &dyn WhoisLookup {
        self.whois.as_ref()
    }

    /// Port scan collaborator
    #[must_use]
    pub fn scanner(&self) -> &dyn PortScanner {
        self.scanner.as_ref()
    }
}

/// Builder for a [`Toolbox`].
///
/// Collaborators left unset get the network-backed defaults.
#[derive(Default)]
pub struct ToolboxBuilder {
    geo: Option<Arc<dyn GeoLocator>>,
    dns: Option<Arc<dyn DnsLookup>>,
    whois: Option<Arc<dyn WhoisLookup>>,
    scanner: Option<Arc<dyn PortScanner>>,
}

impl ToolboxBuilder {
    /// Use this geolocation client
    #[must_use]
    pub fn with_geo(mut self, geo: impl GeoLocator + 'static) -> Self {
        self.geo = Some(Arc::new(geo));
        self
    }

    /// Use this DNS resolver
    #[must_use]
    pub fn with_dns(mut self, dns: impl DnsLookup + 'static) -> Self {
        self.dns = Some(Arc::new(dns));
        self
    }

    /// Use this WHOIS client
    #[must_use]
    pub fn with_whois(mut self, whois: impl WhoisLookup + 'static) -> Self {
        self.whois = Some(Arc::new(whois));
        self
    }

    /// Use this port scanner
    #[must_use]
    pub fn with_scanner(mut self, scanner: impl PortScanner + 'static) -> Self {
        self.scanner = Some(Arc::new(scanner));
        self
    }

    /// Build the toolbox
    pub fn build(self) -> ReconResult<Toolbox> {
        let geo = match self.geo {
            Some(geo) => geo,
            None => Arc::new(GeoClient::new()?),
        };
        let dns = match self.dns {
            Some(dns) => dns,
            None => Arc::new(DnsResolver::new()?),
        };
        let whois = match self.whois {
            Some(whois) => whois,
            None => Arc::new(WhoisClient::new()?),
        };
        let scanner = self
            .scanner
            .unwrap_or_else(|| Arc::new(Scanner::new()) as Arc<dyn PortScanner>);

        Ok(Toolbox {
            geo,
            dns,
            whois,
            scanner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconError;
    use crate::scanner::PortSpec;
    use async_trait::async_trait;
    use reconguard_core::{ARecord, GeoInfo, MxRecord, NsRecord, WhoisData};

    struct Offline;

    #[async_trait]
    impl GeoLocator for Offline {
        async fn locate(&self, _target: &str) -> ReconResult<GeoInfo> {
            Err(ReconError::Timeout)
        }
    }

    #[async_trait]
    impl DnsLookup for Offline {
        async fn a_records(&self, _domain: &str) -> ReconResult<Vec<ARecord>> {
            Ok(Vec::new())
        }

        async fn mx_records(&self, _domain: &str) -> ReconResult<Vec<MxRecord>> {
            Ok(Vec::new())
        }

        async fn ns_records(&self, _domain: &str) -> ReconResult<Vec<NsRecord>> {
            Ok(Vec::new())
        }

        async fn txt_records(&self, _domain: &str) -> ReconResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl WhoisLookup for Offline {
        async fn lookup(&self, _domain: &str) -> ReconResult<WhoisData> {
            Err(ReconError::Timeout)
        }
    }

    #[tokio::test]
    async fn test_builder_keeps_supplied_collaborators() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let toolbox = Toolbox::builder()
            .with_geo(Offline)
            .with_dns(Offline)
            .with_whois(Offline)
            .with_scanner(Scanner::new().ports(PortSpec::List(vec![port])))
            .build()
            .unwrap();

        assert!(toolbox.geo().locate("127.0.0.1").await.unwrap_err().is_timeout());
        assert!(toolbox.dns().a_records("localhost").await.unwrap().is_empty());

        let records = toolbox.scanner().scan("127.0.0.1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].port, port);
    }
}
