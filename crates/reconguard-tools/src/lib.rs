//! External collaborators for the recon gateway.
//!
//! Each lookup sits behind a small trait so the dispatcher can be wired with
//! real clients in production and with stubs in tests:
//!
//! - [`GeoLocator`] - IP/domain geolocation over the ip-api.com JSON API
//! - [`DnsLookup`] - A/MX/NS/TXT resolution via hickory
//! - [`WhoisLookup`] - registrar data via port-43 WHOIS
//! - [`PortScanner`] - TCP connect scan of a fixed port set
//!
//! Every operation returns a [`ReconResult`]; no collaborator panics or
//! raises on a lookup failure.

#![doc(html_root_url = "https://docs.rs/reconguard-tools/1.0.0")]

mod error;

pub mod dns;
pub mod geo;
pub mod scanner;
pub mod toolbox;
pub mod whois;

pub use dns::{DnsLookup, DnsResolver};
pub use error::{ReconError, ReconResult};
pub use geo::{GeoClient, GeoClientBuilder, GeoLocator};
pub use scanner::{PortScanner, PortSpec, ScanConfig, Scanner};
pub use toolbox::{Toolbox, ToolboxBuilder};
pub use whois::{WhoisClient, WhoisLookup};
