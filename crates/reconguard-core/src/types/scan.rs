use serde::{Deserialize, Serialize};

/// State of a probed port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// Connection accepted
    Open,
    /// Connection refused
    Closed,
    /// No answer within the probe timeout
    Filtered,
}

impl std::fmt::Display for PortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Filtered => write!(f, "filtered"),
        }
    }
}

/// One probed port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    /// Port number
    pub port: u16,

    /// Well-known service name, or `unknown`
    pub service: String,

    /// Probe outcome
    pub state: PortState,
}

/// Response of the active scan routes: a bare list, or an error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanOutcome {
    /// Scan ran; possibly empty
    Ports(Vec<PortRecord>),
    /// Scan could not run
    Failed {
        /// Failure description
        error: String,
    },
}

/// Response of the passive combined route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveReport {
    /// Target as supplied by the caller
    pub target: String,

    /// DNS records
    pub dns: crate::DnsRecords,

    /// WHOIS report
    pub whois: crate::WhoisReport,
}
