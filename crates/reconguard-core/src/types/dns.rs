use serde::{Deserialize, Serialize};

/// IPv4 address record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ARecord {
    /// Dotted-quad address
    pub address: String,
}

/// Mail exchange record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    /// Preference (lower is preferred)
    pub preference: u16,

    /// Exchange host, without the trailing dot
    pub exchange: String,
}

/// Name server record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NsRecord {
    /// Name server host, without the trailing dot
    pub host: String,
}

/// Response of the DNS route.
///
/// Every list is always present; a record type that failed to resolve is
/// empty rather than omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecords {
    /// A records
    #[serde(rename = "A", default)]
    pub a: Vec<ARecord>,

    /// MX records
    #[serde(rename = "MX", default)]
    pub mx: Vec<MxRecord>,

    /// NS records
    #[serde(rename = "NS", default)]
    pub ns: Vec<NsRecord>,
}

impl DnsRecords {
    /// Returns true if no record type produced an answer
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.mx.is_empty() && self.ns.is_empty()
    }
}

/// Mail and security records as plain strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepDnsRecords {
    /// MX records rendered as `preference exchange`
    #[serde(rename = "MX", default)]
    pub mx: Vec<String>,

    /// TXT records, character strings joined
    #[serde(rename = "TXT", default)]
    pub txt: Vec<String>,

    /// NS records
    #[serde(rename = "NS", default)]
    pub ns: Vec<String>,
}

/// Response of the deep DNS route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepDnsReport {
    /// Target as supplied by the caller
    pub target: String,

    /// Records by type
    pub dns_records: DeepDnsRecords,
}

/// Strip the root label from a fully-qualified name
#[must_use]
pub fn trim_root_label(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_string()
}
