//! Allow-listed targets and scope decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalize an identifier for allow-list comparison.
///
/// Trims surrounding whitespace and lowercases. Blank input yields `None`.
#[must_use]
pub fn normalize_target(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// One allow-listed identifier (IP literal or domain name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedTarget {
    /// Normalized identifier
    pub identifier: String,

    /// When the target was registered
    pub added_at: DateTime<Utc>,
}

impl AuthorizedTarget {
    /// Create a target registered now.
    ///
    /// Returns `None` for blank input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        Self::with_timestamp(raw, Utc::now())
    }

    /// Create a target with an explicit registration time
    #[must_use]
    pub fn with_timestamp(raw: &str, added_at: DateTime<Utc>) -> Option<Self> {
        normalize_target(raw).map(|identifier| Self {
            identifier,
            added_at,
        })
    }

    /// Returns true if the identifier is an IP literal
    #[must_use]
    pub fn is_ip(&self) -> bool {
        self.identifier.parse::<std::net::IpAddr>().is_ok()
    }
}

/// Which allow-list gates a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeTier {
    /// Lookups that never touch the target (DNS, WHOIS, geo)
    Passive,
    /// Probes that send traffic to the target; also requires the lab list
    Active,
}

impl std::fmt::Display for ScopeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passive => write!(f, "passive"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// Outcome of an authorization check. Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDecision {
    /// Whether the target may be probed
    pub allowed: bool,

    /// Normalized identifier that was checked (empty for blank input)
    pub target: String,
}

impl ScopeDecision {
    /// An approving decision
    #[must_use]
    pub fn allow(target: impl Into<String>) -> Self {
        Self {
            allowed: true,
            target: target.into(),
        }
    }

    /// A denying decision
    #[must_use]
    pub fn deny(target: impl Into<String>) -> Self {
        Self {
            allowed: false,
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_target("Example.com"), Some("example.com".into()));
        assert_eq!(normalize_target("\t127.0.0.1\n"), Some("127.0.0.1".into()));
        assert_eq!(normalize_target(""), None);
        assert_eq!(normalize_target("  "), None);
    }

    #[test]
    fn test_authorized_target() {
        let target = AuthorizedTarget::new(" ScanMe.Nmap.org ").unwrap();
        assert_eq!(target.identifier, "scanme.nmap.org");
        assert!(!target.is_ip());

        let ip = AuthorizedTarget::new("::1").unwrap();
        assert!(ip.is_ip());

        assert!(AuthorizedTarget::new("").is_none());
    }

    #[test]
    fn test_tier_serialization() {
        assert_eq!(serde_json::to_string(&ScopeTier::Passive).unwrap(), "\"passive\"");
        let tier: ScopeTier = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(tier, ScopeTier::Active);
    }
}
