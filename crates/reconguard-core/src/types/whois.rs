use serde::{Deserialize, Serialize};

/// Normalized registrar fields. Absent fields are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisData {
    /// Registered domain name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,

    /// Registrar name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    /// Creation date as reported by the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    /// Expiration date as reported by the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// Last update date as reported by the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,

    /// Name servers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_servers: Vec<String>,

    /// Domain status codes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,

    /// Contact emails
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
}

/// Response of the WHOIS route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisReport {
    /// Whether the lookup succeeded
    pub success: bool,

    /// Domain as supplied by the caller
    pub domain: String,

    /// Registrar fields on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<WhoisData>,

    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WhoisReport {
    /// Successful lookup
    #[must_use]
    pub fn found(domain: impl Into<String>, data: WhoisData) -> Self {
        Self {
            success: true,
            domain: domain.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Failed lookup
    #[must_use]
    pub fn failed(domain: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            domain: domain.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failed_report_shape() {
        let report = WhoisReport::failed("nonexistent.tld", "no match");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"success": false, "domain": "nonexistent.tld", "error": "no match"})
        );
    }

    #[test]
    fn test_found_report_omits_absent_fields() {
        let data = WhoisData {
            registrar: Some("RESERVED-Internet Assigned Numbers Authority".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(WhoisReport::found("example.com", data)).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(
            value["data"],
            json!({"registrar": "RESERVED-Internet Assigned Numbers Authority"})
        );
        assert!(value.get("error").is_none());
    }
}
