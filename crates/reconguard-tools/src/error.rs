use thiserror::Error;

/// Result type alias for collaborator calls
pub type ReconResult<T> = std::result::Result<T, ReconError>;

/// Failures of the external lookups
#[derive(Error, Debug)]
pub enum ReconError {
    /// Geolocation lookup error
    #[error("{0}")]
    Geo(String),

    /// DNS resolution error
    #[error("DNS error: {0}")]
    Dns(String),

    /// WHOIS lookup error
    #[error("{0}")]
    Whois(String),

    /// Port scan error
    #[error("scan error: {0}")]
    Scan(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Target could not be used for this lookup
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Network I/O error
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// Timeout
    #[error("operation timed out")]
    Timeout,
}

impl ReconError {
    /// Returns true if the failure was a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<reqwest::Error> for ReconError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err.to_string())
        }
    }
}
