//! IP geolocation over the ip-api.com JSON API.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reconguard_core::{GeoInfo, GEO_NOT_LOCATED};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{ReconError, ReconResult};

/// The ip-api.com base URL
const DEFAULT_BASE_URL: &str = "http://ip-api.com";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// ip-api.com free tier allowance
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 45;

/// Locates an IP address or domain
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Country, city, ISP and coordinates of the target
    async fn locate(&self, target: &str) -> ReconResult<GeoInfo>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    isp: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Geolocation API client
#[derive(Clone)]
pub struct GeoClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: Url,
    limiter: DefaultDirectRateLimiter,
}

impl GeoClient {
    /// Create a client with default settings
    pub fn new() -> ReconResult<Self> {
        GeoClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> GeoClientBuilder {
        GeoClientBuilder::new()
    }

    fn lookup_url(&self, target: &str) -> ReconResult<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ReconError::Geo(format!("invalid base URL: {}", self.inner.base_url)))?
            .pop_if_empty()
            .push("json")
            .push(target);
        Ok(url)
    }
}

#[async_trait]
impl GeoLocator for GeoClient {
    async fn locate(&self, target: &str) -> ReconResult<GeoInfo> {
        let url = self.lookup_url(target)?;

        self.inner.limiter.until_ready().await;
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let body: IpApiResponse = response.json().await?;

        if body.status != "success" {
            debug!(target, message = ?body.message, "geolocation refused");
            return Err(ReconError::Geo(GEO_NOT_LOCATED.to_string()));
        }

        Ok(GeoInfo {
            country: body.country,
            city: body.city,
            isp: body.isp,
            lat: body.lat,
            lon: body.lon,
        })
    }
}

/// Builder for configuring a [`GeoClient`]
pub struct GeoClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
    requests_per_minute: u32,
}

impl Default for GeoClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("reconguard/{}", env!("CARGO_PKG_VERSION")),
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Set the client-side request budget
    #[must_use]
    pub const fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    /// Build the client
    pub fn build(self) -> ReconResult<GeoClient> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ReconError::Geo(format!("invalid base URL {}: {e}", self.base_url)))?;

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ReconError::Http(e.to_string()))?;

        let rpm = NonZeroU32::new(self.requests_per_minute).unwrap_or(NonZeroU32::MIN);

        Ok(GeoClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                limiter: RateLimiter::direct(Quota::per_minute(rpm)),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> GeoClient {
        GeoClient::builder()
            .base_url(server.uri())
            .requests_per_minute(600)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_locate_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/scanme.nmap.org"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "country": "United States",
                "city": "Fremont",
                "isp": "Akamai Technologies, Inc.",
                "lat": 37.5625,
                "lon": -122.0004,
                "query": "45.33.32.156"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let info = client_for(&server).await.locate("scanme.nmap.org").await.unwrap();
        assert_eq!(info.country.as_deref(), Some("United States"));
        assert_eq!(info.city.as_deref(), Some("Fremont"));
        assert_eq!(info.lat, Some(37.5625));
    }

    #[tokio::test]
    async fn test_locate_fail_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/10.0.0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "fail",
                "message": "private range",
                "query": "10.0.0.1"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.locate("10.0.0.1").await.unwrap_err();
        assert_eq!(err.to_string(), GEO_NOT_LOCATED);
    }

    #[tokio::test]
    async fn test_locate_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).await.locate("1.1.1.1").await.unwrap_err();
        assert!(matches!(err, ReconError::Http(_)));
    }

    #[test]
    fn test_lookup_url_encodes_target() {
        let client = GeoClient::builder()
            .base_url("http://geo.local/")
            .build()
            .unwrap();
        let url = client.lookup_url("a b").unwrap();
        assert_eq!(url.as_str(), "http://geo.local/json/a%20b");
    }
}
