use serde::{Deserialize, Serialize};

/// Marker returned when the geolocation service cannot place a target
pub const GEO_NOT_LOCATED: &str = "Could not locate target";

/// Physical location of a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoInfo {
    /// Country name
    pub country: Option<String>,

    /// City name
    pub city: Option<String>,

    /// Internet service provider
    pub isp: Option<String>,

    /// Latitude
    pub lat: Option<f64>,

    /// Longitude
    pub lon: Option<f64>,
}

/// `geo_data` member of the geo route response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeoData {
    /// The lookup failed; the message takes the place of the location
    Failed {
        /// Failure description
        error: String,
    },
    /// The target was located
    Located(GeoInfo),
}

impl GeoData {
    /// Failure payload with the given message
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// Returns true if the target was located
    #[must_use]
    pub const fn is_located(&self) -> bool {
        matches!(self, Self::Located(_))
    }
}

/// Response of the geo route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoReport {
    /// Target as supplied by the caller
    pub target: String,

    /// Location or failure marker
    pub geo_data: GeoData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failed_geo_data_shape() {
        let report = GeoReport {
            target: "10.0.0.1".into(),
            geo_data: GeoData::failed(GEO_NOT_LOCATED),
        };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"target": "10.0.0.1", "geo_data": {"error": "Could not locate target"}})
        );
    }

    #[test]
    fn test_located_geo_data_shape() {
        let data = GeoData::Located(GeoInfo {
            country: Some("United States".into()),
            city: Some("Fremont".into()),
            isp: Some("Linode".into()),
            lat: Some(37.5),
            lon: Some(-121.9),
        });
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["country"], "United States");
        assert_eq!(value["lon"], -121.9);
        assert!(value.get("error").is_none());

        let parsed: GeoData = serde_json::from_value(value).unwrap();
        assert!(parsed.is_located());
    }
}
