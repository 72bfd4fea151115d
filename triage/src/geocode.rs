use crate::config::GeocoderConfig;
use crate::error::{Result, TriageError};
use crate::traits::GeocodeService;
use crate::types::{Coordinates, LocationQueryResult};
use reqwest::Client;
use serde::Deserialize;

/// Reverse geocoding response; only the address block is read
#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    #[serde(default)]
    postcode: Option<String>,
}

/// Reverse geocoding client for Nominatim-compatible endpoints
#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    config: GeocoderConfig,
}

impl NominatimClient {
    /// Create a new client with configuration
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Build the reverse lookup request for a position
    fn build_request(&self, coordinates: Coordinates) -> Result<reqwest::Request> {
        self.client
            .get(&self.config.endpoint)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("zoom", self.config.zoom.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .build()
            .map_err(Into::into)
    }
}

impl GeocodeService for NominatimClient {
    async fn reverse(&self, coordinates: Coordinates) -> Result<LocationQueryResult> {
        let request = self.build_request(coordinates)?;
        tracing::debug!(url = %request.url(), "Reverse geocoding request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| TriageError::geocode(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TriageError::geocode(format!(
                "Unexpected status {}",
                status.as_u16()
            )));
        }

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| TriageError::geocode(format!("Malformed response: {}", e)))?;

        Ok(extract_postcode(body))
    }
}

/// A blank postcode counts as absent
fn extract_postcode(response: ReverseResponse) -> LocationQueryResult {
    response
        .address
        .and_then(|address| address.postcode)
        .map(|postcode| postcode.trim().to_string())
        .filter(|postcode| !postcode.is_empty())
}
