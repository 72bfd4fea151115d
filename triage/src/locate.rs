//! Locate-specialist flow: device location -> postal code -> destination URL.
//!
//! Every failure along the way degrades to the unmodified destination; the
//! caller always gets a URL to open.

use crate::config::{GeocoderConfig, LocateConfig};
use crate::error::LocationError;
use crate::traits::{GeocodeService, LocationProvider};
use crate::types::Coordinates;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Why the flow fell back to the unmodified destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    LocationDenied,
    LocationTimeout,
    LocationUnavailable(String),
    GeocodeFailed(String),
    GeocodeTimeout,
    NoPostalCode,
    /// The destination could not be rewritten with the postal code
    InvalidDestination(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::LocationDenied => f.write_str("location permission denied"),
            FallbackReason::LocationTimeout => f.write_str("location request timed out"),
            FallbackReason::LocationUnavailable(detail) => {
                write!(f, "location unavailable: {}", detail)
            }
            FallbackReason::GeocodeFailed(detail) => write!(f, "reverse geocoding failed: {}", detail),
            FallbackReason::GeocodeTimeout => f.write_str("reverse geocoding timed out"),
            FallbackReason::NoPostalCode => f.write_str("no postal code in response"),
            FallbackReason::InvalidDestination(detail) => {
                write!(f, "destination not rewritable: {}", detail)
            }
        }
    }
}

impl From<LocationError> for FallbackReason {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::PermissionDenied => FallbackReason::LocationDenied,
            LocationError::Timeout => FallbackReason::LocationTimeout,
            LocationError::Unavailable(detail) => FallbackReason::LocationUnavailable(detail),
        }
    }
}

/// States of the locate-specialist flow
#[derive(Debug, Clone, PartialEq)]
pub enum LocateState {
    Idle,
    RequestingLocation,
    ResolvingPostalCode { coordinates: Coordinates },
    Resolved { postal_code: String },
    Fallback { reason: FallbackReason },
}

impl LocateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LocateState::Resolved { .. } | LocateState::Fallback { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            LocateState::Idle => "idle",
            LocateState::RequestingLocation => "requesting_location",
            LocateState::ResolvingPostalCode { .. } => "resolving_postal_code",
            LocateState::Resolved { .. } => "resolved",
            LocateState::Fallback { .. } => "fallback",
        }
    }
}

/// Result of running the flow against one destination template
#[derive(Debug, Clone, PartialEq)]
pub struct LocateOutcome {
    /// Destination to open
    pub url: String,
    /// Every state visited, starting at `Idle`
    pub trace: Vec<LocateState>,
}

impl LocateOutcome {
    pub fn final_state(&self) -> &LocateState {
        // The trace always holds at least the terminal state
        &self.trace[self.trace.len() - 1]
    }

    pub fn postal_code(&self) -> Option<&str> {
        match self.final_state() {
            LocateState::Resolved { postal_code } => Some(postal_code),
            _ => None,
        }
    }

    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self.final_state() {
            LocateState::Fallback { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Drives the locate-specialist state machine
pub struct SpecialistLocator<L, G>
where
    L: LocationProvider,
    G: GeocodeService,
{
    location: Arc<L>,
    geocoder: Arc<G>,
    location_param: String,
    geolocation_timeout: Duration,
    geocode_timeout: Duration,
}

impl<L, G> SpecialistLocator<L, G>
where
    L: LocationProvider,
    G: GeocodeService,
{
    pub fn new(
        location: L,
        geocoder: G,
        locate: &LocateConfig,
        geocoder_config: &GeocoderConfig,
    ) -> Self {
        Self {
            location: Arc::new(location),
            geocoder: Arc::new(geocoder),
            location_param: locate.location_param.clone(),
            geolocation_timeout: locate.geolocation_timeout(),
            geocode_timeout: geocoder_config.timeout(),
        }
    }

    pub fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.geolocation_timeout = timeout;
        self
    }

    pub fn with_geocode_timeout(mut self, timeout: Duration) -> Self {
        self.geocode_timeout = timeout;
        self
    }

    /// Run the flow to a terminal state and return the destination to open
    pub async fn resolve(&self, template: &str) -> LocateOutcome {
        let mut trace = vec![LocateState::Idle];
        let mut state = LocateState::RequestingLocation;

        loop {
            tracing::debug!(state = state.name(), "Locate transition");
            trace.push(state.clone());
            if state.is_terminal() {
                break;
            }
            state = self.step(state, template).await;
        }

        let url = match trace.last() {
            Some(LocateState::Resolved { postal_code }) => {
                // Checked in `step` before entering Resolved
                with_location(template, &self.location_param, postal_code)
                    .unwrap_or_else(|_| template.to_string())
            }
            _ => template.to_string(),
        };

        LocateOutcome { url, trace }
    }

    /// Advance one non-terminal state
    async fn step(&self, state: LocateState, template: &str) -> LocateState {
        match state {
            LocateState::Idle => LocateState::RequestingLocation,
            LocateState::RequestingLocation => self.request_location().await,
            LocateState::ResolvingPostalCode { coordinates } => {
                self.resolve_postal_code(coordinates, template).await
            }
            terminal => terminal,
        }
    }

    async fn request_location(&self) -> LocateState {
        let acquisition = self.location.current_position(self.geolocation_timeout);
        match tokio::time::timeout(self.geolocation_timeout, acquisition).await {
            Ok(Ok(coordinates)) => LocateState::ResolvingPostalCode { coordinates },
            Ok(Err(error)) => fallback(error.into()),
            Err(_) => fallback(FallbackReason::LocationTimeout),
        }
    }

    async fn resolve_postal_code(&self, coordinates: Coordinates, template: &str) -> LocateState {
        let lookup = self.geocoder.reverse(coordinates);
        let postal_code = match tokio::time::timeout(self.geocode_timeout, lookup).await {
            Ok(Ok(Some(code))) if !code.trim().is_empty() => code.trim().to_string(),
            Ok(Ok(_)) => return fallback(FallbackReason::NoPostalCode),
            Ok(Err(error)) => return fallback(FallbackReason::GeocodeFailed(error.to_string())),
            Err(_) => return fallback(FallbackReason::GeocodeTimeout),
        };

        match with_location(template, &self.location_param, &postal_code) {
            Ok(_) => {
                tracing::info!(postal_code = %postal_code, "Resolved postal code for destination");
                LocateState::Resolved { postal_code }
            }
            Err(error) => fallback(FallbackReason::InvalidDestination(error.to_string())),
        }
    }
}

fn fallback(reason: FallbackReason) -> LocateState {
    tracing::info!(reason = %reason, "Location unavailable, opening default destination");
    LocateState::Fallback { reason }
}

/// Fill `param` in `template` with `value`, keeping every other query pair in
/// place. The parameter is appended when the template has no slot for it.
pub fn with_location(template: &str, param: &str, value: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(template)?;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut filled = false;
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, existing) in &pairs {
            if key == param && !filled {
                query.append_pair(key, value);
                filled = true;
            } else {
                query.append_pair(key, existing);
            }
        }
        if !filled {
            query.append_pair(param, value);
        }
    }

    Ok(url.to_string())
}
