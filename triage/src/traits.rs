use crate::error::{ClipboardError, LocationError, Result, ShareError};
use crate::export::SharePayload;
use crate::types::{Coordinates, LocationQueryResult, OpenRequest};
use std::future::Future;
use std::time::Duration;

/// Device geolocation capability
pub trait LocationProvider: Send + Sync {
    /// Acquire the current position. `timeout` is a hint for providers that
    /// support one; callers enforce it independently.
    fn current_position(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = std::result::Result<Coordinates, LocationError>> + Send;
}

/// Reverse geocoding capability
pub trait GeocodeService: Send + Sync {
    /// Resolve coordinates to a postal code; `Ok(None)` when the response has none
    fn reverse(
        &self,
        coordinates: Coordinates,
    ) -> impl Future<Output = Result<LocationQueryResult>> + Send;
}

/// Platform clipboard capability
pub trait ClipboardSink: Send + Sync {
    fn write_text(
        &self,
        text: &str,
    ) -> impl Future<Output = std::result::Result<(), ClipboardError>> + Send;
}

/// Platform share sheet capability
pub trait ShareSink: Send + Sync {
    /// Whether the platform can share this payload at all
    fn can_share(&self, payload: &SharePayload) -> bool;

    fn share(
        &self,
        payload: &SharePayload,
    ) -> impl Future<Output = std::result::Result<(), ShareError>> + Send;
}

/// Opens destinations in a new browsing context
pub trait DestinationOpener: Send + Sync {
    fn open(&self, request: &OpenRequest) -> impl Future<Output = Result<()>> + Send;
}

/// Transient user-facing notification surface
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// Trait for configuration validation
pub trait ConfigValidator: Send + Sync {
    type Config;

    fn validate(&self, config: &Self::Config) -> Result<()>;
}
