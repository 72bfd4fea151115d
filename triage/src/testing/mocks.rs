use crate::error::{ClipboardError, LocationError, Result, ShareError, TriageError};
use crate::export::SharePayload;
use crate::traits::{
    ClipboardSink, DestinationOpener, GeocodeService, LocationProvider, Notifier, ShareSink,
};
use crate::types::{
    AnalysisResult, Coordinates, LocationQueryResult, OpenRequest, RiskTier, TriageCategories,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock location provider for testing
#[derive(Clone)]
pub struct MockLocationProvider {
    pub result: std::result::Result<Coordinates, LocationError>,
    pub delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockLocationProvider {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            result: Ok(Coordinates::new(latitude, longitude)),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: LocationError) -> Self {
        Self {
            result: Err(error),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delay the answer, e.g. to exercise timeouts
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LocationProvider for MockLocationProvider {
    async fn current_position(
        &self,
        _timeout: Duration,
    ) -> std::result::Result<Coordinates, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}

/// Mock reverse geocoder for testing
#[derive(Clone)]
pub struct MockGeocoder {
    pub response: std::result::Result<LocationQueryResult, String>,
    pub delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockGeocoder {
    pub fn returning(postal_code: Option<&str>) -> Self {
        Self {
            response: Ok(postal_code.map(str::to_string)),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            ..Self::returning(None)
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GeocodeService for MockGeocoder {
    async fn reverse(&self, _coordinates: Coordinates) -> Result<LocationQueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone().map_err(TriageError::geocode)
    }
}

/// Mock opener that records every request
#[derive(Clone, Default)]
pub struct MockOpener {
    pub failure: Option<String>,
    opened: Arc<Mutex<Vec<OpenRequest>>>,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<OpenRequest> {
        self.opened.lock().unwrap().clone()
    }
}

impl DestinationOpener for MockOpener {
    async fn open(&self, request: &OpenRequest) -> Result<()> {
        if let Some(message) = &self.failure {
            return Err(TriageError::open_failed(request.url.as_str(), message.as_str()));
        }
        self.opened.lock().unwrap().push(request.clone());
        Ok(())
    }
}

/// Mock clipboard that records writes
#[derive(Clone, Default)]
pub struct MockClipboard {
    pub failure: Option<ClipboardError>,
    writes: Arc<Mutex<Vec<String>>>,
    attempts: Arc<AtomicUsize>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: ClipboardError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Successful writes
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    /// All write attempts, including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl ClipboardSink for MockClipboard {
    async fn write_text(&self, text: &str) -> std::result::Result<(), ClipboardError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Mock share sheet
#[derive(Clone)]
pub struct MockShareSink {
    pub supported: bool,
    pub failure: Option<ShareError>,
    shared: Arc<Mutex<Vec<SharePayload>>>,
    calls: Arc<AtomicUsize>,
}

impl MockShareSink {
    /// Platform without a share sheet
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            failure: None,
            shared: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn supported() -> Self {
        Self {
            supported: true,
            ..Self::unsupported()
        }
    }

    /// Share sheet that rejects every payload
    pub fn failing(error: ShareError) -> Self {
        Self {
            failure: Some(error),
            ..Self::supported()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(&self) -> Vec<SharePayload> {
        self.shared.lock().unwrap().clone()
    }
}

impl ShareSink for MockShareSink {
    fn can_share(&self, _payload: &SharePayload) -> bool {
        self.supported
    }

    async fn share(&self, payload: &SharePayload) -> std::result::Result<(), ShareError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.shared.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

/// A notification shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Mock notifier that records notifications in order
#[derive(Clone, Default)]
pub struct MockNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn success(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Error(message.to_string()));
    }
}

/// A high-tier result dominated by the malignant category
pub fn sample_result() -> AnalysisResult {
    AnalysisResult {
        categories: TriageCategories::from_probabilities(0.7, 0.2, 0.1),
        risk_tier: RiskTier::High,
        headline: "High Risk".to_string(),
        generated_at: None,
        notes: Vec::new(),
    }
}
