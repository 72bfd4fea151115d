use crate::config::{LocateConfig, TierAction, TierActionTable, TriageConfig};
use crate::error::{Result, ShareError, TriageError};
use crate::export::{format_as_text, SharePayload};
use crate::geocode::NominatimClient;
use crate::locate::{LocateOutcome, SpecialistLocator};
use crate::traits::{
    ClipboardSink, DestinationOpener, GeocodeService, LocationProvider, Notifier, ShareSink,
};
use crate::types::{AnalysisResult, OpenRequest, RiskTier};
use std::sync::Arc;

pub const MSG_COPIED: &str = "Results copied to clipboard";
pub const MSG_COPY_FAILED: &str = "Failed to copy to clipboard";
pub const MSG_SHARED: &str = "Results shared";
pub const MSG_COPIED_FOR_SHARING: &str = "Results copied - ready to share with doctor";

/// Platform capabilities the dispatcher calls into
pub struct Capabilities<L, G, O, C, S, N> {
    pub location: L,
    pub geocoder: G,
    pub opener: O,
    pub clipboard: C,
    pub share: S,
    pub notifier: N,
}

/// Type alias for a dispatcher backed by the real reverse geocoding client
pub type DefaultActionDispatcher<L, O, C, S, N> = ActionDispatcher<L, NominatimClient, O, C, S, N>;

/// What happened when a tier action was dispatched
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub tier: RiskTier,
    pub action: TierAction,
    /// Destination that was opened
    pub opened: OpenRequest,
    /// Locate flow details; `None` when the destination needs no location
    pub locate: Option<LocateOutcome>,
}

/// How a share request was satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// The platform share sheet accepted the payload
    Shared,
    /// Sharing was unavailable or failed; the text went to the clipboard
    Copied,
    /// Sharing was unavailable or failed and the clipboard write failed too
    Failed,
}

/// Resolves tier follow-up actions and performs copy/share side effects
pub struct ActionDispatcher<L, G, O, C, S, N>
where
    L: LocationProvider,
    G: GeocodeService,
    O: DestinationOpener,
    C: ClipboardSink,
    S: ShareSink,
    N: Notifier,
{
    actions: TierActionTable,
    locate: LocateConfig,
    share_title: String,
    locator: SpecialistLocator<L, G>,
    opener: Arc<O>,
    clipboard: Arc<C>,
    share: Arc<S>,
    notifier: Arc<N>,
}

impl<L, G, O, C, S, N> ActionDispatcher<L, G, O, C, S, N>
where
    L: LocationProvider,
    G: GeocodeService,
    O: DestinationOpener,
    C: ClipboardSink,
    S: ShareSink,
    N: Notifier,
{
    /// Create a dispatcher; fails if the tier table is incomplete
    pub fn new(config: &TriageConfig, capabilities: Capabilities<L, G, O, C, S, N>) -> Result<Self> {
        let actions = config.action_table()?;
        let locator = SpecialistLocator::new(
            capabilities.location,
            capabilities.geocoder,
            &config.locate,
            &config.geocoder,
        );

        Ok(Self {
            actions,
            locate: config.locate.clone(),
            share_title: config.share.title.clone(),
            locator,
            opener: Arc::new(capabilities.opener),
            clipboard: Arc::new(capabilities.clipboard),
            share: Arc::new(capabilities.share),
            notifier: Arc::new(capabilities.notifier),
        })
    }

    /// Replace the locator, e.g. to tune its timeouts
    pub fn with_locator(mut self, locator: SpecialistLocator<L, G>) -> Self {
        self.locator = locator;
        self
    }

    /// Action offered for a tier
    pub fn action_for(&self, tier: RiskTier) -> &TierAction {
        self.actions.get(tier)
    }

    /// Whether a destination goes through the locate flow
    pub fn is_location_sensitive(&self, url: &str) -> bool {
        self.locate.is_location_sensitive(url)
    }

    /// Run the tier's follow-up action and open its destination.
    ///
    /// Location and geocoding problems never fail this call; only the opener can.
    pub async fn dispatch(&self, tier: RiskTier) -> Result<DispatchOutcome> {
        let action = self.actions.get(tier).clone();

        let locate = if self.is_location_sensitive(&action.url) {
            Some(self.locator.resolve(&action.url).await)
        } else {
            None
        };

        let url = locate
            .as_ref()
            .map(|outcome| outcome.url.clone())
            .unwrap_or_else(|| action.url.clone());
        let request = OpenRequest::isolated(url);

        tracing::info!(
            tier = %tier,
            url = %request.url,
            located = locate.as_ref().is_some_and(|o| o.postal_code().is_some()),
            "Opening follow-up destination"
        );
        self.opener.open(&request).await?;

        Ok(DispatchOutcome {
            tier,
            action,
            opened: request,
            locate,
        })
    }

    /// Dispatch the follow-up action for an analysis result's tier
    pub async fn dispatch_for(&self, result: &AnalysisResult) -> Result<DispatchOutcome> {
        self.dispatch(result.risk_tier).await
    }

    /// Write text to the clipboard, reporting failure to the caller
    pub async fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        self.clipboard.write_text(text).await.map_err(|e| {
            tracing::warn!(error = %e, "Clipboard write failed");
            TriageError::from(e)
        })
    }

    /// Copy the formatted result and notify the user either way
    pub async fn copy_results(&self, result: &AnalysisResult) -> Result<()> {
        let text = format_as_text(result);
        match self.copy_to_clipboard(&text).await {
            Ok(()) => {
                self.notifier.success(MSG_COPIED);
                Ok(())
            }
            Err(e) => {
                self.notifier.error(MSG_COPY_FAILED);
                Err(e)
            }
        }
    }

    /// Share the formatted result, falling back to the clipboard
    pub async fn share_results(&self, result: &AnalysisResult) -> ShareOutcome {
        let payload = SharePayload::for_result(&self.share_title, result);

        if !self.share.can_share(&payload) {
            tracing::debug!("Share capability absent, copying instead");
            return self.copy_for_sharing(&payload.text, MSG_COPIED_FOR_SHARING).await;
        }

        match self.share.share(&payload).await {
            Ok(()) => {
                self.notifier.success(MSG_SHARED);
                ShareOutcome::Shared
            }
            Err(error) => {
                match &error {
                    ShareError::Cancelled => tracing::debug!("Share cancelled, copying instead"),
                    ShareError::Failed(_) => {
                        tracing::info!(error = %error, "Share failed, copying instead")
                    }
                }
                self.copy_for_sharing(&payload.text, MSG_COPIED).await
            }
        }
    }

    async fn copy_for_sharing(&self, text: &str, success_message: &str) -> ShareOutcome {
        match self.copy_to_clipboard(text).await {
            Ok(()) => {
                self.notifier.success(success_message);
                ShareOutcome::Copied
            }
            Err(_) => {
                self.notifier.error(MSG_COPY_FAILED);
                ShareOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClipboardError, LocationError};
    use crate::testing::{
        sample_result, MockClipboard, MockGeocoder, MockLocationProvider, MockNotifier,
        MockOpener, MockShareSink, Notification,
    };
    use std::time::Duration;

    type TestDispatcher = ActionDispatcher<
        MockLocationProvider,
        MockGeocoder,
        MockOpener,
        MockClipboard,
        MockShareSink,
        MockNotifier,
    >;

    struct Harness {
        location: MockLocationProvider,
        geocoder: MockGeocoder,
        opener: MockOpener,
        clipboard: MockClipboard,
        share: MockShareSink,
        notifier: MockNotifier,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                location: MockLocationProvider::at(40.75, -73.99),
                geocoder: MockGeocoder::returning(Some("10001")),
                opener: MockOpener::new(),
                clipboard: MockClipboard::new(),
                share: MockShareSink::unsupported(),
                notifier: MockNotifier::new(),
            }
        }

        fn dispatcher(&self) -> TestDispatcher {
            self.dispatcher_with(&TriageConfig::default())
        }

        fn dispatcher_with(&self, config: &TriageConfig) -> TestDispatcher {
            ActionDispatcher::new(
                config,
                Capabilities {
                    location: self.location.clone(),
                    geocoder: self.geocoder.clone(),
                    opener: self.opener.clone(),
                    clipboard: self.clipboard.clone(),
                    share: self.share.clone(),
                    notifier: self.notifier.clone(),
                },
            )
            .unwrap()
        }
    }

    #[tokio::test]
    async fn test_low_tier_never_requests_location() {
        let harness = Harness::new();
        let outcome = harness.dispatcher().dispatch(RiskTier::Low).await.unwrap();

        assert!(outcome.locate.is_none());
        assert_eq!(harness.location.call_count(), 0);
        assert_eq!(harness.geocoder.call_count(), 0);
        assert_eq!(
            harness.opener.opened(),
            vec![OpenRequest::isolated(
                "https://www.aad.org/public/diseases/skin-cancer"
            )]
        );
    }

    #[tokio::test]
    async fn test_moderate_and_high_attempt_location_first() {
        for tier in [RiskTier::Moderate, RiskTier::High] {
            let harness = Harness::new();
            let outcome = harness.dispatcher().dispatch(tier).await.unwrap();

            assert_eq!(harness.location.call_count(), 1);
            assert!(outcome.opened.url.contains("searchLocation=10001"));
            assert_eq!(outcome.action.label, "Find a Dermatologist");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_location_timeout_opens_template_url() {
        let mut harness = Harness::new();
        harness.location = MockLocationProvider::at(40.75, -73.99).with_delay(Duration::from_secs(10));

        let outcome = harness.dispatcher().dispatch(RiskTier::High).await.unwrap();

        assert_eq!(
            outcome.opened.url,
            "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="
        );
        assert_eq!(harness.geocoder.call_count(), 0);
        assert!(harness.notifier.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_locator_timeout() {
        let harness = Harness::new();
        let slow = MockLocationProvider::at(40.75, -73.99).with_delay(Duration::from_secs(2));
        let locator = SpecialistLocator::new(
            slow,
            harness.geocoder.clone(),
            &LocateConfig::default(),
            &crate::config::GeocoderConfig::default(),
        )
        .with_geolocation_timeout(Duration::from_secs(1));
        let dispatcher = harness.dispatcher().with_locator(locator);

        let outcome = dispatcher.dispatch(RiskTier::Moderate).await.unwrap();

        assert!(outcome.opened.url.ends_with("searchLocation="));
        assert_eq!(harness.geocoder.call_count(), 0);
    }

    #[tokio::test]
    async fn test_location_follows_destination_not_tier() {
        let find_a_derm = "https://find-a-derm.aad.org/search?searchTerm=&searchLocation=";
        let mut config = TriageConfig::default();
        config.actions.insert(
            "low".to_string(),
            TierAction::new("Find a Dermatologist", find_a_derm),
        );

        let harness = Harness::new();
        let outcome = harness
            .dispatcher_with(&config)
            .dispatch(RiskTier::Low)
            .await
            .unwrap();

        assert_eq!(harness.location.call_count(), 1);
        assert_eq!(
            outcome.opened.url,
            "https://find-a-derm.aad.org/search?searchTerm=&searchLocation=10001"
        );
        assert_eq!(outcome.locate.unwrap().postal_code(), Some("10001"));
    }

    #[tokio::test]
    async fn test_high_tier_with_plain_destination_skips_location() {
        let mut config = TriageConfig::default();
        config.actions.insert(
            "high".to_string(),
            TierAction::new("Urgent Care", "https://www.aad.org/public/diseases/skin-cancer"),
        );

        let harness = Harness::new();
        let outcome = harness
            .dispatcher_with(&config)
            .dispatch(RiskTier::High)
            .await
            .unwrap();

        assert_eq!(harness.location.call_count(), 0);
        assert_eq!(harness.geocoder.call_count(), 0);
        assert!(outcome.locate.is_none());
        assert_eq!(
            outcome.opened.url,
            "https://www.aad.org/public/diseases/skin-cancer"
        );
    }

    #[tokio::test]
    async fn test_denied_location_is_silent() {
        let mut harness = Harness::new();
        harness.location = MockLocationProvider::failing(LocationError::PermissionDenied);

        let outcome = harness.dispatcher().dispatch(RiskTier::Moderate).await.unwrap();

        assert!(outcome.opened.url.ends_with("searchLocation="));
        assert!(outcome.opened.features.noopener);
        assert!(harness.notifier.notifications().is_empty());
        assert_eq!(harness.opener.opened().len(), 1);
    }

    #[tokio::test]
    async fn test_opener_failure_is_returned() {
        let mut harness = Harness::new();
        harness.opener = MockOpener::failing("no browser");

        let result = harness.dispatcher().dispatch(RiskTier::Low).await;
        assert!(matches!(result, Err(TriageError::OpenFailed { .. })));
    }

    #[tokio::test]
    async fn test_overlapping_dispatches_each_open() {
        let harness = Harness::new();
        let dispatcher = harness.dispatcher();

        let (first, second) = tokio::join!(
            dispatcher.dispatch(RiskTier::High),
            dispatcher.dispatch(RiskTier::High)
        );

        assert!(first.is_ok() && second.is_ok());
        assert_eq!(harness.location.call_count(), 2);
        assert_eq!(harness.opener.opened().len(), 2);
    }

    #[tokio::test]
    async fn test_copy_success_notifies() {
        let harness = Harness::new();
        let result = sample_result();

        harness.dispatcher().copy_results(&result).await.unwrap();

        assert_eq!(harness.clipboard.writes(), vec![format_as_text(&result)]);
        assert_eq!(
            harness.notifier.notifications(),
            vec![Notification::Success(MSG_COPIED.to_string())]
        );
    }

    #[tokio::test]
    async fn test_copy_failure_notifies_once() {
        let mut harness = Harness::new();
        harness.clipboard = MockClipboard::failing(ClipboardError::WriteFailed("denied".into()));

        let result = harness.dispatcher().copy_results(&sample_result()).await;

        assert!(matches!(result, Err(TriageError::Clipboard(_))));
        assert_eq!(
            harness.notifier.notifications(),
            vec![Notification::Error(MSG_COPY_FAILED.to_string())]
        );
    }

    #[tokio::test]
    async fn test_share_without_capability_copies() {
        let harness = Harness::new();

        let outcome = harness.dispatcher().share_results(&sample_result()).await;

        assert_eq!(outcome, ShareOutcome::Copied);
        assert_eq!(harness.clipboard.writes().len(), 1);
        assert_eq!(harness.share.call_count(), 0);
        assert_eq!(
            harness.notifier.notifications(),
            vec![Notification::Success(MSG_COPIED_FOR_SHARING.to_string())]
        );
    }

    #[tokio::test]
    async fn test_share_success() {
        let mut harness = Harness::new();
        harness.share = MockShareSink::supported();
        let result = sample_result();

        let outcome = harness.dispatcher().share_results(&result).await;

        assert_eq!(outcome, ShareOutcome::Shared);
        assert!(harness.clipboard.writes().is_empty());
        let shared = harness.share.shared();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].title, "SkinTag Analysis Results");
        assert_eq!(shared[0].text, format_as_text(&result));
        assert_eq!(
            harness.notifier.notifications(),
            vec![Notification::Success(MSG_SHARED.to_string())]
        );
    }

    #[tokio::test]
    async fn test_cancelled_share_copies_instead() {
        let mut harness = Harness::new();
        harness.share = MockShareSink::failing(ShareError::Cancelled);

        let outcome = harness.dispatcher().share_results(&sample_result()).await;

        assert_eq!(outcome, ShareOutcome::Copied);
        assert_eq!(harness.clipboard.writes().len(), 1);
        assert_eq!(
            harness.notifier.notifications(),
            vec![Notification::Success(MSG_COPIED.to_string())]
        );
    }

    #[tokio::test]
    async fn test_share_fallback_with_broken_clipboard() {
        let mut harness = Harness::new();
        harness.clipboard = MockClipboard::failing(ClipboardError::Unavailable("headless".into()));

        let outcome = harness.dispatcher().share_results(&sample_result()).await;

        assert_eq!(outcome, ShareOutcome::Failed);
        assert_eq!(
            harness.notifier.notifications(),
            vec![Notification::Error(MSG_COPY_FAILED.to_string())]
        );
    }

    #[test]
    fn test_incomplete_action_table_is_rejected() {
        let harness = Harness::new();
        let mut config = TriageConfig::default();
        config.actions.remove("high");

        let result = ActionDispatcher::new(
            &config,
            Capabilities {
                location: harness.location.clone(),
                geocoder: harness.geocoder.clone(),
                opener: harness.opener.clone(),
                clipboard: harness.clipboard.clone(),
                share: harness.share.clone(),
                notifier: harness.notifier.clone(),
            },
        );
        assert!(result.is_err());
    }
}
