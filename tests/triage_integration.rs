//! Triage integration tests
//!
//! These tests run the follow-up action flow end to end: configuration on
//! disk, a reverse geocoding server, and recorded platform capabilities.

use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};
use serde_json::json;

use triage::{
    testing::{sample_result, MockClipboard, MockLocationProvider, MockNotifier, MockOpener, MockShareSink},
    Capabilities, DefaultActionDispatcher, FallbackReason, LocateState, LocationError,
    NominatimClient, RiskTier, TriageConfig,
};

type TestDispatcher =
    DefaultActionDispatcher<MockLocationProvider, MockOpener, MockClipboard, MockShareSink, MockNotifier>;

/// Write a configuration that points the geocoder at the mock server
fn write_config(dir: &Path, server: &MockServer) -> std::io::Result<std::path::PathBuf> {
    let config_content = format!(
        r#"[actions.low]
label = "Learn More"
url = "https://www.aad.org/public/diseases/skin-cancer"

[actions.moderate]
label = "Find a Dermatologist"
url = "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="

[actions.high]
label = "Find a Dermatologist"
url = "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="

[geocoder]
endpoint = "{}/reverse"
user_agent = "SkinTag-App"
timeout_seconds = 2
"#,
        server.uri()
    );

    let config_path = dir.join("skintag.toml");
    fs::write(&config_path, config_content)?;
    Ok(config_path)
}

fn dispatcher_for(
    config: &TriageConfig,
    location: MockLocationProvider,
    opener: MockOpener,
) -> TestDispatcher {
    let geocoder = NominatimClient::new(config.geocoder.clone()).unwrap();
    TestDispatcher::new(
        config,
        Capabilities {
            location,
            geocoder,
            opener,
            clipboard: MockClipboard::new(),
            share: MockShareSink::unsupported(),
            notifier: MockNotifier::new(),
        },
    )
    .unwrap()
}

#[tokio::test]
async fn test_moderate_tier_opens_search_near_postal_code() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .and(query_param("zoom", "18"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", "SkinTag-App"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "display_name": "Midtown, New York",
            "address": { "city": "New York", "postcode": "10001" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config_path = write_config(temp_dir.path(), &server).unwrap();
    let config = TriageConfig::load_with_validation(&config_path).unwrap();

    let opener = MockOpener::new();
    let dispatcher = dispatcher_for(&config, MockLocationProvider::at(40.7506, -73.9972), opener.clone());

    let outcome = dispatcher.dispatch(RiskTier::Moderate).await.unwrap();

    assert_eq!(
        outcome.opened.url,
        "https://find-a-derm.aad.org/search?searchTerm=&searchLocation=10001"
    );
    assert!(outcome.opened.features.noopener);
    assert!(outcome.opened.features.noreferrer);

    let locate = outcome.locate.unwrap();
    assert_eq!(locate.postal_code(), Some("10001"));
    let names: Vec<&str> = locate.trace.iter().map(LocateState::name).collect();
    assert_eq!(
        names,
        vec!["idle", "requesting_location", "resolving_postal_code", "resolved"]
    );

    assert_eq!(opener.opened().len(), 1);
}

#[tokio::test]
async fn test_response_without_postcode_opens_unmodified_search() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "display_name": "Somewhere at sea",
            "address": { "country": "International Waters" }
        })))
        .mount(&server)
        .await;

    let config_path = write_config(temp_dir.path(), &server).unwrap();
    let config = TriageConfig::load_with_validation(&config_path).unwrap();
    let dispatcher = dispatcher_for(&config, MockLocationProvider::at(0.0, -30.0), MockOpener::new());

    let outcome = dispatcher.dispatch(RiskTier::High).await.unwrap();

    assert_eq!(
        outcome.opened.url,
        "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="
    );
    assert_eq!(
        outcome.locate.unwrap().fallback_reason(),
        Some(&FallbackReason::NoPostalCode)
    );
}

#[tokio::test]
async fn test_geocoder_error_still_opens_destination() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config_path = write_config(temp_dir.path(), &server).unwrap();
    let config = TriageConfig::load_with_validation(&config_path).unwrap();
    let opener = MockOpener::new();
    let dispatcher = dispatcher_for(&config, MockLocationProvider::at(51.5, -0.12), opener.clone());

    let outcome = dispatcher.dispatch(RiskTier::Moderate).await.unwrap();

    assert!(matches!(
        outcome.locate.unwrap().fallback_reason(),
        Some(FallbackReason::GeocodeFailed(_))
    ));
    assert_eq!(
        opener.opened()[0].url,
        "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="
    );
}

#[tokio::test]
async fn test_denied_location_skips_geocoder() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config_path = write_config(temp_dir.path(), &server).unwrap();
    let config = TriageConfig::load_with_validation(&config_path).unwrap();
    let dispatcher = dispatcher_for(
        &config,
        MockLocationProvider::failing(LocationError::PermissionDenied),
        MockOpener::new(),
    );

    let outcome = dispatcher.dispatch(RiskTier::Moderate).await.unwrap();

    assert_eq!(
        outcome.locate.unwrap().fallback_reason(),
        Some(&FallbackReason::LocationDenied)
    );
}

#[tokio::test]
async fn test_low_tier_never_requests_location() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start().await;

    let config_path = write_config(temp_dir.path(), &server).unwrap();
    let config = TriageConfig::load_with_validation(&config_path).unwrap();
    let location = MockLocationProvider::at(40.0, -70.0);
    let dispatcher = dispatcher_for(&config, location.clone(), MockOpener::new());

    let outcome = dispatcher.dispatch_for(&{
        let mut result = sample_result();
        result.risk_tier = RiskTier::Low;
        result
    })
    .await
    .unwrap();

    assert_eq!(
        outcome.opened.url,
        "https://www.aad.org/public/diseases/skin-cancer"
    );
    assert!(outcome.locate.is_none());
    assert_eq!(location.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_location_falls_back_after_timeout() {
    let config = TriageConfig::default();
    let dispatcher = dispatcher_for(
        &config,
        MockLocationProvider::at(40.0, -70.0).with_delay(Duration::from_secs(30)),
        MockOpener::new(),
    );

    let outcome = dispatcher.dispatch(RiskTier::Moderate).await.unwrap();

    assert_eq!(
        outcome.locate.unwrap().fallback_reason(),
        Some(&FallbackReason::LocationTimeout)
    );
    assert_eq!(
        outcome.opened.url,
        "https://find-a-derm.aad.org/search?searchTerm=&searchLocation="
    );
}

#[test]
fn test_incomplete_action_table_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("skintag.toml");
    fs::write(
        &config_path,
        r#"[actions.low]
label = "Learn More"
url = "https://www.aad.org/public/diseases/skin-cancer"
"#,
    )
    .unwrap();

    assert!(TriageConfig::load_with_validation(&config_path).is_err());
}
