#[cfg(any(test, feature = "testing"))]
pub mod mocks;

#[cfg(any(test, feature = "testing"))]
pub use mocks::{
    sample_result, MockClipboard, MockGeocoder, MockLocationProvider, MockNotifier, MockOpener,
    MockShareSink, Notification,
};
