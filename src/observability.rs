use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("wayfarer.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("wayfarer.client.request_errors");
pub(crate) static CLIENT_REQUEST_RETRIES: Counter = Counter::new("wayfarer.client.retries");
pub(crate) static CLIENT_REFRESHES: Counter = Counter::new("wayfarer.client.refreshes");
pub(crate) static CLIENT_REFRESH_FAILURES: Counter =
    Counter::new("wayfarer.client.refresh_failures");
pub(crate) static CLIENT_FORCED_LOGOUTS: Counter = Counter::new("wayfarer.client.forced_logouts");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("wayfarer.client.request_duration_seconds");

pub(crate) static STREAM_FRAMES: Counter = Counter::new("wayfarer.stream.frames");
pub(crate) static STREAM_FRAME_ERRORS: Counter = Counter::new("wayfarer.stream.frame_errors");
pub(crate) static STREAM_DURATION: Moments = Moments::new("wayfarer.stream.duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_REQUEST_RETRIES);
    collector.register_counter(&CLIENT_REFRESHES);
    collector.register_counter(&CLIENT_REFRESH_FAILURES);
    collector.register_counter(&CLIENT_FORCED_LOGOUTS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_FRAMES);
    collector.register_counter(&STREAM_FRAME_ERRORS);
    collector.register_moments(&STREAM_DURATION);
}
