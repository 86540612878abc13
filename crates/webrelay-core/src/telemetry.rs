//! Telemetry payloads: transient, non-parameter data for the web UI.
//!
//! Meters, playback state and similar values are pushed to the page on a
//! timer. They are never persisted and never queued.

use serde::Serialize;
use serde_json::{Map, Value};

/// Default event name telemetry is emitted under.
pub const DEFAULT_TELEMETRY_EVENT: &str = "visualizerData";

/// Flat map of named numeric/boolean fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TelemetryPayload {
    fields: Map<String, Value>,
}

impl TelemetryPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric field. Non-finite values are stored as `null`.
    pub fn with_number(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set_number(name, value);
        self
    }

    /// Add a boolean field.
    pub fn with_bool(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set_bool(name, value);
        self
    }

    pub fn set_number(&mut self, name: impl Into<String>, value: f64) {
        let value = serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number);
        self.fields.insert(name.into(), value);
    }

    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
        self.fields.insert(name.into(), Value::Bool(value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Something that can produce a telemetry payload on demand.
///
/// Usually implemented by the processor-side state that tracks levels.
/// Called on the UI thread; implementations read atomics.
pub trait TelemetrySource {
    fn collect(&self) -> TelemetryPayload;
}

impl<F> TelemetrySource for F
where
    F: Fn() -> TelemetryPayload,
{
    fn collect(&self) -> TelemetryPayload {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_flat() {
        let payload = TelemetryPayload::new()
            .with_number("inputLevel", 0.5)
            .with_number("outputLevel", 0.25)
            .with_bool("isPlaying", true);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"inputLevel": 0.5, "outputLevel": 0.25, "isPlaying": true})
        );
    }

    #[test]
    fn non_finite_numbers_become_null() {
        let payload = TelemetryPayload::new().with_number("peak", f64::NEG_INFINITY);
        assert_eq!(payload.get("peak"), Some(&Value::Null));
    }

    #[test]
    fn closures_are_sources() {
        let source = || TelemetryPayload::new().with_number("x", 1.0);
        assert_eq!(source.collect().len(), 1);
    }
}
