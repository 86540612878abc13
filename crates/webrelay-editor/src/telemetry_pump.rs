//! Timed telemetry pushes to the page.
//!
//! The pump is polled from the editor's UI timer. It fires at most once per
//! interval and only sends while the surface is visible. Skipped payloads
//! are dropped; the next push carries the latest values.

use std::time::{Duration, Instant};

use webrelay_core::{EditorConfig, TelemetrySource, DEFAULT_TELEMETRY_EVENT};
use webrelay_webview::{bridge, WebSurface};

/// What a [`TelemetryPump::poll`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// The interval has not elapsed, or the pump is disabled.
    NotDue,
    /// A payload was sent.
    Sent,
    /// The interval elapsed but the surface is hidden; nothing was sent.
    SkippedHidden,
}

/// Rate-limited telemetry emitter.
#[derive(Debug, Clone)]
pub struct TelemetryPump {
    interval: Option<Duration>,
    event: String,
    next_due: Option<Instant>,
}

impl TelemetryPump {
    /// Pump firing `rate_hz` times per second. A rate of 0 disables it.
    pub fn new(rate_hz: u32) -> Self {
        Self {
            interval: (rate_hz > 0).then(|| Duration::from_secs(1) / rate_hz),
            event: DEFAULT_TELEMETRY_EVENT.to_string(),
            next_due: None,
        }
    }

    /// Pump using the editor config's rate and event name.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.telemetry_rate_hz).with_event(config.telemetry_event)
    }

    pub fn with_event(mut self, name: impl Into<String>) -> Self {
        self.event = name.into();
        self
    }

    /// Time between pushes, or `None` if disabled.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// Push a payload if the interval has elapsed.
    ///
    /// The first poll after construction is always due. A skipped push
    /// still consumes the interval.
    pub fn poll(&mut self, now: Instant, surface: &dyn WebSurface, source: &dyn TelemetrySource) -> PumpOutcome {
        let Some(interval) = self.interval else {
            return PumpOutcome::NotDue;
        };
        if self.next_due.is_some_and(|due| now < due) {
            return PumpOutcome::NotDue;
        }
        self.next_due = Some(now + interval);

        if !surface.is_visible() {
            return PumpOutcome::SkippedHidden;
        }
        let payload = source.collect();
        if bridge::emit_event_if_visible(surface, &self.event, &payload) {
            PumpOutcome::Sent
        } else {
            PumpOutcome::SkippedHidden
        }
    }
}

impl Default for TelemetryPump {
    fn default() -> Self {
        Self::new(webrelay_core::DEFAULT_TELEMETRY_RATE_HZ)
    }
}
