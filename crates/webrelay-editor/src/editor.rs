//! The live editor: a web surface bound to a parameter store.
//!
//! [`UnboundEditor`] is what surface construction returns. Binding it to
//! parameters and a host edit sink yields an [`Editor`], which routes page
//! messages into parameter edits and pushes parameter changes back to the
//! page.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::{Map, Value};
use webrelay_core::{
    GuiConstraints, GuiDelegate, HostEditSink, ParameterId, ParameterSnapshot, ParameterStore,
    Rect, Size, TelemetrySource, WebViewHandler,
};
use webrelay_webview::{bridge, WebSurface, WebViewError};

use crate::attachment::Attachment;
use crate::error::RelayError;
use crate::ipc::{parse_message, WebMessage};
use crate::relay::{Relay, RelaySet, RelayState};
use crate::telemetry_pump::{PumpOutcome, TelemetryPump};

/// A built surface whose relays are not yet bound to parameters.
///
/// Dropping it detaches the surface.
pub struct UnboundEditor {
    surface: Option<Box<dyn WebSurface>>,
    relays: RelaySet,
    constraints: GuiConstraints,
}

impl UnboundEditor {
    pub(crate) fn new(surface: Box<dyn WebSurface>, relays: RelaySet, constraints: GuiConstraints) -> Self {
        Self {
            surface: Some(surface),
            relays,
            constraints,
        }
    }

    pub fn relays(&self) -> &RelaySet {
        &self.relays
    }

    /// Pair every relay with the parameter of the same key.
    ///
    /// Fails on the first relay with no parameter or with a parameter of
    /// the wrong kind; the surface is detached in that case.
    pub fn bind(
        mut self,
        parameters: Arc<dyn ParameterStore>,
        sink: Arc<dyn HostEditSink>,
    ) -> Result<Editor, RelayError> {
        let mut attachments = Vec::with_capacity(self.relays.len());
        for relay in &self.relays {
            let Some(parameter) = parameters.by_key(relay.key()) else {
                log::error!("relay {:?} has no matching parameter", relay.key());
                return Err(RelayError::UnknownParameter {
                    key: relay.key().to_string(),
                });
            };
            attachments.push(Attachment::bind(relay, parameter)?);
        }

        let Some(surface) = self.surface.take() else {
            return Err(WebViewError::NotAttached.into());
        };
        let mut relays = std::mem::take(&mut self.relays);
        relays.advance_all(RelayState::Bound);
        log::debug!("bound {} relays", relays.len());

        Ok(Editor {
            surface: Some(surface),
            last_values: vec![f64::NAN; attachments.len()],
            relays: relays.into_vec(),
            attachments,
            parameters,
            sink,
            handler: None,
            delegate: None,
            constraints: self.constraints,
            loaded: false,
        })
    }
}

impl Drop for UnboundEditor {
    fn drop(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.detach();
            self.relays.advance_all(RelayState::TornDown);
        }
    }
}

impl std::fmt::Debug for UnboundEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnboundEditor")
            .field("relays", &self.relays)
            .finish_non_exhaustive()
    }
}

/// A web editor with bound relays.
///
/// All methods must be called on the UI thread. The platform backend feeds
/// page messages to [`handle_message`](Self::handle_message), reports
/// navigation completion through [`page_loaded`](Self::page_loaded) and
/// drives [`sync_parameters`](Self::sync_parameters) from its UI timer.
pub struct Editor {
    surface: Option<Box<dyn WebSurface>>,
    relays: Vec<Relay>,
    /// Parallel to `relays`.
    attachments: Vec<Attachment>,
    /// Last normalized value the page knows per relay. NAN means unknown.
    last_values: Vec<f64>,
    parameters: Arc<dyn ParameterStore>,
    sink: Arc<dyn HostEditSink>,
    handler: Option<Arc<dyn WebViewHandler>>,
    delegate: Option<Box<dyn GuiDelegate>>,
    constraints: GuiConstraints,
    loaded: bool,
}

impl Editor {
    /// Route custom `invoke`/`event` messages to `handler`.
    pub fn set_webview_handler(&mut self, handler: Arc<dyn WebViewHandler>) {
        self.handler = Some(handler);
    }

    /// Install plugin lifecycle hooks. `gui_opened` fires immediately.
    pub fn set_gui_delegate(&mut self, mut delegate: Box<dyn GuiDelegate>) {
        if self.is_attached() {
            delegate.gui_opened();
        }
        self.delegate = Some(delegate);
    }

    pub fn relays(&self) -> &[Relay] {
        &self.relays
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.relays.iter().map(Relay::key)
    }

    pub fn relay_state(&self, key: &str) -> Option<RelayState> {
        self.relays.iter().find(|r| r.key() == key).map(Relay::state)
    }

    pub fn parameters(&self) -> &Arc<dyn ParameterStore> {
        &self.parameters
    }

    /// Whether the surface is still attached.
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether the page has reported loaded since the surface was built.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The page finished loading: send every bound relay's state.
    ///
    /// Called again after a reload, in which case the page gets a fresh
    /// dump.
    pub fn page_loaded(&mut self) {
        let Some(surface) = self.surface.as_deref() else {
            return;
        };
        let mut snapshots = Vec::with_capacity(self.attachments.len());
        for (i, attachment) in self.attachments.iter().enumerate() {
            let Some(parameter) = self.parameters.by_id(attachment.id) else {
                continue;
            };
            self.last_values[i] = parameter.get_normalized();
            snapshots.push(ParameterSnapshot::of(parameter));
        }
        match serde_json::to_string(&snapshots) {
            Ok(json) => surface.evaluate_js(&bridge::init_script(&json)),
            Err(e) => log::error!("failed to serialize initial state: {e}"),
        }
        for relay in &mut self.relays {
            relay.advance(RelayState::Active);
        }
        self.loaded = true;
        log::debug!("web UI loaded, {} relays active", self.relays.len());
    }

    /// Push parameters that changed since the last push.
    ///
    /// Returns the number of values sent. Values the page itself set are
    /// not echoed back.
    pub fn sync_parameters(&mut self) -> usize {
        if !self.loaded {
            return 0;
        }
        let Some(surface) = self.surface.as_deref() else {
            return 0;
        };
        let mut changed = Map::new();
        for (i, attachment) in self.attachments.iter().enumerate() {
            let Some(value) = self.parameters.get_normalized(attachment.id) else {
                continue;
            };
            // NAN never compares equal, so unknown values are always sent.
            if value != self.last_values[i] {
                self.last_values[i] = value;
                changed.insert(self.relays[i].key().to_string(), Value::from(value));
            }
        }
        if changed.is_empty() {
            return 0;
        }
        if let Some(script) = bridge::params_script(&changed) {
            surface.evaluate_js(&script);
        }
        changed.len()
    }

    /// Handle a raw JSON message posted by the page.
    pub fn handle_message(&mut self, json: &str) {
        let Some(message) = parse_message(json) else {
            return;
        };
        match message {
            WebMessage::ParamSet { key, value } => self.set_from_web(&key, &value),
            WebMessage::ParamBegin { key } => {
                if let Some(id) = self.editable_id(&key) {
                    self.sink.begin_edit(id);
                }
            }
            WebMessage::ParamEnd { key } => {
                if let Some(id) = self.editable_id(&key) {
                    self.sink.end_edit(id);
                }
            }
            WebMessage::Invoke { method, args, call_id } => {
                let result = match &self.handler {
                    Some(handler) => handler.on_invoke(&method, &args),
                    None => Ok(Value::Null),
                };
                if let (Some(surface), Some(script)) =
                    (self.surface.as_deref(), bridge::result_script(call_id, &result))
                {
                    surface.evaluate_js(&script);
                }
            }
            WebMessage::Event { name, data } => {
                if let Some(handler) = &self.handler {
                    handler.on_event(&name, &data);
                }
            }
        }
    }

    fn find(&self, key: &str) -> Option<(usize, Attachment)> {
        let found = self
            .relays
            .iter()
            .position(|r| r.key() == key)
            .map(|i| (i, self.attachments[i]));
        if found.is_none() {
            log::warn!("message for undeclared relay {key:?}");
        }
        found
    }

    /// Parameter id for a gesture message, or `None` for undeclared relays
    /// and read-only parameters.
    fn editable_id(&self, key: &str) -> Option<ParameterId> {
        let (_, attachment) = self.find(key)?;
        let parameter = self.parameters.by_id(attachment.id)?;
        if parameter.info().flags.is_readonly {
            log::debug!("ignoring gesture on read-only parameter {key:?}");
            return None;
        }
        Some(attachment.id)
    }

    fn set_from_web(&mut self, key: &str, value: &Value) {
        let Some((index, attachment)) = self.find(key) else {
            return;
        };
        let Some(parameter) = self.parameters.by_id(attachment.id) else {
            return;
        };
        if parameter.info().flags.is_readonly {
            log::warn!("ignoring web edit of read-only parameter {key:?}");
            return;
        }
        let Some(normalized) = attachment.web_to_normalized(parameter, value) else {
            log::warn!("invalid value for {} relay {key:?}: {value}", attachment.kind.as_str());
            return;
        };

        let id = attachment.id;
        let discrete = attachment.kind.is_discrete();
        if discrete {
            self.sink.begin_edit(id);
        }
        parameter.set_normalized(normalized);
        self.sink.perform_edit(id, parameter.get_normalized());
        if discrete {
            self.sink.end_edit(id);
        }
        // The page already shows this value. If the parameter stored
        // something else (step snapping), the next sync sends the difference.
        self.last_values[index] = normalized;
    }

    /// Send a named event if the surface is visible. Returns whether it was
    /// sent.
    pub fn emit_event(&self, name: &str, data: &impl Serialize) -> bool {
        match self.surface.as_deref() {
            Some(surface) => bridge::emit_event_if_visible(surface, name, data),
            None => false,
        }
    }

    /// Poll a telemetry pump against this editor's surface.
    pub fn pump_telemetry(
        &self,
        pump: &mut TelemetryPump,
        now: Instant,
        source: &dyn TelemetrySource,
    ) -> PumpOutcome {
        match self.surface.as_deref() {
            Some(surface) => pump.poll(now, surface, source),
            None => PumpOutcome::SkippedHidden,
        }
    }

    /// Position the surface inside the parent.
    pub fn set_bounds(&mut self, bounds: Rect) -> Result<(), WebViewError> {
        let surface = self.surface.as_deref_mut().ok_or(WebViewError::NotAttached)?;
        surface.set_bounds(bounds);
        Ok(())
    }

    /// Resize the editor within its constraints. Returns the applied size.
    pub fn resize(&mut self, requested: Size) -> Result<Size, WebViewError> {
        let size = self.constraints.clamp(requested);
        self.set_bounds(Rect::from_size(size))?;
        if let Some(delegate) = &mut self.delegate {
            delegate.gui_resized(size);
        }
        Ok(size)
    }

    pub fn constraints(&self) -> GuiConstraints {
        self.constraints
    }

    /// Tear down: detach the surface and retire every relay.
    ///
    /// Parameter values are untouched. Calling it twice is a no-op.
    pub fn close(&mut self) {
        let Some(mut surface) = self.surface.take() else {
            return;
        };
        if let Some(delegate) = &mut self.delegate {
            delegate.gui_closed();
        }
        surface.detach();
        for relay in &mut self.relays {
            relay.advance(RelayState::TornDown);
        }
        self.loaded = false;
        log::debug!("web editor closed");
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("relays", &self.relays)
            .field("attached", &self.is_attached())
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}
