//! Core abstractions for webrelay plugin editors.
//!
//! Parameters, state persistence, host edit notification, telemetry payloads
//! and editor configuration. Nothing in this crate touches a web view; the
//! surface side lives in `webrelay-webview` and the relay wiring in
//! `webrelay-editor`.

pub mod config;
pub mod edit;
pub mod gui;
pub mod parameter_info;
pub mod parameter_store;
pub mod parameter_types;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod webview_handler;

pub use config::{ConfigError, ConfigFile, EditorConfig, DEFAULT_TELEMETRY_RATE_HZ};
pub use edit::{HostEditSink, NullEditSink, UndoEntry, UndoHistory};
pub use gui::{GuiConstraints, GuiDelegate, NoopGuiDelegate};
pub use parameter_info::{ParameterFlags, ParameterInfo, ParameterKind};
pub use parameter_store::{
    params_to_init_json, ParameterSet, ParameterSetBuilder, ParameterSetError, ParameterSnapshot,
    ParameterStore,
};
pub use parameter_types::{
    index_to_normalized, normalized_to_index, BoolParameter, ChoiceParameter, FloatParameter,
    ParameterRef,
};
pub use state::{load_state, save_state, StateError};
pub use telemetry::{TelemetryPayload, TelemetrySource, DEFAULT_TELEMETRY_EVENT};
pub use types::{parameter_id, ParameterId, ParameterValue, Rect, Size};
pub use webview_handler::WebViewHandler;
