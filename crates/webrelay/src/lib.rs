//! # webrelay
//!
//! Web UI editors for audio plugins.
//!
//! A plugin declares which of its parameters the page may drive, builds a
//! web surface with those relays registered, and binds the result to its
//! parameter store and the host's edit notifications.
//!
//! ## Architecture
//!
//! ```text
//! Your plugin (ParameterSet, TelemetrySource)
//!        ↓
//! webrelay-editor (RelaySet → SurfaceOptions → UnboundEditor → Editor)
//!        ↓
//! webrelay-webview (WebSurface, ResourceProvider, bridge script)
//!        ↓
//! platform backend (WKWebView, WebView2)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use webrelay::prelude::*;
//!
//! static CONFIG: EditorConfig = EditorConfig::new("My Gain").with_size(600, 400);
//!
//! fn open(factory: &mut dyn SurfaceFactory, parent: RawParent,
//!         params: Arc<ParameterSet>, sink: Arc<dyn HostEditSink>) -> Result<Editor, RelayError> {
//!     let relays = RelaySet::new().slider("gain")?.toggle("bypass")?;
//!     SurfaceOptions::from_editor_config(&CONFIG)
//!         .with_relays(relays)
//!         .build(factory, parent)?
//!         .bind(params, sink)
//! }
//! ```

// Re-export sub-crates
pub use webrelay_core as core;
pub use webrelay_editor as editor;
pub use webrelay_webview as webview;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use webrelay::prelude::*;
/// ```
pub mod prelude {
    pub use webrelay_core::{
        // Parameters
        BoolParameter, ChoiceParameter, FloatParameter, ParameterFlags, ParameterInfo,
        ParameterKind, ParameterRef, ParameterSet, ParameterStore,
        // Host edits and undo
        HostEditSink, NullEditSink, UndoHistory,
        // State
        load_state, save_state, StateError,
        // Configuration
        ConfigError, ConfigFile, EditorConfig,
        // Editor hooks
        GuiConstraints, GuiDelegate, NoopGuiDelegate, WebViewHandler,
        // Telemetry
        TelemetryPayload, TelemetrySource,
        // Geometry
        Rect, Size,
    };

    pub use webrelay_editor::{
        Editor, PumpOutcome, Relay, RelayError, RelayKind, RelaySet, RelayState, SurfaceOptions,
        TelemetryPump, UnboundEditor,
    };

    pub use webrelay_webview::{
        AssetDirectory, EmbeddedAsset, EmbeddedAssets, RawParent, ResourceProvider, SurfaceFactory,
        WebSurface, WebViewConfig, WebViewError, WebViewSource,
    };
}
