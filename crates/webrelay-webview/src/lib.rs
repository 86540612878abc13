//! Web surface support for webrelay editors.
//!
//! This crate owns the browser-facing half of an editor: the
//! [`WebSurface`] seam platform backends implement, bundled asset serving
//! through [`ResourceProvider`], the content source switch, and the
//! JavaScript bridge injected into every page.

pub mod assets;
pub mod bridge;
mod error;
pub mod mime;
pub mod resource;
pub mod source;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use assets::{AssetDirectory, AssetSource, EmbeddedAsset, EmbeddedAssets};
pub use bridge::{emit_event_if_visible, BRIDGE_SCRIPT};
pub use error::{Result, WebViewError};
pub use resource::{Resource, ResourceProvider, DEFAULT_DOCUMENT};
pub use source::{WebViewConfig, WebViewSource, DEV_SERVER_URL, RESOURCE_ROOT_URL};
pub use surface::{RawParent, SurfaceFactory, SurfaceSpec, WebSurface};
