//! The web surface seam.
//!
//! A platform backend (WKWebView, WebView2, ...) implements [`WebSurface`]
//! for a live browser view and [`SurfaceFactory`] to build one inside the
//! host's parent window. Messages from the page are routed by the backend
//! into the editor; the surface itself only carries the native-to-web side.

use std::ffi::c_void;
use std::sync::Arc;

use webrelay_core::Rect;

use crate::error::Result;
use crate::resource::ResourceProvider;
use crate::source::WebViewConfig;

/// A live, embedded browser view.
pub trait WebSurface {
    /// Load `url` in the view.
    fn navigate(&mut self, url: &str);

    /// Evaluate a script in the page. Fire-and-forget.
    fn evaluate_js(&self, script: &str);

    /// Whether the view is currently shown on screen.
    fn is_visible(&self) -> bool;

    /// Position the view inside its parent.
    fn set_bounds(&mut self, bounds: Rect);

    /// Remove the view from its parent. Called exactly once, at teardown.
    fn detach(&mut self);
}

/// Native parent window handle (`NSView*`, `HWND`) supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawParent(*mut c_void);

impl RawParent {
    /// Wrap a host-provided parent handle.
    ///
    /// # Safety
    ///
    /// `handle` must be a valid platform view handle that outlives the
    /// surface built inside it, and must only be used on the UI thread.
    pub unsafe fn new(handle: *mut c_void) -> Self {
        Self(handle)
    }

    /// No parent; for off-screen surfaces.
    pub const fn detached() -> Self {
        Self(std::ptr::null_mut())
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0
    }

    pub fn is_detached(&self) -> bool {
        self.0.is_null()
    }
}

/// Everything a factory needs to construct a surface.
///
/// Built from the editor's surface options; immutable once handed over.
pub struct SurfaceSpec<'a> {
    pub config: &'a WebViewConfig,
    /// Scripts to inject before any page script runs, in order.
    pub user_scripts: &'a [String],
    /// Serves `relay://` requests when loading bundled resources.
    pub resources: Option<Arc<ResourceProvider>>,
    pub initial_bounds: Rect,
}

/// Builds platform surfaces.
pub trait SurfaceFactory {
    /// Create a surface inside `parent`. The surface must not navigate yet.
    fn create(&mut self, parent: RawParent, spec: SurfaceSpec<'_>) -> Result<Box<dyn WebSurface>>;
}
