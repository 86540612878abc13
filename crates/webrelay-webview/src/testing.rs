//! Recording surface doubles for tests.
//!
//! [`RecordingFactory`] builds [`RecordingSurface`]s that log every call into
//! a shared [`SurfaceProbe`], which tests keep to inspect what the editor did.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use webrelay_core::Rect;

use crate::error::{Result, WebViewError};
use crate::resource::{Resource, ResourceProvider};
use crate::surface::{RawParent, SurfaceFactory, SurfaceSpec, WebSurface};

#[derive(Debug)]
struct SurfaceLog {
    created: usize,
    visible: bool,
    detached: bool,
    navigations: Vec<String>,
    scripts: Vec<String>,
    user_scripts: Vec<String>,
    bounds: Vec<Rect>,
    resources: Option<Arc<ResourceProvider>>,
}

impl Default for SurfaceLog {
    fn default() -> Self {
        Self {
            created: 0,
            visible: true,
            detached: false,
            navigations: Vec::new(),
            scripts: Vec::new(),
            user_scripts: Vec::new(),
            bounds: Vec::new(),
            resources: None,
        }
    }
}

/// Shared view of what recording surfaces were asked to do.
#[derive(Debug, Clone, Default)]
pub struct SurfaceProbe(Rc<RefCell<SurfaceLog>>);

impl SurfaceProbe {
    /// Number of surfaces the factory built.
    pub fn created(&self) -> usize {
        self.0.borrow().created
    }

    pub fn set_visible(&self, visible: bool) {
        self.0.borrow_mut().visible = visible;
    }

    pub fn is_detached(&self) -> bool {
        self.0.borrow().detached
    }

    pub fn navigations(&self) -> Vec<String> {
        self.0.borrow().navigations.clone()
    }

    /// Scripts evaluated so far, oldest first.
    pub fn scripts(&self) -> Vec<String> {
        self.0.borrow().scripts.clone()
    }

    /// Evaluated scripts calling `function` (e.g. `"_onParams"`).
    pub fn calls_to(&self, function: &str) -> Vec<String> {
        let needle = format!("__RELAY__.{function}(");
        self.0
            .borrow()
            .scripts
            .iter()
            .filter(|s| s.contains(&needle))
            .cloned()
            .collect()
    }

    pub fn clear_scripts(&self) {
        self.0.borrow_mut().scripts.clear();
    }

    /// User scripts the surface was constructed with.
    pub fn user_scripts(&self) -> Vec<String> {
        self.0.borrow().user_scripts.clone()
    }

    pub fn bounds(&self) -> Vec<Rect> {
        self.0.borrow().bounds.clone()
    }

    /// Resolve a request through the surface's resource provider.
    pub fn request(&self, path: &str) -> Option<Resource> {
        self.0.borrow().resources.as_ref()?.resolve(path)
    }
}

/// Surface that records calls instead of rendering.
#[derive(Debug)]
pub struct RecordingSurface {
    probe: SurfaceProbe,
}

impl WebSurface for RecordingSurface {
    fn navigate(&mut self, url: &str) {
        self.probe.0.borrow_mut().navigations.push(url.to_string());
    }

    fn evaluate_js(&self, script: &str) {
        self.probe.0.borrow_mut().scripts.push(script.to_string());
    }

    fn is_visible(&self) -> bool {
        let log = self.probe.0.borrow();
        log.visible && !log.detached
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.probe.0.borrow_mut().bounds.push(bounds);
    }

    fn detach(&mut self) {
        self.probe.0.borrow_mut().detached = true;
    }
}

/// Factory for [`RecordingSurface`]s.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    probe: SurfaceProbe,
    fail: bool,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose `create` always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn probe(&self) -> SurfaceProbe {
        self.probe.clone()
    }
}

impl SurfaceFactory for RecordingFactory {
    fn create(&mut self, _parent: RawParent, spec: SurfaceSpec<'_>) -> Result<Box<dyn WebSurface>> {
        if self.fail {
            return Err(WebViewError::CreationFailed("recording factory set to fail".into()));
        }
        let mut log = self.probe.0.borrow_mut();
        if log.created > 0 && !log.detached {
            return Err(WebViewError::AlreadyAttached);
        }
        log.created += 1;
        log.detached = false;
        log.user_scripts = spec.user_scripts.to_vec();
        log.resources = spec.resources;
        log.bounds.push(spec.initial_bounds);
        drop(log);
        Ok(Box::new(RecordingSurface {
            probe: self.probe.clone(),
        }))
    }
}
