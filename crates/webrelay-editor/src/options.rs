//! Surface options: what the surface is built with.
//!
//! Options collect the content source, resource provider, relays and extra
//! scripts. [`SurfaceOptions::build`] consumes them, so nothing can be
//! registered once the surface exists.

use std::sync::Arc;

use webrelay_core::{EditorConfig, GuiConstraints, Rect};
use webrelay_webview::bridge::{register_relays_script, BRIDGE_SCRIPT};
use webrelay_webview::{
    AssetDirectory, AssetSource, RawParent, ResourceProvider, SurfaceFactory, SurfaceSpec,
    WebViewConfig, WebViewError,
};

use crate::editor::UnboundEditor;
use crate::error::RelayError;
use crate::relay::{RelaySet, RelayState};

/// Builder for a web surface and its relays.
#[derive(Debug)]
pub struct SurfaceOptions {
    config: WebViewConfig,
    relays: RelaySet,
    resources: Option<Arc<ResourceProvider>>,
    user_scripts: Vec<String>,
    bounds: Rect,
    constraints: GuiConstraints,
}

impl SurfaceOptions {
    pub fn new(config: WebViewConfig) -> Self {
        let size = webrelay_core::config::DEFAULT_EDITOR_SIZE;
        Self {
            config,
            relays: RelaySet::new(),
            resources: None,
            user_scripts: Vec::new(),
            bounds: Rect::from_size(size),
            constraints: GuiConstraints::default(),
        }
    }

    /// Options sized and styled from an editor config.
    pub fn from_editor_config(config: &EditorConfig) -> Self {
        Self {
            bounds: Rect::from_size(config.size),
            constraints: config.constraints(),
            ..Self::new(WebViewConfig::from_editor(config))
        }
    }

    /// Register relays. Replaces any set registered earlier.
    pub fn with_relays(mut self, mut relays: RelaySet) -> Self {
        if !self.relays.is_empty() {
            log::warn!("replacing {} previously registered relays", self.relays.len());
        }
        relays.advance_all(RelayState::Registered);
        self.relays = relays;
        self
    }

    /// Serve bundled resources from `provider`.
    pub fn with_resource_provider(mut self, provider: ResourceProvider) -> Self {
        self.resources = Some(Arc::new(provider));
        self
    }

    /// Serve bundled resources from `source`.
    pub fn with_assets(self, source: impl AssetSource + 'static) -> Self {
        self.with_resource_provider(ResourceProvider::new(source))
    }

    /// Inject `script` after the bridge, before page scripts run.
    pub fn with_user_script(mut self, script: impl Into<String>) -> Self {
        self.user_scripts.push(script.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Size constraints for [`Editor::resize`](crate::Editor::resize).
    ///
    /// A maximum below the minimum is treated as equal to the minimum.
    pub fn with_constraints(mut self, constraints: GuiConstraints) -> Self {
        if !constraints.is_ordered() {
            log::warn!("editor size constraints have max below min: {constraints:?}");
        }
        self.constraints = constraints;
        self
    }

    pub fn config(&self) -> &WebViewConfig {
        &self.config
    }

    pub fn relays(&self) -> &RelaySet {
        &self.relays
    }

    /// Build the surface inside `parent` and navigate it.
    ///
    /// When loading bundled resources without an explicit provider, assets
    /// are served from the UI directory beside the running binary.
    pub fn build(self, factory: &mut dyn SurfaceFactory, parent: RawParent) -> Result<UnboundEditor, RelayError> {
        let resources = match (&self.resources, self.config.source.uses_resources()) {
            (Some(provider), _) => Some(Arc::clone(provider)),
            (None, true) => {
                let dir = AssetDirectory::beside_current_exe().map_err(|e| {
                    WebViewError::CreationFailed(format!("cannot locate bundled UI: {e}"))
                })?;
                log::info!("serving web UI from {}", dir.root().display());
                Some(Arc::new(ResourceProvider::new(dir)))
            }
            (None, false) => None,
        };

        let mut scripts = Vec::with_capacity(self.user_scripts.len() + 2);
        scripts.push(BRIDGE_SCRIPT.to_string());
        scripts.push(register_relays_script(&self.relays.to_json()));
        scripts.extend(self.user_scripts);

        let mut surface = factory
            .create(
                parent,
                SurfaceSpec {
                    config: &self.config,
                    user_scripts: &scripts,
                    resources,
                    initial_bounds: self.bounds,
                },
            )
            .map_err(|e| {
                log::error!("failed to create web surface: {e}");
                e
            })?;

        let url = self.config.source.start_url();
        log::debug!("navigating web surface to {url}");
        surface.navigate(url);

        Ok(UnboundEditor::new(surface, self.relays, self.constraints))
    }
}
