//! Editor sizing and lifecycle hooks.

use crate::types::Size;

/// Size constraints for the plugin editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuiConstraints {
    /// Minimum size.
    pub min: Size,
    /// Maximum size.
    pub max: Size,
    /// Whether the editor is resizable.
    pub resizable: bool,
}

impl Default for GuiConstraints {
    fn default() -> Self {
        Self {
            min: Size::new(400, 300),
            max: Size::new(1600, 1200),
            resizable: true,
        }
    }
}

impl GuiConstraints {
    /// Clamp `size` into the constraints.
    ///
    /// A maximum below the minimum is raised to the minimum.
    pub fn clamp(&self, size: Size) -> Size {
        Size::new(
            size.width.clamp(self.min.width, self.max.width.max(self.min.width)),
            size.height.clamp(self.min.height, self.max.height.max(self.min.height)),
        )
    }

    /// Whether min <= max on both axes.
    pub fn is_ordered(&self) -> bool {
        self.min.width <= self.max.width && self.min.height <= self.max.height
    }
}

/// Plugin-side editor callbacks.
///
/// The editor owns the web surface; this trait only provides lifecycle hooks
/// to the plugin.
pub trait GuiDelegate: Send {
    /// Called after the surface is built and relays are bound.
    fn gui_opened(&mut self) {}

    /// Called before the surface is torn down.
    fn gui_closed(&mut self) {}

    /// Called when the editor is resized.
    ///
    /// The new size has already been constrained.
    fn gui_resized(&mut self, _new_size: Size) {}
}

/// Delegate with no hooks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGuiDelegate;

impl GuiDelegate for NoopGuiDelegate {}
