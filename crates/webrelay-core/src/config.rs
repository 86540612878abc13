//! Editor configuration.
//!
//! [`EditorConfig`] is a const-constructible description of the editor
//! window and its telemetry schedule. [`ConfigFile`] reads the same settings
//! from a `Config.toml` next to the plugin crate.
//!
//! # Example
//!
//! ```
//! use webrelay_core::EditorConfig;
//!
//! pub static CONFIG: EditorConfig = EditorConfig::new("My Plugin")
//!     .with_size(800, 500)
//!     .with_background_color([0x1a, 0x1a, 0x1a, 0xff]);
//!
//! assert_eq!(CONFIG.size.width, 800);
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::gui::GuiConstraints;
use crate::telemetry::DEFAULT_TELEMETRY_EVENT;
use crate::types::Size;

/// Default telemetry push rate in Hz.
pub const DEFAULT_TELEMETRY_RATE_HZ: u32 = 30;

/// Default editor size.
pub const DEFAULT_EDITOR_SIZE: Size = Size::new(800, 500);

/// Editor window and telemetry configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Plugin display name.
    pub name: &'static str,
    /// Initial editor size.
    pub size: Size,
    /// Whether the host may resize the editor.
    pub resizable: bool,
    /// Background color (RGBA) painted behind the web surface while it loads.
    pub background_color: [u8; 4],
    /// Telemetry pushes per second. 0 disables the pump.
    pub telemetry_rate_hz: u32,
    /// Event name telemetry is emitted under.
    pub telemetry_event: &'static str,
    /// Enable the browser's developer tools.
    pub dev_tools: bool,
}

impl EditorConfig {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            size: DEFAULT_EDITOR_SIZE,
            resizable: false,
            background_color: [0x1a, 0x1a, 0x1a, 0xff],
            telemetry_rate_hz: DEFAULT_TELEMETRY_RATE_HZ,
            telemetry_event: DEFAULT_TELEMETRY_EVENT,
            dev_tools: cfg!(debug_assertions),
        }
    }

    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub const fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub const fn with_background_color(mut self, rgba: [u8; 4]) -> Self {
        self.background_color = rgba;
        self
    }

    pub const fn with_telemetry_rate(mut self, hz: u32) -> Self {
        self.telemetry_rate_hz = hz;
        self
    }

    pub const fn with_telemetry_event(mut self, name: &'static str) -> Self {
        self.telemetry_event = name;
        self
    }

    pub const fn with_dev_tools(mut self, enabled: bool) -> Self {
        self.dev_tools = enabled;
        self
    }

    /// Size constraints implied by this config.
    ///
    /// A fixed-size editor has min == max == `size`.
    pub fn constraints(&self) -> GuiConstraints {
        if self.resizable {
            GuiConstraints {
                resizable: true,
                ..GuiConstraints::default()
            }
        } else {
            GuiConstraints {
                min: self.size,
                max: self.size,
                resizable: false,
            }
        }
    }

    /// Background color as a CSS `#rrggbbaa` string.
    pub fn background_css(&self) -> String {
        let [r, g, b, a] = self.background_color;
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

// =========================================================================
// Config.toml
// =========================================================================

/// Errors reading a `Config.toml`.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The file is not valid TOML for this schema.
    Parse(toml::de::Error),
    /// The file parsed but a value is out of range.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

/// Plugin configuration from Config.toml.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Plugin display name.
    pub name: String,
    /// Plugin identifier (UUID), written by `cargo xtask new`.
    pub plugin_id: Option<String>,
    /// Editor settings.
    #[serde(default)]
    pub editor: EditorSection,
}

/// `[editor]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorSection {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub resizable: Option<bool>,
    /// `#rrggbb` or `#rrggbbaa`.
    pub background_color: Option<String>,
    pub telemetry_rate_hz: Option<u32>,
    pub dev_tools: Option<bool>,
}

impl ConfigFile {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text).map_err(ConfigError::Parse)?;
        file.validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&text)
    }

    /// Validate the config file contents.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name must not be empty".into()));
        }
        if let Some(id) = &self.plugin_id {
            if !is_uuid(id) {
                return Err(ConfigError::Invalid(format!(
                    "plugin_id must be formatted XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX, got {id:?}"
                )));
            }
        }
        let editor = &self.editor;
        for (field, value) in [("width", editor.width), ("height", editor.height)] {
            if value == Some(0) {
                return Err(ConfigError::Invalid(format!("editor.{field} must be positive")));
            }
        }
        if let Some(rate) = editor.telemetry_rate_hz {
            if rate > 240 {
                return Err(ConfigError::Invalid(format!(
                    "editor.telemetry_rate_hz must be at most 240, got {rate}"
                )));
            }
        }
        if let Some(color) = &editor.background_color {
            parse_color(color).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "editor.background_color must be #rrggbb or #rrggbbaa, got {color:?}"
                ))
            })?;
        }
        Ok(())
    }

    /// Apply the file's settings on top of `base`.
    ///
    /// The name stays `base.name` because [`EditorConfig`] borrows `'static`
    /// strings; the file's name is available on `self.name`.
    pub fn apply_to(&self, base: EditorConfig) -> EditorConfig {
        let e = &self.editor;
        let mut config = base;
        if let (Some(w), Some(h)) = (e.width, e.height) {
            config.size = Size::new(w, h);
        } else if let Some(w) = e.width {
            config.size.width = w;
        } else if let Some(h) = e.height {
            config.size.height = h;
        }
        if let Some(r) = e.resizable {
            config.resizable = r;
        }
        if let Some(rgba) = e.background_color.as_deref().and_then(parse_color) {
            config.background_color = rgba;
        }
        if let Some(rate) = e.telemetry_rate_hz {
            config.telemetry_rate_hz = rate;
        }
        if let Some(dev) = e.dev_tools {
            config.dev_tools = dev;
        }
        config
    }
}

fn is_uuid(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Parse `#rrggbb` / `#rrggbbaa`.
pub fn parse_color(s: &str) -> Option<[u8; 4]> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { byte(6)? } else { 0xff };
    Some([byte(0)?, byte(2)?, byte(4)?, alpha])
}
