//! Where the web surface loads its UI from.

use std::path::PathBuf;

use webrelay_core::EditorConfig;

/// Vite's default development server.
pub const DEV_SERVER_URL: &str = "http://localhost:5173";

/// Root URL of the custom scheme backed by the resource provider.
pub const RESOURCE_ROOT_URL: &str = "relay://localhost/";

/// Content source for a web surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebViewSource {
    /// Serve bundled assets through the resource provider.
    Resources,
    /// Navigate to a development server for hot reload.
    DevServer(String),
}

impl WebViewSource {
    /// Source selected by the `dev-server` cargo feature.
    ///
    /// This is a compile-time switch; there is no runtime override.
    pub fn for_build() -> Self {
        if cfg!(feature = "dev-server") {
            Self::DevServer(DEV_SERVER_URL.to_string())
        } else {
            Self::Resources
        }
    }

    /// URL the surface navigates to after construction.
    pub fn start_url(&self) -> &str {
        match self {
            Self::Resources => RESOURCE_ROOT_URL,
            Self::DevServer(url) => url,
        }
    }

    pub fn uses_resources(&self) -> bool {
        matches!(self, Self::Resources)
    }
}

/// Configuration for a web surface.
#[derive(Debug, Clone, PartialEq)]
pub struct WebViewConfig {
    /// Content source.
    pub source: WebViewSource,
    /// Whether to enable developer tools.
    pub dev_tools: bool,
    /// Background color (RGBA) shown before the page paints.
    pub background_color: [u8; 4],
    /// Browser profile directory for engines that need one (WebView2).
    pub user_data_folder: Option<PathBuf>,
}

impl WebViewConfig {
    pub fn new(source: WebViewSource) -> Self {
        Self {
            source,
            dev_tools: false,
            background_color: [0x1a, 0x1a, 0x1a, 0xff],
            user_data_folder: None,
        }
    }

    /// Build from an editor config, using the build's content source.
    pub fn from_editor(config: &EditorConfig) -> Self {
        Self {
            source: WebViewSource::for_build(),
            dev_tools: config.dev_tools,
            background_color: config.background_color,
            user_data_folder: Some(user_data_folder_for(config.name)),
        }
    }

    pub fn with_dev_tools(mut self, enabled: bool) -> Self {
        self.dev_tools = enabled;
        self
    }

    pub fn with_user_data_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.user_data_folder = Some(folder.into());
        self
    }
}

/// Per-plugin browser profile folder in the temp directory.
pub fn user_data_folder_for(plugin_name: &str) -> PathBuf {
    let sanitized: String = plugin_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    std::env::temp_dir().join(format!("{sanitized}_WebView2"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_urls() {
        assert_eq!(WebViewSource::Resources.start_url(), RESOURCE_ROOT_URL);
        assert_eq!(
            WebViewSource::DevServer(DEV_SERVER_URL.into()).start_url(),
            "http://localhost:5173"
        );
    }

    #[cfg(not(feature = "dev-server"))]
    #[test]
    fn release_build_uses_resources() {
        assert_eq!(WebViewSource::for_build(), WebViewSource::Resources);
    }

    #[cfg(feature = "dev-server")]
    #[test]
    fn dev_build_uses_dev_server() {
        assert_eq!(
            WebViewSource::for_build(),
            WebViewSource::DevServer(DEV_SERVER_URL.into())
        );
    }

    #[test]
    fn user_data_folder_is_sanitized() {
        let folder = user_data_folder_for("My Fuzz/2");
        assert!(folder.ends_with("My_Fuzz_2_WebView2"));
    }

    #[test]
    fn from_editor_copies_appearance() {
        let editor = EditorConfig::new("Demo")
            .with_background_color([1, 2, 3, 4])
            .with_dev_tools(true);
        let config = WebViewConfig::from_editor(&editor);
        assert!(config.dev_tools);
        assert_eq!(config.background_color, [1, 2, 3, 4]);
        assert!(config.user_data_folder.is_some());
    }
}
