//! Error types for web surface operations.

/// Errors that can occur during web surface operations.
#[derive(Debug)]
pub enum WebViewError {
    /// Surface creation failed.
    CreationFailed(String),
    /// A surface is already attached to this parent.
    AlreadyAttached,
    /// The surface has been torn down.
    NotAttached,
}

impl std::fmt::Display for WebViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreationFailed(msg) => write!(f, "webview creation failed: {msg}"),
            Self::AlreadyAttached => write!(f, "webview already attached"),
            Self::NotAttached => write!(f, "no webview attached"),
        }
    }
}

impl std::error::Error for WebViewError {}

/// Result type for web surface operations.
pub type Result<T> = std::result::Result<T, WebViewError>;
