//! Relay errors.

use webrelay_core::ParameterKind;
use webrelay_webview::WebViewError;

use crate::relay::RelayKind;

/// Errors declaring, building or binding relays.
#[derive(Debug)]
pub enum RelayError {
    /// Two relays share a key.
    DuplicateKey(String),
    /// A relay was declared with an empty key.
    EmptyKey,
    /// No parameter has the relay's key.
    UnknownParameter { key: String },
    /// The relay kind cannot drive the parameter's kind.
    KindMismatch {
        key: String,
        relay: RelayKind,
        parameter: ParameterKind,
    },
    /// The web surface could not be created.
    Surface(WebViewError),
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "relay {key:?} is declared twice"),
            Self::EmptyKey => write!(f, "relay key must not be empty"),
            Self::UnknownParameter { key } => {
                write!(f, "relay {key:?} does not match any parameter")
            }
            Self::KindMismatch { key, relay, parameter } => write!(
                f,
                "relay {key:?} is a {} but the parameter is a {}",
                relay.as_str(),
                parameter.as_str()
            ),
            Self::Surface(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WebViewError> for RelayError {
    fn from(e: WebViewError) -> Self {
        Self::Surface(e)
    }
}
