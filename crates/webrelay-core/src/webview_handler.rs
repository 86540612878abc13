//! Custom WebView message handler trait.
//!
//! Implement [`WebViewHandler`] to handle `invoke()` calls and custom events
//! from JavaScript. Parameter synchronization goes through relays and does
//! not require this trait.

/// Handler for custom WebView messages.
pub trait WebViewHandler: Send + Sync {
    /// Handle an invoke call from JavaScript.
    ///
    /// Called on the UI thread when JS calls
    /// `__RELAY__.invoke("method", args...)`.
    /// Return `Ok(value)` to resolve the JS Promise.
    /// Return `Err(message)` to reject the JS Promise.
    fn on_invoke(
        &self,
        _method: &str,
        _args: &[serde_json::Value],
    ) -> Result<serde_json::Value, String> {
        Ok(serde_json::Value::Null)
    }

    /// Handle a custom event from JavaScript.
    ///
    /// Called on the UI thread when JS calls `__RELAY__.emit("name", data)`.
    fn on_event(&self, _name: &str, _data: &serde_json::Value) {}
}
