//! The JavaScript side of the bridge and the scripts that drive it.
//!
//! [`BRIDGE_SCRIPT`] is injected into every page and installs
//! `window.__RELAY__`. Native code talks to the page by evaluating the
//! `_on*` calls built here.

use serde::Serialize;
use serde_json::Value;

use crate::surface::WebSurface;

/// Installs `window.__RELAY__` in the page.
pub const BRIDGE_SCRIPT: &str = include_str!("bridge.js");

fn call(function: &str, args: &[&str]) -> String {
    format!("window.__RELAY__.{function}({})", args.join(","))
}

fn to_json(data: &impl Serialize) -> Option<String> {
    match serde_json::to_string(data) {
        Ok(json) => Some(json),
        Err(e) => {
            log::error!("failed to serialize bridge payload: {e}");
            None
        }
    }
}

/// Declare relays to the page. `relays_json` is a JSON array.
pub fn register_relays_script(relays_json: &str) -> String {
    call("_registerRelays", &[relays_json])
}

/// Initial state dump. `snapshots_json` is a JSON array.
pub fn init_script(snapshots_json: &str) -> String {
    call("_onInit", &[snapshots_json])
}

/// Changed parameter values keyed by relay key.
pub fn params_script(values: &serde_json::Map<String, Value>) -> Option<String> {
    to_json(values).map(|json| call("_onParams", &[&json]))
}

/// Resolve or reject the page's pending `invoke()` promise.
pub fn result_script(call_id: u64, result: &Result<Value, String>) -> Option<String> {
    let body = match result {
        Ok(value) => serde_json::json!({ "ok": value }),
        Err(message) => serde_json::json!({ "err": message }),
    };
    to_json(&body).map(|json| call("_onResult", &[&call_id.to_string(), &json]))
}

/// Deliver a named event to the page's listeners.
pub fn event_script(name: &str, data: &impl Serialize) -> Option<String> {
    let name = to_json(&name)?;
    let data = to_json(data)?;
    Some(call("_onEvent", &[&name, &data]))
}

/// Emit an event only if the surface is visible.
///
/// Returns whether the event was sent. Hidden surfaces drop the event;
/// nothing is queued.
pub fn emit_event_if_visible(surface: &dyn WebSurface, name: &str, data: &impl Serialize) -> bool {
    if !surface.is_visible() {
        return false;
    }
    match event_script(name, data) {
        Some(script) => {
            surface.evaluate_js(&script);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_well_formed() {
        assert_eq!(
            register_relays_script(r#"[{"key":"gain","kind":"slider"}]"#),
            r#"window.__RELAY__._registerRelays([{"key":"gain","kind":"slider"}])"#
        );
        let mut values = serde_json::Map::new();
        values.insert("gain".into(), serde_json::json!(0.5));
        assert_eq!(
            params_script(&values).unwrap(),
            r#"window.__RELAY__._onParams({"gain":0.5})"#
        );
    }

    #[test]
    fn event_names_are_escaped() {
        let script = event_script("a\"b", &serde_json::json!({"x": 1})).unwrap();
        assert_eq!(script, r#"window.__RELAY__._onEvent("a\"b",{"x":1})"#);
    }

    #[test]
    fn results() {
        assert_eq!(
            result_script(7, &Ok(serde_json::json!(3))).unwrap(),
            r#"window.__RELAY__._onResult(7,{"ok":3})"#
        );
        assert_eq!(
            result_script(8, &Err("no".into())).unwrap(),
            r#"window.__RELAY__._onResult(8,{"err":"no"})"#
        );
    }

    #[test]
    fn bridge_declares_accessors() {
        for accessor in ["getSliderState", "getToggleState", "getComboBoxState", "_onInit"] {
            assert!(BRIDGE_SCRIPT.contains(accessor), "{accessor}");
        }
    }
}
