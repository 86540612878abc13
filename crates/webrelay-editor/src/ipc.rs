//! Messages posted by the page.
//!
//! The page sends `postMessage(JSON.stringify(msg))`; every message is an
//! object with a `type` field.

use serde::Deserialize;
use serde_json::Value;

/// A message from the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum WebMessage {
    /// A control changed. Sliders send a normalized number, toggles a
    /// bool, combo boxes a choice index.
    #[serde(rename = "param:set")]
    ParamSet { key: String, value: Value },
    /// A drag gesture started.
    #[serde(rename = "param:begin")]
    ParamBegin { key: String },
    /// A drag gesture ended.
    #[serde(rename = "param:end")]
    ParamEnd { key: String },
    /// `__RELAY__.invoke(method, ...args)`; answered with `_onResult`.
    #[serde(rename = "invoke")]
    Invoke {
        method: String,
        #[serde(default)]
        args: Vec<Value>,
        #[serde(rename = "callId", default)]
        call_id: u64,
    },
    /// `__RELAY__.emit(name, data)`.
    #[serde(rename = "event")]
    Event {
        name: String,
        #[serde(default)]
        data: Value,
    },
}

const KNOWN_TYPES: [&str; 5] = ["param:set", "param:begin", "param:end", "invoke", "event"];

/// Parse a raw page message. Malformed and unknown messages are logged and
/// dropped.
pub fn parse_message(json: &str) -> Option<WebMessage> {
    let Ok(raw) = serde_json::from_str::<Value>(json) else {
        log::warn!("invalid IPC message JSON: {json}");
        return None;
    };
    let Some(kind) = raw.get("type").and_then(Value::as_str).map(str::to_owned) else {
        log::warn!("IPC message without a type: {json}");
        return None;
    };
    if !KNOWN_TYPES.contains(&kind.as_str()) {
        log::debug!("unknown IPC message type: {kind}");
        return None;
    }
    match serde_json::from_value(raw) {
        Ok(message) => Some(message),
        Err(e) => {
            log::warn!("malformed {kind} message: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_parameter_messages() {
        assert_eq!(
            parse_message(r#"{"type":"param:set","key":"gain","value":0.25}"#),
            Some(WebMessage::ParamSet {
                key: "gain".into(),
                value: json!(0.25)
            })
        );
        assert_eq!(
            parse_message(r#"{"type":"param:begin","key":"gain"}"#),
            Some(WebMessage::ParamBegin { key: "gain".into() })
        );
    }

    #[test]
    fn invoke_defaults() {
        assert_eq!(
            parse_message(r#"{"type":"invoke","method":"reset"}"#),
            Some(WebMessage::Invoke {
                method: "reset".into(),
                args: vec![],
                call_id: 0
            })
        );
    }

    #[test]
    fn drops_garbage() {
        assert_eq!(parse_message("not json"), None);
        assert_eq!(parse_message(r#"{"key":"gain"}"#), None);
        assert_eq!(parse_message(r#"{"type":"resize"}"#), None);
    }

    #[test]
    fn known_type_with_missing_fields_is_dropped() {
        assert_eq!(parse_message(r#"{"type":"param:set","value":1}"#), None);
        assert_eq!(parse_message(r#"{"type":"invoke","args":[]}"#), None);
        assert_eq!(parse_message(r#"{"type":"param:end","key":3}"#), None);
    }
}
