//! Relays: named channels between a web control and a parameter.
//!
//! A relay is declared with a key and a control kind. The page asks for it
//! by the same key (`getSliderState("gain")`), and binding pairs it with the
//! parameter whose key matches.

use serde::Serialize;
use webrelay_core::ParameterKind;

use crate::error::RelayError;

/// Web control a relay drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelayKind {
    /// Continuous control; exchanges normalized values.
    Slider,
    /// On/off control.
    Toggle,
    /// Choice from a fixed list.
    ComboBox,
}

impl RelayKind {
    /// Name used by the page's accessors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slider => "slider",
            Self::Toggle => "toggle",
            Self::ComboBox => "comboBox",
        }
    }

    /// The parameter kind this relay can drive.
    pub fn parameter_kind(&self) -> ParameterKind {
        match self {
            Self::Slider => ParameterKind::Float,
            Self::Toggle => ParameterKind::Bool,
            Self::ComboBox => ParameterKind::Choice,
        }
    }

    /// Toggles and combo boxes change in discrete steps; each change is its
    /// own edit span.
    pub fn is_discrete(&self) -> bool {
        !matches!(self, Self::Slider)
    }
}

/// Lifecycle of a relay.
///
/// Advances strictly forward: `Created -> Registered -> Bound -> Active`,
/// and any state ends in `TornDown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelayState {
    /// Declared, not yet handed to surface options.
    Created,
    /// Registered with surface options; the page will know the key.
    Registered,
    /// Paired with a parameter.
    Bound,
    /// The page has loaded and received the initial values.
    Active,
    /// The surface is gone.
    TornDown,
}

/// A single named relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relay {
    key: String,
    kind: RelayKind,
    #[serde(skip)]
    state: RelayState,
}

impl Relay {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> RelayKind {
        self.kind
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub(crate) fn advance(&mut self, to: RelayState) {
        if to > self.state {
            self.state = to;
        } else {
            log::debug!("relay {:?} stays {:?}, ignoring {:?}", self.key, self.state, to);
        }
    }
}

/// Ordered collection of relays with unique keys.
///
/// ```
/// use webrelay_editor::{RelayKind, RelaySet};
///
/// # fn main() -> Result<(), webrelay_editor::RelayError> {
/// let relays = RelaySet::new()
///     .slider("gain")?
///     .toggle("bypass")?
///     .combo_box("mode")?;
///
/// assert_eq!(relays.get("mode").map(|r| r.kind()), Some(RelayKind::ComboBox));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelaySet {
    relays: Vec<Relay>,
}

impl RelaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a slider relay.
    pub fn slider(self, key: impl Into<String>) -> Result<Self, RelayError> {
        self.with(key, RelayKind::Slider)
    }

    /// Declare a toggle relay.
    pub fn toggle(self, key: impl Into<String>) -> Result<Self, RelayError> {
        self.with(key, RelayKind::Toggle)
    }

    /// Declare a combo box relay.
    pub fn combo_box(self, key: impl Into<String>) -> Result<Self, RelayError> {
        self.with(key, RelayKind::ComboBox)
    }

    /// Declare a relay of any kind.
    pub fn with(mut self, key: impl Into<String>, kind: RelayKind) -> Result<Self, RelayError> {
        let key = key.into();
        if key.is_empty() {
            return Err(RelayError::EmptyKey);
        }
        if self.get(&key).is_some() {
            return Err(RelayError::DuplicateKey(key));
        }
        self.relays.push(Relay {
            key,
            kind,
            state: RelayState::Created,
        });
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Relay> {
        self.relays.iter().find(|r| r.key == key)
    }

    pub fn len(&self) -> usize {
        self.relays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relays.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Relay> {
        self.relays.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.relays.iter().map(|r| r.key.as_str())
    }

    /// Declarations as the JSON array the page registers.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.relays).unwrap_or_else(|e| {
            log::error!("failed to serialize relays: {e}");
            "[]".to_string()
        })
    }

    pub(crate) fn advance_all(&mut self, to: RelayState) {
        for relay in &mut self.relays {
            relay.advance(to);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Relay> {
        self.relays
    }
}

impl<'a> IntoIterator for &'a RelaySet {
    type Item = &'a Relay;
    type IntoIter = std::slice::Iter<'a, Relay>;

    fn into_iter(self) -> Self::IntoIter {
        self.relays.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_in_order() {
        let relays = RelaySet::new()
            .slider("gain")
            .and_then(|r| r.toggle("bypass"))
            .and_then(|r| r.combo_box("mode"))
            .unwrap();
        assert_eq!(relays.keys().collect::<Vec<_>>(), ["gain", "bypass", "mode"]);
        assert!(relays.iter().all(|r| r.state() == RelayState::Created));
    }

    #[test]
    fn rejects_duplicate_and_empty_keys() {
        let relays = RelaySet::new().slider("gain").unwrap();
        assert!(matches!(
            relays.clone().toggle("gain"),
            Err(RelayError::DuplicateKey(k)) if k == "gain"
        ));
        assert!(matches!(relays.slider(""), Err(RelayError::EmptyKey)));
    }

    #[test]
    fn json_carries_key_and_kind() {
        let relays = RelaySet::new()
            .slider("gain")
            .and_then(|r| r.combo_box("mode"))
            .unwrap();
        assert_eq!(
            relays.to_json(),
            r#"[{"key":"gain","kind":"slider"},{"key":"mode","kind":"comboBox"}]"#
        );
    }

    #[test]
    fn states_only_move_forward() {
        let mut relays = RelaySet::new().slider("gain").unwrap();
        relays.advance_all(RelayState::Bound);
        relays.advance_all(RelayState::Registered);
        assert_eq!(relays.get("gain").unwrap().state(), RelayState::Bound);
        relays.advance_all(RelayState::TornDown);
        assert_eq!(relays.get("gain").unwrap().state(), RelayState::TornDown);
    }

    #[test]
    fn kinds_map_to_parameter_kinds() {
        assert_eq!(RelayKind::Slider.parameter_kind(), ParameterKind::Float);
        assert_eq!(RelayKind::Toggle.parameter_kind(), ParameterKind::Bool);
        assert_eq!(RelayKind::ComboBox.parameter_kind(), ParameterKind::Choice);
        assert!(RelayKind::ComboBox.is_discrete());
        assert!(!RelayKind::Slider.is_discrete());
    }
}
