//! Parameter state persistence.
//!
//! Only parameter values persist. Relays, attachments and the web surface are
//! rebuilt every time the editor opens.
//!
//! The blob is JSON: `{"version":1,"values":{"gain":-6.0,"bypass":0.0}}`
//! with plain values keyed by parameter key. Unknown keys are skipped on
//! load so that removing a parameter does not break old sessions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parameter_store::ParameterStore;

/// Current state format version.
pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StateBlob {
    version: u32,
    values: BTreeMap<String, f64>,
}

/// Errors from saving or restoring parameter state.
#[derive(Debug)]
pub enum StateError {
    /// The blob is not valid state JSON.
    Malformed(serde_json::Error),
    /// The blob was written by a newer format version.
    UnsupportedVersion(u32),
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed state: {e}"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported state version {v}"),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed(e) => Some(e),
            Self::UnsupportedVersion(_) => None,
        }
    }
}

/// Serialize the plain values of every parameter.
pub fn save_state(store: &dyn ParameterStore) -> Result<Vec<u8>, StateError> {
    let blob = StateBlob {
        version: STATE_VERSION,
        values: store
            .iter()
            .map(|p| (p.key().to_string(), p.get_plain()))
            .collect(),
    };
    serde_json::to_vec(&blob).map_err(StateError::Malformed)
}

/// Restore values from a blob produced by [`save_state`].
///
/// Returns the number of parameters that were restored.
pub fn load_state(store: &dyn ParameterStore, data: &[u8]) -> Result<usize, StateError> {
    let blob: StateBlob = serde_json::from_slice(data).map_err(StateError::Malformed)?;
    if blob.version > STATE_VERSION {
        return Err(StateError::UnsupportedVersion(blob.version));
    }

    let mut restored = 0;
    for (key, plain) in &blob.values {
        match store.by_key(key) {
            Some(p) => {
                p.set_plain(*plain);
                restored += 1;
            }
            None => log::warn!("ignoring state for unknown parameter {key:?}"),
        }
    }
    log::debug!("restored {restored} of {} saved parameter values", blob.values.len());
    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_store::ParameterSet;
    use crate::parameter_types::{BoolParameter, ChoiceParameter, FloatParameter};

    static MODES: &[&str] = &["Clean", "Warm", "Crunch"];

    fn store() -> ParameterSet {
        ParameterSet::builder()
            .with(FloatParameter::db("gain", "Gain", 0.0, -60.0..=12.0))
            .with(BoolParameter::bypass("bypass"))
            .with(ChoiceParameter::new("mode", "Mode", MODES, 0))
            .build()
            .unwrap()
    }

    #[test]
    fn values_survive_a_session() {
        let a = store();
        a.by_key("gain").unwrap().set_plain(-6.0);
        a.by_key("bypass").unwrap().set_plain(1.0);
        a.by_key("mode").unwrap().set_plain(2.0);
        let blob = save_state(&a).unwrap();

        let b = store();
        assert_eq!(load_state(&b, &blob).unwrap(), 3);
        assert!((b.by_key("gain").unwrap().get_plain() + 6.0).abs() < 1e-9);
        assert_eq!(b.by_key("bypass").unwrap().get_plain(), 1.0);
        assert_eq!(b.by_key("mode").unwrap().display(), "Crunch");
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let params = store();
        let blob = br#"{"version":1,"values":{"gain":-12.0,"removed":3.0}}"#;
        assert_eq!(load_state(&params, blob).unwrap(), 1);
    }

    #[test]
    fn newer_version_is_rejected() {
        let params = store();
        let blob = br#"{"version":99,"values":{}}"#;
        assert!(matches!(
            load_state(&params, blob),
            Err(StateError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let params = store();
        assert!(matches!(load_state(&params, b"not json"), Err(StateError::Malformed(_))));
    }
}
