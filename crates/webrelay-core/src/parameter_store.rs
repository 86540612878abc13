//! Keyed parameter collections.
//!
//! [`ParameterStore`] is the type-erased view editors work against.
//! [`ParameterSet`] is the owned implementation plugins build at startup.
//!
//! ```
//! use webrelay_core::{BoolParameter, FloatParameter, ParameterSet, ParameterStore};
//!
//! let parameters = ParameterSet::builder()
//!     .with(FloatParameter::db("gain", "Gain", 0.0, -60.0..=12.0))
//!     .with(BoolParameter::bypass("bypass"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(parameters.count(), 2);
//! assert!(parameters.by_key("gain").is_some());
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::parameter_types::ParameterRef;
use crate::types::{ParameterId, ParameterValue};

/// Type-erased, keyed access to a plugin's parameters.
pub trait ParameterStore: Send + Sync {
    /// Total number of parameters.
    fn count(&self) -> usize;

    /// Parameter at `index` in declaration order.
    fn get(&self, index: usize) -> Option<&dyn ParameterRef>;

    /// Look up a parameter by its string key.
    fn by_key(&self, key: &str) -> Option<&dyn ParameterRef> {
        (0..self.count())
            .filter_map(|i| self.get(i))
            .find(|p| p.key() == key)
    }

    /// Look up a parameter by its numeric id.
    fn by_id(&self, id: ParameterId) -> Option<&dyn ParameterRef> {
        (0..self.count())
            .filter_map(|i| self.get(i))
            .find(|p| p.id() == id)
    }

    /// Current normalized value of `id`, or `None` if unknown.
    fn get_normalized(&self, id: ParameterId) -> Option<ParameterValue> {
        self.by_id(id).map(|p| p.get_normalized())
    }

    /// Set the normalized value of `id`. Returns `false` if unknown.
    fn set_normalized(&self, id: ParameterId, value: ParameterValue) -> bool {
        match self.by_id(id) {
            Some(p) => {
                p.set_normalized(value);
                true
            }
            None => false,
        }
    }

    /// Iterate parameters in declaration order.
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn ParameterRef> + '_> {
        Box::new((0..self.count()).filter_map(move |i| self.get(i)))
    }
}

/// Error building a [`ParameterSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterSetError {
    /// Two parameters share a key.
    DuplicateKey(&'static str),
    /// Two distinct keys hash to the same numeric id.
    IdCollision {
        first: &'static str,
        second: &'static str,
    },
    /// A parameter was declared with an empty key.
    EmptyKey,
}

impl std::fmt::Display for ParameterSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "duplicate parameter key {key:?}"),
            Self::IdCollision { first, second } => {
                write!(f, "parameter keys {first:?} and {second:?} hash to the same id")
            }
            Self::EmptyKey => write!(f, "parameter key must not be empty"),
        }
    }
}

impl std::error::Error for ParameterSetError {}

/// Owned parameter collection indexed by key and id.
pub struct ParameterSet {
    parameters: Vec<Box<dyn ParameterRef>>,
    by_key: HashMap<&'static str, usize>,
    by_id: HashMap<ParameterId, usize>,
}

impl ParameterSet {
    pub fn builder() -> ParameterSetBuilder {
        ParameterSetBuilder::default()
    }

    /// Reset every parameter to its default value.
    pub fn reset_to_defaults(&self) {
        for p in &self.parameters {
            p.set_normalized(p.info().default_normalized);
        }
    }

    /// Declared keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.parameters.iter().map(|p| p.key())
    }
}

impl std::fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterSet")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ParameterStore for ParameterSet {
    fn count(&self) -> usize {
        self.parameters.len()
    }

    fn get(&self, index: usize) -> Option<&dyn ParameterRef> {
        self.parameters.get(index).map(|p| &**p)
    }

    fn by_key(&self, key: &str) -> Option<&dyn ParameterRef> {
        self.by_key.get(key).and_then(|&i| self.get(i))
    }

    fn by_id(&self, id: ParameterId) -> Option<&dyn ParameterRef> {
        self.by_id.get(&id).and_then(|&i| self.get(i))
    }
}

/// Builder for [`ParameterSet`]. Keys are validated in [`build`](Self::build).
#[derive(Default)]
pub struct ParameterSetBuilder {
    parameters: Vec<Box<dyn ParameterRef>>,
}

impl ParameterSetBuilder {
    /// Append a parameter.
    pub fn with(mut self, parameter: impl ParameterRef + 'static) -> Self {
        self.parameters.push(Box::new(parameter));
        self
    }

    /// Append an already boxed parameter.
    pub fn with_boxed(mut self, parameter: Box<dyn ParameterRef>) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn build(self) -> Result<ParameterSet, ParameterSetError> {
        let mut by_key = HashMap::with_capacity(self.parameters.len());
        let mut by_id: HashMap<ParameterId, usize> = HashMap::with_capacity(self.parameters.len());

        for (index, p) in self.parameters.iter().enumerate() {
            let key = p.key();
            if key.is_empty() {
                return Err(ParameterSetError::EmptyKey);
            }
            if by_key.insert(key, index).is_some() {
                return Err(ParameterSetError::DuplicateKey(key));
            }
            if let Some(&other) = by_id.get(&p.id()) {
                return Err(ParameterSetError::IdCollision {
                    first: self.parameters[other].key(),
                    second: key,
                });
            }
            by_id.insert(p.id(), index);
        }

        log::debug!("built parameter set with {} parameters", self.parameters.len());

        Ok(ParameterSet {
            parameters: self.parameters,
            by_key,
            by_id,
        })
    }
}

/// One parameter's entry in the web init dump.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSnapshot {
    pub key: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub units: &'static str,
    pub kind: &'static str,
    pub value: ParameterValue,
    pub default_value: ParameterValue,
    pub display: String,
    pub step_count: i32,
    #[serde(skip_serializing_if = "no_choices")]
    pub choices: &'static [&'static str],
}

impl ParameterSnapshot {
    pub fn of(parameter: &dyn ParameterRef) -> Self {
        let info = parameter.info();
        Self {
            key: info.key,
            name: info.name,
            short_name: info.short_name,
            units: info.units,
            kind: info.kind.as_str(),
            value: parameter.get_normalized(),
            default_value: info.default_normalized,
            display: parameter.display(),
            step_count: info.step_count,
            choices: parameter.choices(),
        }
    }
}

fn no_choices(choices: &&'static [&'static str]) -> bool {
    choices.is_empty()
}

/// Serialize every parameter of `store` as a JSON array for the web init dump.
pub fn params_to_init_json(store: &dyn ParameterStore) -> String {
    let snapshots: Vec<ParameterSnapshot> = store.iter().map(ParameterSnapshot::of).collect();
    serde_json::to_string(&snapshots).unwrap_or_else(|e| {
        log::error!("failed to serialize parameter snapshot: {e}");
        "[]".to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter_types::{BoolParameter, ChoiceParameter, FloatParameter};
    use crate::types::parameter_id;

    static MODES: &[&str] = &["A", "B"];

    fn set() -> ParameterSet {
        ParameterSet::builder()
            .with(FloatParameter::db("gain", "Gain", 0.0, -60.0..=12.0))
            .with(FloatParameter::percent("mix", "Mix", 100.0))
            .with(BoolParameter::bypass("bypass"))
            .with(ChoiceParameter::new("mode", "Mode", MODES, 0))
            .build()
            .unwrap()
    }

    #[test]
    fn lookup_by_key_and_id() {
        let params = set();
        assert_eq!(params.count(), 4);
        assert_eq!(params.by_key("mix").unwrap().info().name, "Mix");
        assert_eq!(params.by_id(parameter_id("bypass")).unwrap().key(), "bypass");
        assert!(params.by_key("Gain").is_none());
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = ParameterSet::builder()
            .with(FloatParameter::percent("mix", "Mix", 0.0))
            .with(FloatParameter::percent("mix", "Mix 2", 0.0))
            .build()
            .unwrap_err();
        assert_eq!(err, ParameterSetError::DuplicateKey("mix"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = ParameterSet::builder()
            .with(BoolParameter::new("", "Nothing", false))
            .build()
            .unwrap_err();
        assert_eq!(err, ParameterSetError::EmptyKey);
    }

    #[test]
    fn set_normalized_through_store() {
        let params = set();
        assert!(params.set_normalized(parameter_id("mix"), 0.25));
        assert_eq!(params.get_normalized(parameter_id("mix")), Some(0.25));
        assert!(!params.set_normalized(12345, 0.25));
    }

    #[test]
    fn reset_restores_defaults() {
        let params = set();
        params.by_key("gain").unwrap().set_normalized(0.0);
        params.reset_to_defaults();
        let gain = params.by_key("gain").unwrap();
        assert_eq!(gain.get_normalized(), gain.info().default_normalized);
    }

    #[test]
    fn init_json_lists_every_parameter() {
        let params = set();
        let json: serde_json::Value = serde_json::from_str(&params_to_init_json(&params)).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["key"], "gain");
        assert_eq!(entries[0]["units"], "dB");
        assert_eq!(entries[2]["kind"], "bool");
        assert_eq!(entries[3]["choices"], serde_json::json!(["A", "B"]));
        assert!(entries[0].get("choices").is_none());
    }
}
