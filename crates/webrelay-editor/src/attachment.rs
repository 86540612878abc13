//! Pairing relays with parameters.

use serde_json::Value;
use webrelay_core::{index_to_normalized, ParameterId, ParameterRef, ParameterValue};

use crate::error::RelayError;
use crate::relay::{Relay, RelayKind};

/// A relay bound to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Attachment {
    pub id: ParameterId,
    pub kind: RelayKind,
}

impl Attachment {
    /// Check that `relay` can drive `parameter`.
    pub fn bind(relay: &Relay, parameter: &dyn ParameterRef) -> Result<Self, RelayError> {
        let expected = relay.kind().parameter_kind();
        if parameter.kind() != expected {
            return Err(RelayError::KindMismatch {
                key: relay.key().to_string(),
                relay: relay.kind(),
                parameter: parameter.kind(),
            });
        }
        Ok(Self {
            id: parameter.id(),
            kind: relay.kind(),
        })
    }

    /// Convert a `param:set` value from the page to a normalized value.
    ///
    /// Returns `None` if the value has the wrong shape for the control.
    pub fn web_to_normalized(&self, parameter: &dyn ParameterRef, value: &Value) -> Option<ParameterValue> {
        match self.kind {
            RelayKind::Slider => value.as_f64().map(|v| v.clamp(0.0, 1.0)),
            RelayKind::Toggle => match value {
                Value::Bool(on) => Some(if *on { 1.0 } else { 0.0 }),
                Value::Number(n) => n.as_f64().map(|v| if v >= 0.5 { 1.0 } else { 0.0 }),
                _ => None,
            },
            RelayKind::ComboBox => {
                let count = parameter.choices().len();
                let index = usize::try_from(value.as_u64()?).ok()?;
                (index < count).then(|| index_to_normalized(index, count))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::RelaySet;
    use serde_json::json;
    use webrelay_core::{BoolParameter, ChoiceParameter, FloatParameter, ParameterKind};

    static MODES: &[&str] = &["Clean", "Warm", "Crush"];

    fn relay(set: RelaySet) -> Relay {
        set.into_vec().remove(0)
    }

    #[test]
    fn kinds_must_match() {
        let gain = FloatParameter::new("gain", "Gain", 0.5, 0.0..=1.0);
        let toggle = relay(RelaySet::new().toggle("gain").unwrap());
        let err = Attachment::bind(&toggle, &gain).unwrap_err();
        assert!(matches!(
            err,
            RelayError::KindMismatch {
                relay: RelayKind::Toggle,
                parameter: ParameterKind::Float,
                ..
            }
        ));

        let slider = relay(RelaySet::new().slider("gain").unwrap());
        assert!(Attachment::bind(&slider, &gain).is_ok());
    }

    #[test]
    fn converts_web_values() {
        let gain = FloatParameter::new("gain", "Gain", 0.5, 0.0..=1.0);
        let slider = Attachment::bind(&relay(RelaySet::new().slider("gain").unwrap()), &gain).unwrap();
        assert_eq!(slider.web_to_normalized(&gain, &json!(0.3)), Some(0.3));
        assert_eq!(slider.web_to_normalized(&gain, &json!(4.0)), Some(1.0));
        assert_eq!(slider.web_to_normalized(&gain, &json!("loud")), None);

        let bypass = BoolParameter::bypass("bypass");
        let toggle = Attachment::bind(&relay(RelaySet::new().toggle("bypass").unwrap()), &bypass).unwrap();
        assert_eq!(toggle.web_to_normalized(&bypass, &json!(true)), Some(1.0));
        assert_eq!(toggle.web_to_normalized(&bypass, &json!(0)), Some(0.0));

        let mode = ChoiceParameter::new("mode", "Mode", MODES, 0);
        let combo = Attachment::bind(&relay(RelaySet::new().combo_box("mode").unwrap()), &mode).unwrap();
        assert_eq!(combo.web_to_normalized(&mode, &json!(2)), Some(1.0));
        assert_eq!(combo.web_to_normalized(&mode, &json!(1)), Some(0.5));
        assert_eq!(combo.web_to_normalized(&mode, &json!(3)), None);
        assert_eq!(combo.web_to_normalized(&mode, &json!(-1)), None);
    }
}
