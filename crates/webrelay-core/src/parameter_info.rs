//! Parameter metadata types.
//!
//! - [`ParameterInfo`] - Complete parameter description (key, name, range, flags)
//! - [`ParameterKind`] - Which web control family the parameter maps to
//! - [`ParameterFlags`] - Behavioral flags (automation, bypass, hidden)

use crate::types::{parameter_id, ParameterId, ParameterValue};

/// Value family of a parameter.
///
/// Each kind pairs with exactly one relay kind on the web side: continuous
/// parameters drive sliders, booleans drive toggles and choices drive
/// combo boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Continuous value over a plain-unit range.
    Float,
    /// On/off switch.
    Bool,
    /// One of a fixed list of named choices.
    Choice,
}

impl ParameterKind {
    /// Name used in the web init dump.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::Float => "float",
            ParameterKind::Bool => "bool",
            ParameterKind::Choice => "choice",
        }
    }
}

/// Flags controlling parameter behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterFlags {
    /// Parameter can be automated by the host.
    pub can_automate: bool,
    /// Parameter is read-only (display only).
    pub is_readonly: bool,
    /// Parameter is the bypass switch.
    pub is_bypass: bool,
    /// Parameter is hidden from the host's parameter list.
    pub is_hidden: bool,
}

impl Default for ParameterFlags {
    fn default() -> Self {
        Self {
            can_automate: true,
            is_readonly: false,
            is_bypass: false,
            is_hidden: false,
        }
    }
}

/// Metadata describing a single parameter.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    /// Numeric identifier derived from `key`.
    pub id: ParameterId,
    /// Stable string key. Relays and web accessors use this exact string.
    pub key: &'static str,
    /// Full parameter name (e.g., "Output Gain").
    pub name: &'static str,
    /// Short parameter name for constrained UIs.
    pub short_name: &'static str,
    /// Unit label (e.g., "dB", "%").
    pub units: &'static str,
    /// Value family.
    pub kind: ParameterKind,
    /// Default value in normalized form (0.0 to 1.0).
    pub default_normalized: ParameterValue,
    /// Number of discrete steps. 0 = continuous, 1 = toggle, >1 = discrete.
    pub step_count: i32,
    /// Behavioral flags.
    pub flags: ParameterFlags,
}

impl ParameterInfo {
    /// Create a continuous parameter description with default flags.
    pub const fn new(key: &'static str, name: &'static str) -> Self {
        Self {
            id: parameter_id(key),
            key,
            name,
            short_name: name,
            units: "",
            kind: ParameterKind::Float,
            default_normalized: 0.5,
            step_count: 0,
            flags: ParameterFlags {
                can_automate: true,
                is_readonly: false,
                is_bypass: false,
                is_hidden: false,
            },
        }
    }

    /// Set the short name.
    pub const fn with_short_name(mut self, short_name: &'static str) -> Self {
        self.short_name = short_name;
        self
    }

    /// Set the unit label.
    pub const fn with_units(mut self, units: &'static str) -> Self {
        self.units = units;
        self
    }

    /// Set the value family.
    pub const fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the default normalized value.
    pub const fn with_default(mut self, default: ParameterValue) -> Self {
        self.default_normalized = default;
        self
    }

    /// Set the step count (0 = continuous).
    pub const fn with_steps(mut self, steps: i32) -> Self {
        self.step_count = steps;
        self
    }

    /// Set parameter flags.
    pub const fn with_flags(mut self, flags: ParameterFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_follows_key() {
        let info = ParameterInfo::new("mix", "Mix");
        assert_eq!(info.id, parameter_id("mix"));
        assert_eq!(info.kind, ParameterKind::Float);
        assert_eq!(info.short_name, "Mix");
    }

    #[test]
    fn builder_sets_fields() {
        let info = ParameterInfo::new("mode", "Mode")
            .with_kind(ParameterKind::Choice)
            .with_steps(2)
            .with_default(0.0)
            .with_short_name("Md");
        assert_eq!(info.kind.as_str(), "choice");
        assert_eq!(info.step_count, 2);
        assert_eq!(info.default_normalized, 0.0);
        assert_eq!(info.short_name, "Md");
    }
}
