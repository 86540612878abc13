//! Parameter types with encapsulated atomic storage.
//!
//! Three parameter types cover the three web control families:
//!
//! - [`FloatParameter`] - Continuous value with linear range mapping (sliders)
//! - [`BoolParameter`] - Toggle value (toggle buttons)
//! - [`ChoiceParameter`] - One of a fixed list of names (combo boxes)
//!
//! Values are stored normalized in atomics so the audio thread can read them
//! lock-free while the UI thread writes.
//!
//! # Example
//!
//! ```
//! use webrelay_core::{FloatParameter, ParameterRef};
//!
//! let gain = FloatParameter::db("gain", "Gain", 0.0, -60.0..=12.0);
//! gain.set(-6.0);
//! assert!((gain.get() + 6.0).abs() < 1e-9);
//! assert_eq!(gain.key(), "gain");
//! ```

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use crate::parameter_info::{ParameterFlags, ParameterInfo, ParameterKind};
use crate::types::{ParameterId, ParameterValue};

// =============================================================================
// ParameterRef Trait - Type-erased parameter access
// =============================================================================

/// Trait for type-erased parameter access at runtime.
///
/// All implementations must be thread-safe (`Send + Sync`) for
/// concurrent access from audio, UI, and host threads.
pub trait ParameterRef: Send + Sync {
    /// Full parameter metadata.
    fn info(&self) -> &ParameterInfo;

    /// Stable string key.
    fn key(&self) -> &'static str {
        self.info().key
    }

    /// Numeric id derived from the key.
    fn id(&self) -> ParameterId {
        self.info().id
    }

    /// Value family.
    fn kind(&self) -> ParameterKind {
        self.info().kind
    }

    /// Get the current normalized value (0.0-1.0).
    ///
    /// This is lock-free and safe to call from the audio thread.
    fn get_normalized(&self) -> ParameterValue;

    /// Set the normalized value (0.0-1.0).
    ///
    /// Values are clamped to [0.0, 1.0]. Non-finite values are ignored.
    fn set_normalized(&self, value: ParameterValue);

    /// Convert a normalized value to a plain value.
    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue;

    /// Convert a plain value to a normalized value.
    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue;

    /// Get the current plain value in natural units.
    fn get_plain(&self) -> ParameterValue {
        self.normalized_to_plain(self.get_normalized())
    }

    /// Set the plain value in natural units.
    fn set_plain(&self, value: ParameterValue) {
        self.set_normalized(self.plain_to_normalized(value));
    }

    /// Format a normalized value for display, without units.
    fn display_normalized(&self, normalized: ParameterValue) -> String;

    /// Format the current value for display.
    fn display(&self) -> String {
        self.display_normalized(self.get_normalized())
    }

    /// Parse a display string to a normalized value.
    fn parse(&self, text: &str) -> Option<ParameterValue>;

    /// Choice names for [`ParameterKind::Choice`] parameters, empty otherwise.
    fn choices(&self) -> &'static [&'static str] {
        &[]
    }
}

fn clamp_normalized(value: ParameterValue) -> Option<ParameterValue> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

// =============================================================================
// FloatParameter
// =============================================================================

/// Continuous parameter with linear range mapping.
pub struct FloatParameter {
    info: ParameterInfo,
    /// Normalized value bits.
    value: AtomicU64,
    min: f64,
    max: f64,
    precision: usize,
    step_size: Option<f64>,
}

impl FloatParameter {
    /// Create a float parameter with linear mapping.
    ///
    /// # Arguments
    ///
    /// * `key` - Stable string key shared with the web UI
    /// * `name` - Display name
    /// * `default` - Default value in plain units
    /// * `range` - Valid range in plain units (inclusive)
    pub fn new(
        key: &'static str,
        name: &'static str,
        default: f64,
        range: RangeInclusive<f64>,
    ) -> Self {
        let (min, max) = (*range.start(), *range.end());
        let default_normalized = linear_normalize(default, min, max);

        Self {
            info: ParameterInfo::new(key, name).with_default(default_normalized),
            value: AtomicU64::new(default_normalized.to_bits()),
            min,
            max,
            precision: 2,
            step_size: None,
        }
    }

    /// Create a decibel parameter. Plain values are dB.
    pub fn db(key: &'static str, name: &'static str, default_db: f64, range_db: RangeInclusive<f64>) -> Self {
        Self::new(key, name, default_db, range_db)
            .with_units("dB")
            .with_precision(1)
    }

    /// Create a percentage parameter over `0..=100`.
    pub fn percent(key: &'static str, name: &'static str, default_pct: f64) -> Self {
        Self::new(key, name, default_pct, 0.0..=100.0)
            .with_units("%")
            .with_precision(0)
    }

    /// Set the short name.
    pub fn with_short_name(mut self, short: &'static str) -> Self {
        self.info.short_name = short;
        self
    }

    /// Set the unit label.
    pub fn with_units(mut self, units: &'static str) -> Self {
        self.info.units = units;
        self
    }

    /// Set the number of decimal places used for display.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Snap plain values to multiples of `step_size` from the range minimum.
    ///
    /// # Panics
    ///
    /// Panics if `step_size` is not positive.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        assert!(step_size > 0.0, "step_size must be positive");
        self.step_size = Some(step_size);
        let steps = ((self.max - self.min) / step_size).round() as i32;
        self.info.step_count = steps.max(1);
        self
    }

    /// Mark the parameter read-only.
    pub fn readonly(mut self) -> Self {
        self.info.flags.is_readonly = true;
        self
    }

    /// Exclude the parameter from host automation.
    pub fn non_automatable(mut self) -> Self {
        self.info.flags.can_automate = false;
        self
    }

    /// Plain-unit range.
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Get the current plain value.
    #[inline]
    pub fn get(&self) -> f64 {
        self.get_plain()
    }

    /// Set the plain value, snapping to the step size if one is set.
    #[inline]
    pub fn set(&self, value: f64) {
        self.set_plain(value);
    }

    fn snap(&self, plain: f64) -> f64 {
        match self.step_size {
            Some(step) => {
                let steps = ((plain - self.min) / step).round();
                (self.min + steps * step).clamp(self.min.min(self.max), self.max.max(self.min))
            }
            None => plain,
        }
    }
}

fn linear_normalize(plain: f64, min: f64, max: f64) -> f64 {
    if (max - min).abs() < f64::EPSILON {
        return 0.0;
    }
    ((plain - min) / (max - min)).clamp(0.0, 1.0)
}

impl ParameterRef for FloatParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_normalized(&self) -> ParameterValue {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    fn set_normalized(&self, value: ParameterValue) {
        let Some(value) = clamp_normalized(value) else {
            return;
        };
        let value = match self.step_size {
            Some(_) => linear_normalize(self.snap(self.normalized_to_plain(value)), self.min, self.max),
            None => value,
        };
        self.value.store(value.to_bits(), Ordering::Relaxed);
    }

    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min)
    }

    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        linear_normalize(self.snap(plain), self.min, self.max)
    }

    fn display_normalized(&self, normalized: ParameterValue) -> String {
        format!("{:.*}", self.precision, self.normalized_to_plain(normalized))
    }

    fn parse(&self, text: &str) -> Option<ParameterValue> {
        let trimmed = text.trim();
        let number = trimmed
            .strip_suffix(self.info.units)
            .filter(|_| !self.info.units.is_empty())
            .unwrap_or(trimmed)
            .trim();
        let plain: f64 = number.parse().ok()?;
        Some(self.plain_to_normalized(plain))
    }
}

// =============================================================================
// BoolParameter
// =============================================================================

/// Boolean parameter for toggles and bypass switches.
pub struct BoolParameter {
    info: ParameterInfo,
    value: AtomicBool,
}

impl BoolParameter {
    /// Create a boolean parameter.
    pub fn new(key: &'static str, name: &'static str, default: bool) -> Self {
        Self {
            info: ParameterInfo::new(key, name)
                .with_kind(ParameterKind::Bool)
                .with_steps(1)
                .with_default(if default { 1.0 } else { 0.0 }),
            value: AtomicBool::new(default),
        }
    }

    /// Create a bypass switch ("Bypass", default off, flagged as bypass).
    pub fn bypass(key: &'static str) -> Self {
        let mut param = Self::new(key, "Bypass", false);
        param.info.short_name = "Byp";
        param.info.flags = ParameterFlags {
            is_bypass: true,
            ..ParameterFlags::default()
        };
        param
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Relaxed);
    }
}

impl ParameterRef for BoolParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_normalized(&self) -> ParameterValue {
        if self.get() { 1.0 } else { 0.0 }
    }

    fn set_normalized(&self, value: ParameterValue) {
        if let Some(value) = clamp_normalized(value) {
            self.set(value >= 0.5);
        }
    }

    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        if normalized >= 0.5 { 1.0 } else { 0.0 }
    }

    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        if plain >= 0.5 { 1.0 } else { 0.0 }
    }

    fn display_normalized(&self, normalized: ParameterValue) -> String {
        let text = if normalized >= 0.5 { "On" } else { "Off" };
        text.to_string()
    }

    fn parse(&self, text: &str) -> Option<ParameterValue> {
        match text.trim().to_ascii_lowercase().as_str() {
            "on" | "true" | "1" | "yes" => Some(1.0),
            "off" | "false" | "0" | "no" => Some(0.0),
            _ => None,
        }
    }
}

// =============================================================================
// ChoiceParameter
// =============================================================================

/// Parameter selecting one of a fixed list of named choices.
///
/// Plain values are choice indices.
pub struct ChoiceParameter {
    info: ParameterInfo,
    index: AtomicUsize,
    choices: &'static [&'static str],
}

impl ChoiceParameter {
    /// Create a choice parameter.
    ///
    /// # Panics
    ///
    /// Panics if `choices` is empty or `default_index` is out of range.
    pub fn new(
        key: &'static str,
        name: &'static str,
        choices: &'static [&'static str],
        default_index: usize,
    ) -> Self {
        assert!(!choices.is_empty(), "choice parameter needs at least one choice");
        assert!(default_index < choices.len(), "default_index out of range");

        Self {
            info: ParameterInfo::new(key, name)
                .with_kind(ParameterKind::Choice)
                .with_steps((choices.len() - 1) as i32)
                .with_default(index_to_normalized(default_index, choices.len())),
            index: AtomicUsize::new(default_index),
            choices,
        }
    }

    /// Currently selected index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    /// Select by index. Out-of-range indices clamp to the last choice.
    #[inline]
    pub fn set_index(&self, index: usize) {
        self.index.store(index.min(self.choices.len() - 1), Ordering::Relaxed);
    }

    /// Name of the selected choice.
    pub fn selected(&self) -> &'static str {
        self.choices[self.index()]
    }
}

/// Map a choice index to its normalized value.
pub fn index_to_normalized(index: usize, count: usize) -> ParameterValue {
    if count <= 1 {
        return 0.0;
    }
    index.min(count - 1) as f64 / (count - 1) as f64
}

/// Map a normalized value to the nearest choice index.
pub fn normalized_to_index(normalized: ParameterValue, count: usize) -> usize {
    if count <= 1 {
        return 0;
    }
    (normalized.clamp(0.0, 1.0) * (count - 1) as f64).round() as usize
}

impl ParameterRef for ChoiceParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_normalized(&self) -> ParameterValue {
        index_to_normalized(self.index(), self.choices.len())
    }

    fn set_normalized(&self, value: ParameterValue) {
        if let Some(value) = clamp_normalized(value) {
            self.set_index(normalized_to_index(value, self.choices.len()));
        }
    }

    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        normalized_to_index(normalized, self.choices.len()) as f64
    }

    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        let index = plain.round().max(0.0) as usize;
        index_to_normalized(index, self.choices.len())
    }

    fn display_normalized(&self, normalized: ParameterValue) -> String {
        self.choices[normalized_to_index(normalized, self.choices.len())].to_string()
    }

    fn parse(&self, text: &str) -> Option<ParameterValue> {
        let text = text.trim();
        self.choices
            .iter()
            .position(|c| c.eq_ignore_ascii_case(text))
            .map(|i| index_to_normalized(i, self.choices.len()))
    }

    fn choices(&self) -> &'static [&'static str] {
        self.choices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_linear_mapping() {
        let p = FloatParameter::new("mix", "Mix", 50.0, 0.0..=100.0);
        assert!((p.get_normalized() - 0.5).abs() < 1e-12);
        p.set(25.0);
        assert!((p.get_normalized() - 0.25).abs() < 1e-12);
        assert!((p.get() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn float_set_normalized_clamps() {
        let p = FloatParameter::new("mix", "Mix", 0.0, 0.0..=1.0);
        p.set_normalized(1.7);
        assert_eq!(p.get_normalized(), 1.0);
        p.set_normalized(-3.0);
        assert_eq!(p.get_normalized(), 0.0);
        p.set_normalized(f64::NAN);
        assert_eq!(p.get_normalized(), 0.0);
    }

    #[test]
    fn float_step_snapping() {
        let p = FloatParameter::new("t", "T", 0.0, 0.0..=10.0).with_step_size(0.5);
        p.set(2.3);
        assert!((p.get() - 2.5).abs() < 1e-10);
        p.set(2.2);
        assert!((p.get() - 2.0).abs() < 1e-10);
        assert_eq!(p.info().step_count, 20);
    }

    #[test]
    #[should_panic(expected = "step_size must be positive")]
    fn float_zero_step_panics() {
        FloatParameter::new("t", "T", 0.0, 0.0..=10.0).with_step_size(0.0);
    }

    #[test]
    fn float_display_and_parse() {
        let p = FloatParameter::db("gain", "Gain", 0.0, -60.0..=12.0);
        assert_eq!(p.display(), "0.0");
        let n = p.parse("-12 dB").unwrap();
        assert!((p.normalized_to_plain(n) + 12.0).abs() < 1e-9);
        assert!(p.parse("loud").is_none());
    }

    #[test]
    fn bool_thresholds_at_half() {
        let p = BoolParameter::new("bypass", "Bypass", false);
        p.set_normalized(0.49);
        assert!(!p.get());
        p.set_normalized(0.5);
        assert!(p.get());
        assert_eq!(p.display(), "On");
        assert_eq!(p.parse("off"), Some(0.0));
    }

    #[test]
    fn bypass_is_flagged() {
        let p = BoolParameter::bypass("bypass");
        assert!(p.info().flags.is_bypass);
        assert_eq!(p.info().kind, ParameterKind::Bool);
        assert_eq!(p.info().short_name, "Byp");
    }

    #[test]
    fn choice_index_mapping() {
        static MODES: &[&str] = &["Clean", "Warm", "Crunch"];
        let p = ChoiceParameter::new("mode", "Mode", MODES, 1);
        assert_eq!(p.get_normalized(), 0.5);
        assert_eq!(p.selected(), "Warm");
        p.set_normalized(0.9);
        assert_eq!(p.index(), 2);
        assert_eq!(p.get_plain(), 2.0);
        p.set_plain(0.0);
        assert_eq!(p.selected(), "Clean");
        assert_eq!(p.parse("crunch"), Some(1.0));
        assert_eq!(p.choices().len(), 3);
    }

    #[test]
    fn single_choice_is_zero() {
        static ONE: &[&str] = &["Only"];
        let p = ChoiceParameter::new("one", "One", ONE, 0);
        assert_eq!(p.get_normalized(), 0.0);
        p.set_normalized(1.0);
        assert_eq!(p.index(), 0);
    }
}
