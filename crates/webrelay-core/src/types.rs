//! Shared primitive types.

/// Numeric parameter identifier, derived from the parameter's string key.
pub type ParameterId = u32;

/// Parameter value. Normalized values are in `0.0..=1.0`.
pub type ParameterValue = f64;

/// Width and height of an editor view in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle at the origin covering `size`.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }
}

const FNV_OFFSET_32: u32 = 0x811c_9dc5;
const FNV_PRIME_32: u32 = 0x0100_0193;

/// FNV-1a 32-bit hash, usable in const context.
pub const fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_32;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME_32);
        i += 1;
    }
    hash
}

/// Derive the numeric id for a parameter key.
///
/// The top bit is cleared because VST3 reserves negative parameter ids.
pub const fn parameter_id(key: &str) -> ParameterId {
    fnv1a_32(key.as_bytes()) & 0x7fff_ffff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv1a_known_vectors() {
        assert_eq!(fnv1a_32(b""), 0x811c_9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn parameter_id_is_stable_and_positive() {
        const GAIN: ParameterId = parameter_id("gain");
        assert_eq!(GAIN, parameter_id("gain"));
        assert_ne!(parameter_id("gain"), parameter_id("mix"));
        assert_eq!(GAIN & 0x8000_0000, 0);
    }
}
