// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional key encoding.
//!
//! A node's place in the global draw order is described by a *chain*: one
//! small digit per nesting level, most significant (closest to the scene)
//! first. [`encode`] reads the chain as a big-endian base-`radix` numeral,
//! right-padded with zero digits to a fixed number of places, so comparing
//! the encoded integers compares chains lexicographically and a chain always
//! sorts below its own extensions.
//!
//! [`DrawKey`] stores the encoded position at scale 2. The lowest bit is
//! reserved for the `:above` / `:below` half-steps, so a modified key never
//! equals any structural key.

use core::fmt;

use crate::spec::Modifier;

/// Fixed-point scale of [`DrawKey`] relative to structural positions.
pub const SCALE: u128 = 2;

/// Number of digits used by keys of a tree whose deepest view is at `depth`.
///
/// Each nesting level contributes a sibling digit and a slot digit on top of
/// the scene's single slot digit.
#[inline]
#[must_use]
pub const fn digits_for_depth(depth: u32) -> u32 {
    2 * depth + 1
}

/// Returns the exclusive upper bound of raw [`DrawKey`] values for `digits`
/// places in base `radix`, or `None` if it does not fit in `u128`.
#[must_use]
pub fn key_space(radix: u32, digits: u32) -> Option<u128> {
    u128::from(radix).checked_pow(digits)?.checked_mul(SCALE)
}

/// Encodes `chain` as a base-`radix` numeral padded to `digits` places.
///
/// Digits are not range checked: a digit `>= radix` bleeds into the next
/// place value. Callers keep every digit below `radix` and keep
/// `chain.len() <= digits`.
#[must_use]
pub fn encode(chain: &[u32], digits: u32, radix: u32) -> u128 {
    debug_assert!(
        chain.len() <= digits as usize,
        "chain of {} digits exceeds {digits} places",
        chain.len()
    );
    let radix = u128::from(radix);
    let value = chain
        .iter()
        .fold(0_u128, |acc, &digit| acc * radix + u128::from(digit));
    #[expect(
        clippy::cast_possible_truncation,
        reason = "chain length is bounded by `digits`, a u32"
    )]
    let padding = digits - chain.len() as u32;
    value * radix.pow(padding)
}

/// A comparable draw-order key.
///
/// Surfaces are composited from the lowest key to the highest. Keys from
/// different recompute passes are not comparable with each other.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrawKey(u128);

impl DrawKey {
    /// The lowest key, used when nothing is registered.
    pub const ZERO: Self = Self(0);

    /// Builds a key from an encoded structural position.
    #[inline]
    #[must_use]
    pub const fn from_position(position: u128) -> Self {
        Self(position * SCALE)
    }

    /// Builds a key from its raw fixed-point value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Returns the raw fixed-point value (position times [`SCALE`], plus or
    /// minus one for modifiers).
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Returns the structural position, rounding half-steps down.
    #[inline]
    #[must_use]
    pub const fn position(self) -> u128 {
        self.0 / SCALE
    }

    /// Returns whether the key sits between two structural positions.
    #[inline]
    #[must_use]
    pub const fn is_half_step(self) -> bool {
        self.0 % SCALE != 0
    }

    /// Applies a `:above` / `:below` modifier.
    #[must_use]
    pub const fn with_modifier(self, modifier: Modifier) -> Self {
        match modifier {
            Modifier::None => self,
            Modifier::Above => Self(self.0.saturating_add(1)),
            Modifier::Below => Self(self.0.saturating_sub(1)),
        }
    }

    /// Returns the key as a floating point position (lossy for large trees).
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }
}

impl fmt::Debug for DrawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawKey({self})")
    }
}

impl fmt::Display for DrawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_half_step() {
            write!(f, "{}.5", self.position())
        } else {
            write!(f, "{}", self.position())
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use super::*;

    #[test]
    fn encode_pads_to_digits() {
        assert_eq!(encode(&[1], 3, 10), 100);
        assert_eq!(encode(&[1, 2], 3, 10), 120);
        assert_eq!(encode(&[1, 2, 3], 3, 10), 123);
        assert_eq!(encode(&[], 3, 10), 0);
    }

    #[test]
    fn encode_uses_radix() {
        assert_eq!(encode(&[3, 1], 2, 40), 121);
        assert_eq!(encode(&[1], 2, 40), 40);
    }

    #[test]
    fn encode_is_lexicographic() {
        let chains: [&[u32]; 6] = [&[1], &[1, 1], &[1, 1, 39], &[1, 2], &[2], &[2, 0, 1]];
        for pair in chains.windows(2) {
            assert!(
                encode(pair[0], 3, 40) < encode(pair[1], 3, 40),
                "{:?} should sort below {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn oversized_digit_bleeds_into_next_place() {
        // Documented limitation: a digit equal to the radix equals a carry.
        assert_eq!(encode(&[0, 10], 2, 10), encode(&[1, 0], 2, 10));
    }

    #[test]
    fn key_space_detects_overflow() {
        assert_eq!(key_space(10, 2), Some(200));
        assert!(key_space(40, 23).is_some());
        assert!(key_space(40, 25).is_none());
    }

    #[test]
    fn modifiers_stay_between_positions() {
        let a = DrawKey::from_position(5);
        let b = DrawKey::from_position(6);
        assert!(a.with_modifier(Modifier::Below) < a);
        assert!(a < a.with_modifier(Modifier::Above));
        assert!(a.with_modifier(Modifier::Above) < b.with_modifier(Modifier::Below));
        assert!(a.with_modifier(Modifier::Above).is_half_step());
        assert_eq!(a.with_modifier(Modifier::None), a);
    }

    #[test]
    fn below_zero_saturates() {
        assert_eq!(DrawKey::ZERO.with_modifier(Modifier::Below), DrawKey::ZERO);
    }

    #[test]
    fn display_shows_half_steps() {
        let k = DrawKey::from_position(12);
        assert_eq!(format!("{k}"), "12");
        assert_eq!(format!("{}", k.with_modifier(Modifier::Above)), "12.5");
        assert_eq!(format!("{}", k.with_modifier(Modifier::Below)), "11.5");
        assert_eq!(format!("{k:?}"), "DrawKey(12)");
    }

    #[test]
    fn to_f64_halves_raw() {
        let k = DrawKey::from_position(3).with_modifier(Modifier::Above);
        assert!((k.to_f64() - 3.5).abs() < f64::EPSILON);
    }
}
