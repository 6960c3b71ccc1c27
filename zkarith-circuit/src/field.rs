//! Prime Field Values

use core::fmt::Debug;
use num_bigint::{BigInt, BigUint, Sign};

/// Prime Field Element
///
/// This is the arithmetic interface the evaluator and emitters rely on. Implementations own the
/// modular reduction: every method returns a canonical element of the field.
pub trait Field: Clone + Debug + PartialEq {
    /// Returns the additive identity.
    fn zero() -> Self;

    /// Returns the multiplicative identity.
    fn one() -> Self;

    /// Returns `true` if `self` is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns `self + rhs`.
    fn add(&self, rhs: &Self) -> Self;

    /// Returns `self * rhs`.
    fn mul(&self, rhs: &Self) -> Self;

    /// Returns the additive inverse of `self`.
    fn neg(&self) -> Self;

    /// Returns the multiplicative inverse of `self` or `None` if `self` is zero.
    fn inverse(&self) -> Option<Self>;

    /// Reduces `value` into the field.
    fn from_biguint(value: &BigUint) -> Self;

    /// Returns the canonical integer representative of `self` in `[0, p)`.
    fn to_biguint(&self) -> BigUint;

    /// Folds the signed `constant` into the field, mapping negative values to additive inverses.
    #[inline]
    fn from_constant(constant: &BigInt) -> Self
    where
        Self: Sized,
    {
        let value = Self::from_biguint(constant.magnitude());
        match constant.sign() {
            Sign::Minus => value.neg(),
            _ => value,
        }
    }

    /// Parses a hexadecimal literal with an optional `0x` prefix, reducing it into the field.
    #[inline]
    fn from_hex(literal: &str) -> Option<Self>
    where
        Self: Sized,
    {
        parse_hex(literal).map(|value| Self::from_biguint(&value))
    }

    /// Formats `self` as a `0x`-prefixed lowercase hexadecimal literal.
    #[inline]
    fn to_hex(&self) -> String {
        format!("{:#x}", self.to_biguint())
    }
}

/// Parses an unsigned hexadecimal literal with an optional `0x` or `0X` prefix.
#[inline]
pub fn parse_hex(literal: &str) -> Option<BigUint> {
    let digits = literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
        .unwrap_or(literal);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
}
