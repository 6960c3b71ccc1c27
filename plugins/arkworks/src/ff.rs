//! Arkworks Finite Fields

use num_bigint::BigUint;

#[doc(inline)]
pub use ::ff::*;

/// Returns the modulus of `F` as an arbitrary precision integer.
#[inline]
pub fn modulus<F>() -> BigUint
where
    F: PrimeField,
{
    BigUint::from_bytes_le(&F::MODULUS.to_bytes_le())
}
