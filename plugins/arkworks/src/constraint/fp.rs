//! Field Element Wrapper

use crate::ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use zkarith_circuit::Field;

/// Field Element
#[derive(derivative::Derivative)]
#[derivative(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fp<F>(
    /// Field Element
    pub F,
)
where
    F: PrimeField;

impl<F> Fp<F>
where
    F: PrimeField,
{
    /// Returns the underlying field element.
    #[inline]
    pub fn into_inner(self) -> F {
        self.0
    }
}

impl<F> From<u64> for Fp<F>
where
    F: PrimeField,
{
    #[inline]
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl<F> Field for Fp<F>
where
    F: PrimeField,
{
    #[inline]
    fn zero() -> Self {
        Self(F::zero())
    }

    #[inline]
    fn one() -> Self {
        Self(F::one())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    fn add(&self, rhs: &Self) -> Self {
        Self(self.0 + rhs.0)
    }

    #[inline]
    fn mul(&self, rhs: &Self) -> Self {
        Self(self.0 * rhs.0)
    }

    #[inline]
    fn neg(&self) -> Self {
        Self(-self.0)
    }

    #[inline]
    fn inverse(&self) -> Option<Self> {
        crate::ff::Field::inverse(&self.0).map(Self)
    }

    #[inline]
    fn from_biguint(value: &BigUint) -> Self {
        Self(F::from_le_bytes_mod_order(&value.to_bytes_le()))
    }

    #[inline]
    fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0.into_bigint().to_bytes_le())
    }
}
