//! Testing Framework

use crate::field::Field;
use core::cell::Cell;
use num_bigint::BigUint;

/// Mersenne Prime Field with `p = 2^31 - 1`
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Mersenne31(u64);

impl Mersenne31 {
    /// Field Modulus
    pub const MODULUS: u64 = (1 << 31) - 1;

    /// Builds a new field element by reducing `value`.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value % Self::MODULUS)
    }

    /// Raises `self` to the `exponent` power.
    #[inline]
    pub fn pow(&self, mut exponent: u64) -> Self {
        let mut base = *self;
        let mut result = Self(1);
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = Self((result.0 * base.0) % Self::MODULUS);
            }
            base = Self((base.0 * base.0) % Self::MODULUS);
            exponent >>= 1;
        }
        result
    }
}

impl Field for Mersenne31 {
    #[inline]
    fn zero() -> Self {
        Self(0)
    }

    #[inline]
    fn one() -> Self {
        Self(1)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    fn add(&self, rhs: &Self) -> Self {
        Self::new(self.0 + rhs.0)
    }

    #[inline]
    fn mul(&self, rhs: &Self) -> Self {
        Self::new(self.0 * rhs.0)
    }

    #[inline]
    fn neg(&self) -> Self {
        Self::new(Self::MODULUS - self.0)
    }

    #[inline]
    fn inverse(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self.pow(Self::MODULUS - 2))
        }
    }

    #[inline]
    fn from_biguint(value: &BigUint) -> Self {
        let reduced = value % Self::MODULUS;
        Self(reduced.iter_u64_digits().next().unwrap_or(0))
    }

    #[inline]
    fn to_biguint(&self) -> BigUint {
        BigUint::from(self.0)
    }
}

/// Arithmetic Operation Counts
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Counts {
    /// Additions
    pub add: usize,

    /// Multiplications
    pub mul: usize,

    /// Inversions
    pub inverse: usize,
}

thread_local! {
    static COUNTS: Cell<Counts> = Cell::new(Counts::default());
}

/// Records one operation on the current thread's counters.
#[inline]
fn record<U>(update: U)
where
    U: FnOnce(&mut Counts),
{
    COUNTS.with(|counts| {
        let mut current = counts.get();
        update(&mut current);
        counts.set(current);
    });
}

/// Instrumented Field
///
/// Wraps a field and counts the additions, multiplications, and inversions performed on the
/// current thread.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Counting<F>(F);

impl<F> Counting<F> {
    /// Returns the underlying field element.
    #[inline]
    pub fn into_inner(self) -> F {
        self.0
    }

    /// Resets the counters of the current thread.
    #[inline]
    pub fn reset() {
        COUNTS.with(|counts| counts.set(Counts::default()));
    }

    /// Returns the counters of the current thread.
    #[inline]
    pub fn counts() -> Counts {
        COUNTS.with(Cell::get)
    }
}

impl<F> Field for Counting<F>
where
    F: Field,
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
        record(|counts| counts.add += 1);
        Self(self.0.add(&rhs.0))
    }

    #[inline]
    fn mul(&self, rhs: &Self) -> Self {
        record(|counts| counts.mul += 1);
        Self(self.0.mul(&rhs.0))
    }

    #[inline]
    fn neg(&self) -> Self {
        Self(self.0.neg())
    }

    #[inline]
    fn inverse(&self) -> Option<Self> {
        record(|counts| counts.inverse += 1);
        self.0.inverse().map(Self)
    }

    #[inline]
    fn from_biguint(value: &BigUint) -> Self {
        Self(F::from_biguint(value))
    }

    #[inline]
    fn to_biguint(&self) -> BigUint {
        self.0.to_biguint()
    }
}
