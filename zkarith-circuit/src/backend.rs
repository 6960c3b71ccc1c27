//! Proof System Backends

use crate::{
    circuit::Circuit,
    collapse::ValueTable,
    constraint::{constraints, ConstraintOptions},
    field::Field,
};
use rand_core::{CryptoRng, RngCore};

/// Constraint System Satisfaction
pub trait Satisfied {
    /// Returns `true` if all the constraints in `self` are satisfied.
    fn is_satisfied(&self) -> bool;
}

/// Constraint System Size Measurement
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Size {
    /// Number of Constraints
    pub constraint_count: usize,

    /// Number of Public Variables
    pub public_variable_count: usize,

    /// Number of Secret Variables
    pub secret_variable_count: usize,
}

impl Size {
    /// Measures the constraint system `circuit` lowers to under `options`.
    ///
    /// Declared outputs are public and every other wire is secret.
    #[inline]
    pub fn of<F>(circuit: &Circuit, options: ConstraintOptions) -> Self
    where
        F: Field,
    {
        let public_variable_count = circuit.outputs().len();
        Self {
            constraint_count: constraints::<F>(circuit, options).len(),
            public_variable_count,
            secret_variable_count: circuit.total_wires() - public_variable_count,
        }
    }
}

/// Proof System
///
/// A backend proves that a value table satisfies the constraints of a [`Circuit`] without
/// revealing anything but the values of the declared outputs.
pub trait ProofSystem {
    /// Field the Constraints are Expressed over
    type Field: Field;

    /// Proving Context Type
    type ProvingContext;

    /// Verifying Context Type
    type VerifyingContext;

    /// Verification Input Type
    type Input: Default;

    /// Proof Type
    type Proof;

    /// Error Type
    type Error;

    /// Returns proving and verifying contexts for the constraints of `circuit`.
    fn compile<R>(
        circuit: &Circuit,
        options: ConstraintOptions,
        rng: &mut R,
    ) -> Result<(Self::ProvingContext, Self::VerifyingContext), Self::Error>
    where
        R: CryptoRng + RngCore + ?Sized;

    /// Returns a proof that `table` satisfies the constraints of `circuit` under the proving
    /// `context`.
    fn prove<R>(
        context: &Self::ProvingContext,
        circuit: &Circuit,
        table: &ValueTable<Self::Field>,
        options: ConstraintOptions,
        rng: &mut R,
    ) -> Result<Self::Proof, Self::Error>
    where
        R: CryptoRng + RngCore + ?Sized;

    /// Returns the verification input exposed by `table`, the values of the declared outputs of
    /// `circuit` in ascending wire order.
    fn public_input(
        circuit: &Circuit,
        table: &ValueTable<Self::Field>,
    ) -> Result<Self::Input, Self::Error>;

    /// Verifies that a proof generated from this proof system is valid.
    fn verify(
        context: &Self::VerifyingContext,
        input: &Self::Input,
        proof: &Self::Proof,
    ) -> Result<bool, Self::Error>;
}
