//! Groth16 Proof System

use crate::{
    constraint::{self, fp::Fp, R1CS},
    ec::pairing::Pairing,
    error::{Error, Result},
    serialize,
    snark::{CircuitSpecificSetupSNARK, SNARK},
};
use ark_groth16::{Groth16 as ArkGroth16, PreparedVerifyingKey, ProvingKey, VerifyingKey};
use core::marker::PhantomData;
use rand_core::{CryptoRng, RngCore};
use tracing::debug;
use zkarith_circuit::{Circuit, ConstraintOptions, ProofSystem, ValueTable};

/// Groth16 Proof
#[derive(derivative::Derivative)]
#[derivative(Clone, Debug, Default, Eq, PartialEq)]
pub struct Proof<E>(
    /// Groth16 Proof
    pub ark_groth16::Proof<E>,
)
where
    E: Pairing;

impl<E> Proof<E>
where
    E: Pairing,
{
    /// Returns the compressed canonical encoding of `self`.
    #[inline]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serialize::to_bytes(&self.0)?)
    }

    /// Decodes a proof written by [`to_bytes`](Self::to_bytes).
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self(serialize::from_bytes(bytes)?))
    }
}

/// Proving Context
#[derive(derivative::Derivative)]
#[derivative(Clone, Debug, Eq, PartialEq)]
pub struct ProvingContext<E>(pub ProvingKey<E>)
where
    E: Pairing;

impl<E> ProvingContext<E>
where
    E: Pairing,
{
    /// Builds a new [`ProvingContext`] from `proving_key`.
    #[inline]
    pub fn new(proving_key: ProvingKey<E>) -> Self {
        Self(proving_key)
    }

    /// Returns the compressed canonical encoding of `self`.
    #[inline]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serialize::to_bytes(&self.0)?)
    }

    /// Decodes a proving key written by [`to_bytes`](Self::to_bytes).
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self(serialize::from_bytes(bytes)?))
    }
}

/// Verifying Context
///
/// Only the verifying key is encoded. The pairing precomputation is redone when decoding.
#[derive(derivative::Derivative)]
#[derivative(Clone, Debug)]
pub struct VerifyingContext<E>(pub PreparedVerifyingKey<E>)
where
    E: Pairing;

impl<E> VerifyingContext<E>
where
    E: Pairing,
{
    /// Builds a new [`VerifyingContext`] by preparing `verifying_key`.
    #[inline]
    pub fn new(verifying_key: &VerifyingKey<E>) -> Self {
        Self(ark_groth16::prepare_verifying_key(verifying_key))
    }

    /// Returns the verifying key of `self`.
    #[inline]
    pub fn verifying_key(&self) -> &VerifyingKey<E> {
        &self.0.vk
    }

    /// Returns the compressed canonical encoding of the verifying key.
    #[inline]
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serialize::to_bytes(&self.0.vk)?)
    }

    /// Decodes a verifying key written by [`to_bytes`](Self::to_bytes).
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(&serialize::from_bytes(bytes)?))
    }
}

/// Arkworks Groth16 Proof System
#[derive(derivative::Derivative)]
#[derivative(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Groth16<E>(PhantomData<E>)
where
    E: Pairing;

impl<E> ProofSystem for Groth16<E>
where
    E: Pairing,
{
    type Field = Fp<E::ScalarField>;
    type ProvingContext = ProvingContext<E>;
    type VerifyingContext = VerifyingContext<E>;
    type Input = Vec<E::ScalarField>;
    type Proof = Proof<E>;
    type Error = Error;

    #[inline]
    fn compile<R>(
        circuit: &Circuit,
        options: ConstraintOptions,
        rng: &mut R,
    ) -> Result<(Self::ProvingContext, Self::VerifyingContext)>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let compiler = R1CS::synthesize(circuit, None, options)?;
        let (proving_key, verifying_key) =
            ArkGroth16::<E>::circuit_specific_setup(compiler, &mut &mut *rng)?;
        debug!(
            public_inputs = verifying_key.gamma_abc_g1.len().saturating_sub(1),
            "generated groth16 keys"
        );
        Ok((
            ProvingContext(proving_key),
            VerifyingContext::new(&verifying_key),
        ))
    }

    #[inline]
    fn prove<R>(
        context: &Self::ProvingContext,
        circuit: &Circuit,
        table: &ValueTable<Self::Field>,
        options: ConstraintOptions,
        rng: &mut R,
    ) -> Result<Self::Proof>
    where
        R: CryptoRng + RngCore + ?Sized,
    {
        let compiler = R1CS::synthesize(circuit, Some(table), options)?;
        compiler.check_satisfied()?;
        Ok(Proof(ArkGroth16::<E>::prove(
            &context.0,
            compiler,
            &mut &mut *rng,
        )?))
    }

    #[inline]
    fn public_input(circuit: &Circuit, table: &ValueTable<Self::Field>) -> Result<Self::Input> {
        constraint::public_input(circuit, table)
    }

    #[inline]
    fn verify(
        context: &Self::VerifyingContext,
        input: &Self::Input,
        proof: &Self::Proof,
    ) -> Result<bool> {
        Ok(ArkGroth16::<E>::verify_with_processed_vk(
            &context.0, input, &proof.0,
        )?)
    }
}
