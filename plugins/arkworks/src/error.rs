//! Plugin Errors

use crate::{relations::r1cs::SynthesisError, serialize::SerializationError};

/// Plugin Result
pub type Result<T = ()> = core::result::Result<T, Error>;

/// Plugin Error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The circuit or its value table is invalid.
    #[error(transparent)]
    Circuit(#[from] zkarith_circuit::Error),

    /// `ark-relations` refused to build the constraint system.
    #[error("constraint synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    /// The wire values do not satisfy the synthesized constraints.
    #[error("constraint `{0}` is not satisfied by the wire values")]
    Unsatisfied(String),

    /// A key or proof could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(#[from] SerializationError),
}
