//! Arkworks zkarith Plugin
//!
//! Lowers validated [`Circuit`](zkarith_circuit::Circuit)s into `ark-relations` rank-1
//! constraint systems and proves them with `ark-groth16`.

#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![forbid(rustdoc::broken_intra_doc_links)]
#![forbid(missing_docs)]

#[cfg(feature = "bn254")]
pub use bn254;

#[cfg(feature = "ec")]
pub use ec;

#[cfg(feature = "groth16")]
pub use ark_groth16;

#[cfg(feature = "snark")]
pub use snark;

pub use relations;

pub mod constraint;
pub mod error;
pub mod ff;
pub mod serialize;

#[cfg(feature = "groth16")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "groth16")))]
pub mod groth16;

#[doc(inline)]
pub use {
    constraint::{fp::Fp, R1CS},
    error::{Error, Result},
};
