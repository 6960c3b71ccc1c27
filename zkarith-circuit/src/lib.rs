//! Arithmetic Circuit Model, Parser, and Lazy Evaluator
//!
//! A circuit is a list of gates over a prime field where every wire is produced by exactly one
//! gate and every gate only reads wires with strictly smaller identifiers. The crate parses the
//! line-oriented circuit format into a [`Circuit`], evaluates wires on demand with the memoizing
//! [`Evaluator`], and lowers the result into rank-1 [`constraint`] shapes and the portable
//! [`intermediate`] format. Concrete fields and proof systems live in plugin crates.

#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![forbid(rustdoc::broken_intra_doc_links)]
#![forbid(missing_docs)]

pub mod backend;
pub mod circuit;
pub mod collapse;
pub mod constraint;
pub mod error;
pub mod field;
pub mod gate;
pub mod intermediate;
pub mod parser;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use {
    backend::{ProofSystem, Satisfied, Size},
    circuit::{Circuit, CircuitBuilder, Producer},
    collapse::{Evaluator, ValueTable},
    constraint::{ConstDivPolicy, ConstraintOptions},
    error::{Error, ParseErrorKind, Result},
    field::Field,
    gate::{Gate, Wire},
    parser::InputAssignment,
};

pub use {num_bigint, rand_core};
