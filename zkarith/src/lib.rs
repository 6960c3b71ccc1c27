//! zkarith

#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![forbid(rustdoc::broken_intra_doc_links)]
#![forbid(missing_docs)]

#[doc(inline)]
pub use zkarith_circuit as circuit;

#[cfg(feature = "arkworks")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "arkworks")))]
#[doc(inline)]
pub use zkarith_plugin_arkworks as arkworks;

#[doc(inline)]
pub use zkarith_circuit::{Circuit, ConstraintOptions, Error, Evaluator, Field, Gate, Wire};
