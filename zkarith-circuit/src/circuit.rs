//! Circuit Graph

use crate::{
    error::{Error, ParseErrorKind, Result},
    gate::{Gate, Wire},
};
use core::fmt;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Wire Producer
///
/// Locates the gate that produces a wire and which of its outputs the wire is.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Producer {
    /// Index into [`Circuit::gates`]
    pub gate: usize,

    /// Index into [`Gate::outputs`]
    pub slot: usize,
}

/// Arithmetic Circuit
///
/// A validated circuit graph: every wire in `[0, total_wires)` is produced by exactly one gate and
/// every declared output exists. Circuits are only built through [`CircuitBuilder::finish`] and
/// are immutable afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Circuit {
    /// Total Wire Count
    total_wires: usize,

    /// Gates in Source Order
    gates: Vec<Gate>,

    /// Producer of each Wire, indexed by Wire
    producers: Vec<Producer>,

    /// Declared Output Wires
    outputs: BTreeSet<Wire>,
}

impl Circuit {
    /// Returns the declared number of wires.
    #[inline]
    pub fn total_wires(&self) -> usize {
        self.total_wires
    }

    /// Returns the gates of `self` in source order.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Returns the declared output wires in ascending order.
    #[inline]
    pub fn outputs(&self) -> &BTreeSet<Wire> {
        &self.outputs
    }

    /// Returns the smallest declared output wire.
    #[inline]
    pub fn first_output(&self) -> Option<Wire> {
        self.outputs.iter().next().copied()
    }

    /// Returns the producer of `wire` if it belongs to `self`.
    #[inline]
    pub fn producer(&self, wire: Wire) -> Option<Producer> {
        self.producers.get(wire).copied()
    }

    /// Returns the gate producing `wire` if it belongs to `self`.
    #[inline]
    pub fn gate(&self, wire: Wire) -> Option<&Gate> {
        self.producer(wire).map(|producer| &self.gates[producer.gate])
    }

    /// Returns an iterator over the wires produced by [`Input`](Gate::Input) gates.
    #[inline]
    pub fn input_wires(&self) -> impl Iterator<Item = Wire> + '_ {
        self.gates.iter().filter_map(|gate| match gate {
            Gate::Input { output } => Some(*output),
            _ => None,
        })
    }
}

impl fmt::Display for Circuit {
    /// Writes `self` in the circuit source format.
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "total {}", self.total_wires)?;
        for gate in &self.gates {
            writeln!(f, "{}", gate)?;
        }
        for output in &self.outputs {
            writeln!(f, "output {}", output)?;
        }
        Ok(())
    }
}

/// Circuit Builder
///
/// Accumulates the declarations of one circuit. Nothing escapes the builder until
/// [`finish`](Self::finish) has validated the whole graph.
#[derive(Clone, Debug, Default)]
pub struct CircuitBuilder {
    /// Declared Total Wire Count
    total_wires: Option<usize>,

    /// Gates in Declaration Order
    gates: Vec<Gate>,

    /// Producer of each Assigned Wire
    producers: BTreeMap<Wire, Producer>,

    /// Declared Output Wires
    outputs: BTreeSet<Wire>,
}

impl CircuitBuilder {
    /// Builds a new empty [`CircuitBuilder`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a new [`CircuitBuilder`] with the total number of wires already declared.
    #[inline]
    pub fn with_total(total_wires: usize) -> Self {
        Self {
            total_wires: Some(total_wires),
            ..Self::default()
        }
    }

    /// Declares the total number of wires, which may happen at most once.
    #[inline]
    pub fn declare_total(&mut self, total_wires: usize) -> core::result::Result<(), ParseErrorKind> {
        if self.total_wires.is_some() {
            return Err(ParseErrorKind::DuplicateDeclaration);
        }
        self.total_wires = Some(total_wires);
        Ok(())
    }

    /// Declares `wire` as a circuit output.
    #[inline]
    pub fn declare_output(&mut self, wire: Wire) {
        self.outputs.insert(wire);
    }

    /// Adds `gate` to the circuit, failing if one of its outputs is already produced.
    #[inline]
    pub fn push(&mut self, gate: Gate) -> Result {
        let index = self.gates.len();
        for (slot, wire) in gate.outputs().iter().enumerate() {
            if self.producers.contains_key(wire) {
                for wire in &gate.outputs()[..slot] {
                    self.producers.remove(wire);
                }
                return Err(Error::DuplicateWireAssignment { wire: *wire });
            }
            self.producers.insert(*wire, Producer { gate: index, slot });
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Validates the accumulated declarations and returns the finished [`Circuit`].
    ///
    /// The checks run in order: every declared output is produced, the largest produced wire
    /// matches the declared total, and every wire below the total is produced.
    #[inline]
    pub fn finish(self) -> Result<Circuit> {
        if let Some(wire) = self
            .outputs
            .iter()
            .find(|wire| !self.producers.contains_key(wire))
        {
            return Err(Error::MissingWire { wire: *wire });
        }
        let total_wires = self.total_wires.ok_or(Error::UndeclaredTotal)?;
        let actual = match self.producers.keys().next_back() {
            Some(wire) => wire.saturating_add(1),
            None => 0,
        };
        if actual != total_wires || self.producers.contains_key(&usize::MAX) {
            return Err(Error::WireCountMismatch {
                declared: total_wires,
                actual,
            });
        }
        if let Some((_, wire)) = self
            .producers
            .keys()
            .zip(0..)
            .find(|(assigned, wire)| **assigned != *wire)
        {
            return Err(Error::MissingWire { wire });
        }
        let producers = self.producers.into_values().collect::<Vec<_>>();
        debug!(
            total_wires,
            gates = self.gates.len(),
            outputs = self.outputs.len(),
            "validated circuit"
        );
        Ok(Circuit {
            total_wires,
            gates: self.gates,
            producers,
            outputs: self.outputs,
        })
    }
}
