//! Lazy Circuit Evaluation
//!
//! The [`Evaluator`] collapses the dependency tree below a wire into its value. Values are cached
//! the first time they are computed and never recomputed or overwritten, so the order in which
//! wires are requested has no effect on the result.

use crate::{
    circuit::Circuit,
    error::{Error, Result},
    field::Field,
    gate::{Evaluation, Gate, Wire},
    parser::InputAssignment,
};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Value Table
///
/// Maps each evaluated wire to its value in ascending wire order.
pub type ValueTable<F> = BTreeMap<Wire, F>;

/// Memoizing Circuit Evaluator
#[derive(Clone, Debug)]
pub struct Evaluator<'c, F> {
    /// Circuit
    circuit: &'c Circuit,

    /// Input Assignment
    inputs: InputAssignment<F>,

    /// Cached Wire Values
    table: ValueTable<F>,
}

impl<'c, F> Evaluator<'c, F>
where
    F: Field,
{
    /// Builds a new [`Evaluator`] for `circuit`, checking that every input wire already has a
    /// value in `inputs`.
    #[inline]
    pub fn new(circuit: &'c Circuit, inputs: InputAssignment<F>) -> Result<Self> {
        if let Some(wire) = circuit.input_wires().find(|wire| !inputs.contains(*wire)) {
            return Err(Error::UnassignedInput { wire });
        }
        Ok(Self {
            circuit,
            inputs,
            table: ValueTable::new(),
        })
    }

    /// Returns the circuit being evaluated.
    #[inline]
    pub fn circuit(&self) -> &'c Circuit {
        self.circuit
    }

    /// Returns the values computed so far.
    #[inline]
    pub fn table(&self) -> &ValueTable<F> {
        &self.table
    }

    /// Returns the computed values, consuming `self`.
    #[inline]
    pub fn into_table(self) -> ValueTable<F> {
        self.table
    }

    /// Returns the value of `wire`, computing and caching every uncached wire it depends on.
    ///
    /// Dependencies are resolved in the order of the gate's operands, depth first, exactly as a
    /// recursive descent would, but with an explicit stack so that long chains of gates do not
    /// grow the call stack.
    pub fn value_of(&mut self, wire: Wire) -> Result<F> {
        if let Some(value) = self.table.get(&wire) {
            return Ok(value.clone());
        }
        let mut stack = vec![wire];
        while let Some(&top) = stack.last() {
            if self.table.contains_key(&top) {
                stack.pop();
                continue;
            }
            let gate = self.dependencies(top)?;
            let pending = stack.len();
            stack.extend(
                gate.inputs()
                    .iter()
                    .rev()
                    .filter(|input| !self.table.contains_key(*input)),
            );
            if stack.len() == pending {
                stack.pop();
                self.collapse(gate)?;
            }
        }
        self.table
            .get(&wire)
            .cloned()
            .ok_or(Error::MissingWire { wire })
    }

    /// Returns the gate producing `wire` after checking that its dependencies precede it.
    #[inline]
    fn dependencies(&self, wire: Wire) -> Result<&'c Gate> {
        let gate = self
            .circuit
            .gate(wire)
            .ok_or(Error::MissingWire { wire })?;
        gate.check_monotonic()?;
        Ok(gate)
    }

    /// Computes the outputs of `gate`, whose dependencies are already cached, and caches them.
    fn collapse(&mut self, gate: &Gate) -> Result {
        let evaluation = match gate {
            Gate::Input { output } => Evaluation::single(
                self.inputs
                    .get(*output)
                    .cloned()
                    .ok_or(Error::UnassignedInput { wire: *output })?,
            ),
            _ => {
                let table = &self.table;
                gate.evaluate(|wire| {
                    table
                        .get(&wire)
                        .cloned()
                        .ok_or(Error::MissingWire { wire })
                })?
            }
        };
        for (wire, value) in gate.outputs().iter().zip(evaluation) {
            trace!(wire, value = ?value, "collapsed wire");
            self.table.entry(*wire).or_insert(value);
        }
        Ok(())
    }

    /// Evaluates every declared output in ascending order.
    #[inline]
    pub fn evaluate_outputs(&mut self) -> Result {
        for wire in self.circuit.outputs().iter().copied() {
            self.value_of(wire)?;
        }
        debug!(cached = self.table.len(), "evaluated outputs");
        Ok(())
    }

    /// Evaluates every wire of the circuit that is not cached yet, in ascending order.
    #[inline]
    pub fn fill_gaps(&mut self) -> Result {
        let before = self.table.len();
        for wire in 0..self.circuit.total_wires() {
            if !self.table.contains_key(&wire) {
                self.value_of(wire)?;
            }
        }
        debug!(filled = self.table.len() - before, "filled wire gaps");
        Ok(())
    }

    /// Evaluates the declared outputs and then fills every remaining wire.
    #[inline]
    pub fn evaluate(&mut self) -> Result {
        self.evaluate_outputs()?;
        self.fill_gaps()
    }
}

/// Evaluates `circuit` over `inputs` and returns the complete value table.
#[inline]
pub fn evaluate<F>(circuit: &Circuit, inputs: InputAssignment<F>) -> Result<ValueTable<F>>
where
    F: Field,
{
    let mut evaluator = Evaluator::new(circuit, inputs)?;
    evaluator.evaluate()?;
    Ok(evaluator.into_table())
}

/// Testing Suite
#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        parser::parse,
        test::{Counting, Mersenne31},
    };
    use proptest::prelude::*;

    /// Builds the input assignment from `(wire, value)` pairs.
    fn inputs<F>(values: &[(Wire, u64)]) -> InputAssignment<F>
    where
        F: Field,
    {
        values
            .iter()
            .map(|(wire, value)| (*wire, F::from_biguint(&(*value).into())))
            .collect()
    }

    /// Checks the documented two input adder example.
    #[test]
    fn adder_example() {
        let circuit = parse("total 3\ninput 0\ninput 1\nadd in 2 <0 1> out 1 <2>\noutput 2\n")
            .expect("Valid circuit.");
        let table = evaluate::<Mersenne31>(&circuit, inputs(&[(0, 5), (1, 3)]))
            .expect("Evaluation succeeds.");
        assert_eq!(table[&2].to_hex(), "0x8");
        assert_eq!(table.len(), 3);
    }

    /// Checks that a missing input is reported before any evaluation happens.
    #[test]
    fn unassigned_input_is_checked_eagerly() {
        let circuit = parse("total 3\ninput 0\ninput 1\nmul in 2 <0 1> out 1 <2>\noutput 2\n")
            .expect("Valid circuit.");
        assert_eq!(
            Evaluator::<Mersenne31>::new(&circuit, inputs(&[(0, 5)])).map(|_| ()),
            Err(Error::UnassignedInput { wire: 1 })
        );
    }

    /// Checks that a gate reading a later wire is refused.
    #[test]
    fn backward_reference_is_refused() {
        let circuit = parse("total 3\ninput 0\nadd in 2 <0 2> out 1 <1>\ninput 2\noutput 1\n")
            .expect("The parser does not check wire order.");
        let mut evaluator =
            Evaluator::<Mersenne31>::new(&circuit, inputs(&[(0, 1), (2, 1)])).expect("Assigned.");
        assert_eq!(
            evaluator.evaluate(),
            Err(Error::NonMonotonicDependency {
                wire: 1,
                dependencies: vec![0, 2],
            })
        );
    }

    /// Checks that a self reference is refused.
    #[test]
    fn self_reference_is_refused() {
        let circuit = parse("total 2\ninput 0\nmul in 2 <0 1> out 1 <1>\noutput 1\n")
            .expect("The parser does not check wire order.");
        let mut evaluator =
            Evaluator::<Mersenne31>::new(&circuit, inputs(&[(0, 1)])).expect("Assigned.");
        assert!(matches!(
            evaluator.value_of(1),
            Err(Error::NonMonotonicDependency { wire: 1, .. })
        ));
    }

    /// Checks that a zero divisor aborts evaluation.
    #[test]
    fn zero_divisor_aborts() {
        let circuit = parse("total 3\ninput 0\ninput 1\ndiv in 2 <0 1> out 1 <2>\noutput 2\n")
            .expect("Valid circuit.");
        assert_eq!(
            evaluate::<Mersenne31>(&circuit, inputs(&[(0, 5), (1, 0)])),
            Err(Error::DivisionByZero { wire: 2 })
        );
    }

    /// Checks that the gap filling pass reaches wires that no output depends on, including wires
    /// numbered above every output.
    #[test]
    fn gap_filling_completes_the_table() {
        let circuit = parse(
            "total 6\ninput 0\ninput 1\nadd in 2 <0 1> out 1 <2>\nmul in 2 <0 1> out 1 <3>\n\
             zerop in 1 <3> out 2 <4 5>\noutput 2\n",
        )
        .expect("Valid circuit.");
        let mut evaluator =
            Evaluator::<Mersenne31>::new(&circuit, inputs(&[(0, 2), (1, 7)])).expect("Assigned.");
        evaluator.evaluate_outputs().expect("Outputs evaluate.");
        assert_eq!(evaluator.table().keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        evaluator.fill_gaps().expect("Gaps evaluate.");
        let table = evaluator.into_table();
        assert_eq!(table.keys().copied().collect::<Vec<_>>(), (0..6).collect::<Vec<_>>());
        assert_eq!(table[&3], Mersenne31::new(14));
        assert_eq!(table[&4], Mersenne31::new(0));
        assert_eq!(table[&5].mul(&Mersenne31::new(14)), Mersenne31::new(1));
    }

    /// Checks that a cloned evaluator shares the circuit and keeps its own cache.
    #[test]
    fn cloned_evaluator_keeps_cache() {
        let circuit = parse("total 3\ninput 0\ninput 1\nadd in 2 <0 1> out 1 <2>\noutput 2\n")
            .expect("Valid circuit.");
        let mut evaluator =
            Evaluator::<Mersenne31>::new(&circuit, inputs(&[(0, 2), (1, 7)])).expect("Assigned.");
        evaluator.evaluate_outputs().expect("Outputs evaluate.");
        let mut clone = evaluator.clone();
        assert!(core::ptr::eq(clone.circuit(), &circuit));
        assert_eq!(clone.table(), evaluator.table());
        clone.fill_gaps().expect("Nothing left to fill.");
        assert_eq!(clone.into_table()[&2], Mersenne31::new(9));
    }

    /// Checks that evaluating a wire twice performs its arithmetic once.
    #[test]
    fn evaluation_is_memoized() {
        let circuit = parse(
            "total 5\ninput 0\ninput 1\nmul in 2 <0 1> out 1 <2>\nadd in 2 <2 2> out 1 <3>\n\
             const-div-2 in 1 <3> out 1 <4>\noutput 4\n",
        )
        .expect("Valid circuit.");
        let mut evaluator =
            Evaluator::<Counting<Mersenne31>>::new(&circuit, inputs(&[(0, 3), (1, 4)]))
                .expect("Assigned.");
        Counting::<Mersenne31>::reset();
        let first = evaluator.value_of(4).expect("Evaluation succeeds.");
        let counts = Counting::<Mersenne31>::counts();
        assert_eq!((counts.add, counts.mul, counts.inverse), (1, 2, 1));
        let second = evaluator.value_of(4).expect("Evaluation succeeds.");
        evaluator.fill_gaps().expect("Nothing left to fill.");
        assert_eq!(first, second);
        assert_eq!(Counting::<Mersenne31>::counts(), counts);
        assert_eq!(first.into_inner(), Mersenne31::new(12));
    }

    /// Checks that a long chain is evaluated without relying on the call stack.
    #[test]
    fn long_chains_evaluate() {
        const LENGTH: usize = 200_000;
        let mut text = format!("total {}\ninput 0\n", LENGTH + 1);
        for wire in 0..LENGTH {
            text.push_str(&format!("add in 2 <{} {}> out 1 <{}>\n", wire, wire, wire + 1));
        }
        text.push_str(&format!("output {}\n", LENGTH));
        let circuit = parse(&text).expect("Valid circuit.");
        let mut evaluator =
            Evaluator::<Mersenne31>::new(&circuit, inputs(&[(0, 1)])).expect("Assigned.");
        let value = evaluator.value_of(LENGTH).expect("Evaluation succeeds.");
        assert_eq!(value, Mersenne31::new(2).pow(LENGTH as u64));
    }

    proptest! {
        /// Checks that every cached value agrees with direct recomputation from cached operands
        /// and that the table covers every wire exactly once.
        #[test]
        fn cached_values_match_recomputation(
            seeds in prop::collection::vec(0u64..Mersenne31::MODULUS, 2..6),
            operations in prop::collection::vec((0u8..4, any::<prop::sample::Index>(), any::<prop::sample::Index>()), 1..40),
        ) {
            let mut text = String::new();
            let mut wire = 0;
            for _ in &seeds {
                text.push_str(&format!("input {}\n", wire));
                wire += 1;
            }
            for (kind, lhs, rhs) in &operations {
                let (lhs, rhs) = (lhs.index(wire), rhs.index(wire));
                text.push_str(&match kind {
                    0 => format!("add in 2 <{} {}> out 1 <{}>\n", lhs, rhs, wire),
                    1 => format!("mul in 2 <{} {}> out 1 <{}>\n", lhs, rhs, wire),
                    2 => format!("const-mul-neg-{:x} in 1 <{}> out 1 <{}>\n", rhs + 1, lhs, wire),
                    _ => format!("const-div-{:x} in 1 <{}> out 1 <{}>\n", rhs + 1, lhs, wire),
                });
                wire += 1;
            }
            text.push_str(&format!("total {}\noutput {}\n", wire, wire - 1));
            let circuit = parse(&text).expect("Generated circuits are valid.");
            let assignment: InputAssignment<Mersenne31> = seeds.iter().enumerate().map(|(wire, seed)| (wire, Mersenne31::new(*seed))).collect();
            let table = evaluate(&circuit, assignment).expect("No division by zero is generated.");
            prop_assert_eq!(table.keys().copied().collect::<Vec<_>>(), (0..wire).collect::<Vec<_>>());
            for gate in circuit.gates().iter().filter(|gate| !gate.is_input()) {
                let expected = gate
                    .evaluate(|wire| Ok(table[&wire].clone()))
                    .expect("Recomputation succeeds.")
                    .into_iter()
                    .collect::<Vec<_>>();
                let actual = gate.outputs().iter().map(|wire| table[wire].clone()).collect::<Vec<_>>();
                prop_assert_eq!(expected, actual);
            }
        }
    }
}
