//! Rank-1 Constraint Shapes
//!
//! Every gate is lowered to constraints of the form `A * B = C` where `A`, `B`, and `C` are linear
//! combinations of wire variables and the constant one. Proof system plugins translate these
//! shapes into their own constraint systems.

use crate::{
    circuit::Circuit,
    collapse::ValueTable,
    error::{Error, Result},
    field::Field,
    gate::{Gate, Wire},
};

/// Constraint Variable
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Variable {
    /// Constant One
    One,

    /// Circuit Wire
    Wire(Wire),
}

/// Linear Combination of [`Variable`]s
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LinearCombination<F> {
    /// Coefficient and Variable Terms
    terms: Vec<(F, Variable)>,
}

impl<F> LinearCombination<F>
where
    F: Field,
{
    /// Builds the empty linear combination, which is zero.
    #[inline]
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// Builds the linear combination `1 * wire`.
    #[inline]
    pub fn wire(wire: Wire) -> Self {
        Self::zero().with(F::one(), Variable::Wire(wire))
    }

    /// Builds the linear combination `constant * 1`.
    #[inline]
    pub fn constant(constant: F) -> Self {
        Self::zero().with(constant, Variable::One)
    }

    /// Adds the term `coefficient * variable` to `self`.
    #[inline]
    pub fn with(mut self, coefficient: F, variable: Variable) -> Self {
        self.terms.push((coefficient, variable));
        self
    }

    /// Returns the terms of `self`.
    #[inline]
    pub fn terms(&self) -> &[(F, Variable)] {
        &self.terms
    }

    /// Evaluates `self` against the wire values in `table`.
    #[inline]
    pub fn evaluate(&self, table: &ValueTable<F>) -> Result<F> {
        self.terms
            .iter()
            .try_fold(F::zero(), |sum, (coefficient, variable)| {
                let value = match variable {
                    Variable::One => F::one(),
                    Variable::Wire(wire) => table
                        .get(wire)
                        .cloned()
                        .ok_or(Error::IncompleteWireTable { wire: *wire })?,
                };
                Ok(sum.add(&coefficient.mul(&value)))
            })
    }
}

/// Rank-1 Constraint `a * b = c`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Constraint<F> {
    /// Left Factor
    pub a: LinearCombination<F>,

    /// Right Factor
    pub b: LinearCombination<F>,

    /// Product
    pub c: LinearCombination<F>,
}

impl<F> Constraint<F>
where
    F: Field,
{
    /// Builds a new [`Constraint`] asserting `a * b = c`.
    #[inline]
    pub fn new(a: LinearCombination<F>, b: LinearCombination<F>, c: LinearCombination<F>) -> Self {
        Self { a, b, c }
    }

    /// Returns `true` if the values in `table` satisfy `self`.
    #[inline]
    pub fn is_satisfied(&self, table: &ValueTable<F>) -> Result<bool> {
        Ok(self.a.evaluate(table)?.mul(&self.b.evaluate(table)?) == self.c.evaluate(table)?)
    }
}

/// Constant Division Constraint Policy
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ConstDivPolicy {
    /// Enforce `out * constant = input` for every [`ConstDiv`](Gate::ConstDiv) gate.
    #[default]
    Enforce,

    /// Leave [`ConstDiv`](Gate::ConstDiv) gates unconstrained.
    ///
    /// This matches circuits whose producer already proves the relation through a paired
    /// constant multiplication. The output wire is otherwise free for a malicious prover.
    Omit,
}

/// Constraint Lowering Options
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ConstraintOptions {
    /// Constant Division Policy
    pub const_div: ConstDivPolicy,
}

impl Gate {
    /// Returns the constraints enforcing `self`.
    #[inline]
    pub fn constraints<F>(&self, options: ConstraintOptions) -> Vec<Constraint<F>>
    where
        F: Field,
    {
        let wire = LinearCombination::wire;
        match self {
            Self::Input { .. } => Vec::new(),
            Self::Add { inputs, output } => vec![Constraint::new(
                wire(inputs[0]).with(F::one(), Variable::Wire(inputs[1])),
                LinearCombination::constant(F::one()),
                wire(*output),
            )],
            Self::Mul { inputs, output } => vec![Constraint::new(
                wire(inputs[0]),
                wire(inputs[1]),
                wire(*output),
            )],
            Self::Div { inputs, output } => vec![Constraint::new(
                wire(*output),
                wire(inputs[1]),
                wire(inputs[0]),
            )],
            Self::ConstMul {
                constant,
                input,
                output,
            } => vec![Constraint::new(
                wire(*input),
                LinearCombination::constant(F::from_constant(constant)),
                wire(*output),
            )],
            Self::ConstDiv {
                constant,
                input,
                output,
            } => match options.const_div {
                ConstDivPolicy::Enforce => vec![Constraint::new(
                    wire(*output),
                    LinearCombination::constant(F::from_constant(constant)),
                    wire(*input),
                )],
                ConstDivPolicy::Omit => Vec::new(),
            },
            Self::Zerop { input, outputs } => {
                let [indicator, witness] = *outputs;
                vec![
                    Constraint::new(
                        wire(*input),
                        wire(witness),
                        LinearCombination::constant(F::one())
                            .with(F::one().neg(), Variable::Wire(indicator)),
                    ),
                    Constraint::new(wire(*input), wire(indicator), LinearCombination::zero()),
                ]
            }
        }
    }
}

/// Returns the constraints enforcing every gate of `circuit`, in gate order.
#[inline]
pub fn constraints<F>(circuit: &Circuit, options: ConstraintOptions) -> Vec<Constraint<F>>
where
    F: Field,
{
    circuit
        .gates()
        .iter()
        .flat_map(|gate| gate.constraints(options))
        .collect()
}

/// Returns the index of the first constraint the values in `table` do not satisfy.
#[inline]
pub fn first_unsatisfied<F>(
    constraints: &[Constraint<F>],
    table: &ValueTable<F>,
) -> Result<Option<usize>>
where
    F: Field,
{
    for (index, constraint) in constraints.iter().enumerate() {
        if !constraint.is_satisfied(table)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Testing Suite
#[cfg(test)]
mod test {
    use super::*;
    use crate::{collapse::evaluate, parser::parse, test::Mersenne31, InputAssignment};

    /// Circuit exercising every gate kind.
    const CIRCUIT: &str = "\
        total 9\n\
        input 0\n\
        input 1\n\
        add in 2 <0 1> out 1 <2>\n\
        mul in 2 <2 1> out 1 <3>\n\
        div in 2 <3 0> out 1 <4>\n\
        const-mul-neg-a in 1 <4> out 1 <5>\n\
        const-div-7 in 1 <5> out 1 <6>\n\
        zerop in 1 <6> out 2 <7 8>\n\
        output 7\n";

    /// Evaluates [`CIRCUIT`] over `inputs`.
    fn evaluated(inputs: [u64; 2]) -> (Circuit, ValueTable<Mersenne31>) {
        let circuit = parse(CIRCUIT).expect("Valid circuit.");
        let assignment: InputAssignment<Mersenne31> = inputs
            .iter()
            .enumerate()
            .map(|(wire, value)| (wire, Mersenne31::new(*value)))
            .collect();
        let table = evaluate(&circuit, assignment).expect("Evaluation succeeds.");
        (circuit, table)
    }

    /// Checks that an honest evaluation satisfies every constraint.
    #[test]
    fn evaluated_circuits_are_satisfied() {
        for inputs in [[3, 4], [5, 0]] {
            let (circuit, table) = evaluated(inputs);
            let constraints = constraints(&circuit, ConstraintOptions::default());
            assert_eq!(constraints.len(), 7);
            assert_eq!(first_unsatisfied(&constraints, &table), Ok(None));
        }
    }

    /// Checks that a tampered wire breaks the constraint of its gate.
    #[test]
    fn tampered_wires_are_detected() {
        let (circuit, mut table) = evaluated([3, 4]);
        let constraints = constraints(&circuit, ConstraintOptions::default());
        table.insert(4, Mersenne31::new(1));
        assert_eq!(first_unsatisfied(&constraints, &table), Ok(Some(2)));
        let (_, mut table) = evaluated([3, 4]);
        table.insert(7, Mersenne31::new(1));
        assert!(first_unsatisfied(&constraints, &table)
            .expect("Table is complete.")
            .is_some());
    }

    /// Checks the operand order of the division constraint.
    #[test]
    fn division_reorders_operands() {
        let gate = Gate::Div {
            inputs: [3, 0],
            output: 4,
        };
        assert_eq!(
            gate.constraints::<Mersenne31>(ConstraintOptions::default()),
            vec![Constraint::new(
                LinearCombination::wire(4),
                LinearCombination::wire(0),
                LinearCombination::wire(3),
            )]
        );
    }

    /// Checks that the constant division policy controls its constraint.
    #[test]
    fn const_div_follows_policy() {
        let (circuit, mut table) = evaluated([3, 4]);
        let omit = ConstraintOptions {
            const_div: ConstDivPolicy::Omit,
        };
        let omitted = constraints(&circuit, omit);
        assert_eq!(omitted.len(), 6);
        table.insert(6, Mersenne31::new(0));
        table.insert(7, Mersenne31::new(1));
        table.insert(8, Mersenne31::new(0));
        assert_eq!(first_unsatisfied(&omitted, &table), Ok(None));
        assert_eq!(
            first_unsatisfied(&constraints(&circuit, ConstraintOptions::default()), &table),
            Ok(Some(4))
        );
    }

    /// Checks that a table with a gap cannot be checked.
    #[test]
    fn missing_wires_are_reported() {
        let (circuit, mut table) = evaluated([3, 4]);
        table.remove(&2);
        assert_eq!(
            first_unsatisfied(&constraints(&circuit, ConstraintOptions::default()), &table),
            Err(Error::IncompleteWireTable { wire: 2 })
        );
    }
}
