//! Arkworks Constraint System

use crate::{
    constraint::fp::Fp,
    error::{Error, Result},
    ff::PrimeField,
    relations::r1cs::{
        self, ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, OptimizationGoal,
        SynthesisMode,
    },
};
use tracing::debug;
use zkarith_circuit::{
    constraint::{constraints, LinearCombination, Variable},
    Circuit, ConstraintOptions, Satisfied, Size, ValueTable, Wire,
};

pub use crate::relations::r1cs::SynthesisError;

pub mod fp;

/// Synthesis Result
pub type SynthesisResult<T = ()> = core::result::Result<T, SynthesisError>;

/// Arkworks Rank-1 Constraint System
#[derive(derivative::Derivative)]
#[derivative(Clone, Debug)]
pub struct R1CS<F>(ConstraintSystemRef<F>)
where
    F: PrimeField;

impl<F> R1CS<F>
where
    F: PrimeField,
{
    /// Builds a new [`R1CS`] constraint system from `constraint_system` without checking its
    /// optimization goal or synthesis mode.
    #[inline]
    pub fn new_unchecked(constraint_system: ConstraintSystemRef<F>) -> Self {
        Self(constraint_system)
    }

    /// Constructs a new constraint system which is ready for unknown variables.
    #[inline]
    pub fn for_contexts() -> Self {
        let constraint_system = ConstraintSystem::new_ref();
        constraint_system.set_optimization_goal(OptimizationGoal::Constraints);
        constraint_system.set_mode(SynthesisMode::Setup);
        Self::new_unchecked(constraint_system)
    }

    /// Constructs a new constraint system which is ready for known variables.
    #[inline]
    pub fn for_proofs() -> Self {
        let constraint_system = ConstraintSystem::new_ref();
        constraint_system.set_optimization_goal(OptimizationGoal::Constraints);
        Self::new_unchecked(constraint_system)
    }

    /// Synthesizes the constraint system of `circuit`.
    ///
    /// Declared outputs are allocated as public instance variables in ascending wire order and
    /// every other wire as a witness variable. Without a `table` the system is built in setup mode
    /// with no assignment, which is how proving and verifying keys are generated.
    #[inline]
    pub fn synthesize(
        circuit: &Circuit,
        table: Option<&ValueTable<Fp<F>>>,
        options: ConstraintOptions,
    ) -> Result<Self> {
        let this = match table {
            Some(_) => Self::for_proofs(),
            None => Self::for_contexts(),
        };
        let variables = this.allocate(circuit, table)?;
        let shapes = constraints::<Fp<F>>(circuit, options);
        for shape in &shapes {
            this.0.enforce_constraint(
                lower(&shape.a, &variables),
                lower(&shape.b, &variables),
                lower(&shape.c, &variables),
            )?;
        }
        debug!(
            constraints = shapes.len(),
            public = circuit.outputs().len(),
            setup = table.is_none(),
            "synthesized constraint system"
        );
        Ok(this)
    }

    /// Allocates one variable per wire of `circuit`, indexed by wire.
    #[inline]
    fn allocate(
        &self,
        circuit: &Circuit,
        table: Option<&ValueTable<Fp<F>>>,
    ) -> Result<Vec<r1cs::Variable>> {
        let mut variables = Vec::with_capacity(circuit.total_wires());
        for wire in 0..circuit.total_wires() {
            let value = match table {
                Some(table) => Some(
                    table
                        .get(&wire)
                        .ok_or(zkarith_circuit::Error::IncompleteWireTable { wire })?
                        .0,
                ),
                None => None,
            };
            let assignment = move || value.ok_or(SynthesisError::AssignmentMissing);
            variables.push(if circuit.outputs().contains(&wire) {
                self.0.new_input_variable(assignment)?
            } else {
                self.0.new_witness_variable(assignment)?
            });
        }
        Ok(variables)
    }

    /// Returns the underlying constraint system.
    #[inline]
    pub fn constraint_system(&self) -> &ConstraintSystemRef<F> {
        &self.0
    }

    /// Checks that the assigned values satisfy every constraint, naming the first one that fails.
    #[inline]
    pub fn check_satisfied(&self) -> Result {
        match self.0.which_is_unsatisfied()? {
            Some(name) => Err(Error::Unsatisfied(name)),
            None => Ok(()),
        }
    }

    /// Returns the number of constraints and variables in `self`.
    ///
    /// The constant one is not counted as a public variable.
    #[inline]
    pub fn measure(&self) -> Size {
        Size {
            constraint_count: self.0.num_constraints(),
            public_variable_count: self.0.num_instance_variables().saturating_sub(1),
            secret_variable_count: self.0.num_witness_variables(),
        }
    }
}

impl<F> Satisfied for R1CS<F>
where
    F: PrimeField,
{
    /// Returns `true` if all the constraints in `self` are satisfied. Systems built in setup mode
    /// have no assignment and are never satisfied.
    #[inline]
    fn is_satisfied(&self) -> bool {
        self.0.is_satisfied().unwrap_or(false)
    }
}

impl<F> ConstraintSynthesizer<F> for R1CS<F>
where
    F: PrimeField,
{
    /// Generates constraints for `self` by moving them into `cs`. This method is necessary to hook
    /// into the proof system traits defined in `arkworks`.
    #[inline]
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> SynthesisResult {
        let precomputed_cs = self.0.into_inner().ok_or(SynthesisError::MissingCS)?;
        let mut target_cs = cs.borrow_mut().ok_or(SynthesisError::MissingCS)?;
        *target_cs = precomputed_cs;
        Ok(())
    }
}

/// Converts `combination` into an `ark-relations` linear combination over `variables`.
#[inline]
fn lower<F>(
    combination: &LinearCombination<Fp<F>>,
    variables: &[r1cs::Variable],
) -> r1cs::LinearCombination<F>
where
    F: PrimeField,
{
    combination
        .terms()
        .iter()
        .fold(r1cs::LinearCombination::zero(), |lc, (coefficient, variable)| {
            let variable = match variable {
                Variable::One => r1cs::Variable::One,
                Variable::Wire(wire) => variables[*wire],
            };
            lc + (coefficient.0, variable)
        })
}

/// Returns the public input vector exposed by `table`: the values of the declared outputs of
/// `circuit` in ascending wire order.
#[inline]
pub fn public_input<F>(circuit: &Circuit, table: &ValueTable<Fp<F>>) -> Result<Vec<F>>
where
    F: PrimeField,
{
    circuit
        .outputs()
        .iter()
        .map(|wire: &Wire| {
            table
                .get(wire)
                .map(|value| value.0)
                .ok_or(Error::Circuit(zkarith_circuit::Error::IncompleteWireTable {
                    wire: *wire,
                }))
        })
        .collect()
}
