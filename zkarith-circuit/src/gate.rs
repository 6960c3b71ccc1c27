//! Gates

use crate::{
    error::{Error, Result},
    field::Field,
};
use core::{fmt, iter, option, slice};
use num_bigint::{BigInt, Sign};

/// Wire Identifier
///
/// Wires are identified by their position in the circuit and are never renumbered.
pub type Wire = usize;

/// Gate
///
/// Each variant computes the value of its output wires from the values of its input wires. Only
/// [`Zerop`](Self::Zerop) produces two outputs.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Gate {
    /// Externally Supplied Value
    Input {
        /// Output Wire
        output: Wire,
    },

    /// Field Addition of `inputs[0]` and `inputs[1]`
    Add {
        /// Summands
        inputs: [Wire; 2],

        /// Output Wire
        output: Wire,
    },

    /// Field Multiplication of `inputs[0]` and `inputs[1]`
    Mul {
        /// Factors
        inputs: [Wire; 2],

        /// Output Wire
        output: Wire,
    },

    /// Field Division of the dividend `inputs[0]` by the divisor `inputs[1]`
    Div {
        /// Dividend and Divisor
        inputs: [Wire; 2],

        /// Output Wire
        output: Wire,
    },

    /// Multiplication by a Signed Constant
    ConstMul {
        /// Constant Factor
        constant: BigInt,

        /// Input Wire
        input: Wire,

        /// Output Wire
        output: Wire,
    },

    /// Division by a Signed Constant
    ConstDiv {
        /// Constant Divisor
        constant: BigInt,

        /// Input Wire
        input: Wire,

        /// Output Wire
        output: Wire,
    },

    /// Is-Zero Gadget
    ///
    /// `outputs[0]` is the indicator, `1` when the input is zero and `0` otherwise. `outputs[1]`
    /// is the witness for the indicator: `0` when the input is zero and its inverse otherwise.
    Zerop {
        /// Input Wire
        input: Wire,

        /// Indicator and Witness Wires
        outputs: [Wire; 2],
    },
}

impl Gate {
    /// Returns the wires `self` reads, in operand order.
    #[inline]
    pub fn inputs(&self) -> &[Wire] {
        match self {
            Self::Input { .. } => &[],
            Self::Add { inputs, .. } | Self::Mul { inputs, .. } | Self::Div { inputs, .. } => {
                inputs
            }
            Self::ConstMul { input, .. }
            | Self::ConstDiv { input, .. }
            | Self::Zerop { input, .. } => slice::from_ref(input),
        }
    }

    /// Returns the wires `self` produces.
    #[inline]
    pub fn outputs(&self) -> &[Wire] {
        match self {
            Self::Input { output }
            | Self::Add { output, .. }
            | Self::Mul { output, .. }
            | Self::Div { output, .. }
            | Self::ConstMul { output, .. }
            | Self::ConstDiv { output, .. } => slice::from_ref(output),
            Self::Zerop { outputs, .. } => outputs,
        }
    }

    /// Returns the smallest output wire of `self`.
    #[inline]
    pub fn first_output(&self) -> Wire {
        match self {
            Self::Zerop { outputs, .. } => outputs[0].min(outputs[1]),
            _ => self.outputs()[0],
        }
    }

    /// Returns `true` if `self` is an [`Input`](Self::Input) gate.
    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input { .. })
    }

    /// Checks that every dependency of `self` is strictly smaller than each of its outputs.
    #[inline]
    pub fn check_monotonic(&self) -> Result {
        let first = self.first_output();
        if self.inputs().iter().all(|wire| *wire < first) {
            Ok(())
        } else {
            Err(Error::NonMonotonicDependency {
                wire: first,
                dependencies: self.inputs().to_vec(),
            })
        }
    }

    /// Computes the outputs of `self` from the values of its inputs, fetched through `value`.
    ///
    /// [`Input`](Self::Input) gates have no dependencies to compute from, so their value has to be
    /// supplied by the caller and this method returns [`Error::UnassignedInput`] for them.
    #[inline]
    pub fn evaluate<F, V>(&self, mut value: V) -> Result<Evaluation<F>>
    where
        F: Field,
        V: FnMut(Wire) -> Result<F>,
    {
        match self {
            Self::Input { output } => Err(Error::UnassignedInput { wire: *output }),
            Self::Add { inputs, .. } => {
                Ok(Evaluation::single(value(inputs[0])?.add(&value(inputs[1])?)))
            }
            Self::Mul { inputs, .. } => {
                Ok(Evaluation::single(value(inputs[0])?.mul(&value(inputs[1])?)))
            }
            Self::Div { inputs, output } => {
                let dividend = value(inputs[0])?;
                let divisor = value(inputs[1])?
                    .inverse()
                    .ok_or(Error::DivisionByZero { wire: *output })?;
                Ok(Evaluation::single(dividend.mul(&divisor)))
            }
            Self::ConstMul {
                constant, input, ..
            } => Ok(Evaluation::single(
                F::from_constant(constant).mul(&value(*input)?),
            )),
            Self::ConstDiv {
                constant,
                input,
                output,
            } => {
                let inverse = F::from_constant(constant)
                    .inverse()
                    .ok_or(Error::DivisionByZero { wire: *output })?;
                Ok(Evaluation::single(inverse.mul(&value(*input)?)))
            }
            Self::Zerop { input, .. } => {
                let input = value(*input)?;
                Ok(match input.inverse() {
                    Some(inverse) => Evaluation::pair(F::zero(), inverse),
                    None => Evaluation::pair(F::one(), F::zero()),
                })
            }
        }
    }
}

impl fmt::Display for Gate {
    /// Writes `self` in the circuit source vocabulary accepted by [`parse`](crate::parser::parse).
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let operator = match self {
            Self::Input { output } => return write!(f, "input {}", output),
            Self::Add { .. } => "add".to_owned(),
            Self::Mul { .. } => "mul".to_owned(),
            Self::Div { .. } => "div".to_owned(),
            Self::ConstMul { constant, .. } => format!("const-mul-{}", constant_suffix(constant)),
            Self::ConstDiv { constant, .. } => format!("const-div-{}", constant_suffix(constant)),
            Self::Zerop { .. } => "zerop".to_owned(),
        };
        write!(
            f,
            "{} in {} <{}> out {} <{}>",
            operator,
            self.inputs().len(),
            join(self.inputs()),
            self.outputs().len(),
            join(self.outputs())
        )
    }
}

/// Formats the operator suffix for `constant`, as in `neg-1f` for `-31`.
#[inline]
fn constant_suffix(constant: &BigInt) -> String {
    match constant.sign() {
        Sign::Minus => format!("neg-{:x}", constant.magnitude()),
        _ => format!("{:x}", constant.magnitude()),
    }
}

/// Joins `wires` with single spaces.
#[inline]
fn join(wires: &[Wire]) -> String {
    wires
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Gate Evaluation
///
/// The values of a gate's outputs in the order of [`Gate::outputs`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Evaluation<F> {
    /// First Output
    first: F,

    /// Second Output of Two-Output Gates
    second: Option<F>,
}

impl<F> Evaluation<F> {
    /// Builds an [`Evaluation`] for a single-output gate.
    #[inline]
    pub fn single(value: F) -> Self {
        Self {
            first: value,
            second: None,
        }
    }

    /// Builds an [`Evaluation`] for a two-output gate.
    #[inline]
    pub fn pair(first: F, second: F) -> Self {
        Self {
            first,
            second: Some(second),
        }
    }
}

impl<F> IntoIterator for Evaluation<F> {
    type Item = F;
    type IntoIter = iter::Chain<iter::Once<F>, option::IntoIter<F>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        iter::once(self.first).chain(self.second)
    }
}
