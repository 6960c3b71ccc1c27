//! Intermediate Circuit and Wire Value Formats
//!
//! The converted circuit format flattens every gate into one operation per line with field
//! constants already folded:
//!
//! ```text
//! input <N>
//! out_start <id>
//! add <a> <b> <out>
//! mul <a> <b> <out>
//! div <out> <divisor> <dividend>
//! constmul <a> <hex> <out>
//! zerop <a> <indicator> <witness>
//! ```
//!
//! Constant divisions are written as multiplications by the inverse constant. Wires without an
//! operation line are circuit inputs. The wire value format is one `<id> <hex>` line per wire.

use crate::{
    circuit::{Circuit, CircuitBuilder},
    collapse::ValueTable,
    error::{Error, ParseErrorKind, Result},
    field::Field,
    gate::{Gate, Wire},
    parser::{parse_integer, strip_comment, InputAssignment},
};
use core::fmt::{self, Write};
use num_bigint::BigInt;
use std::collections::BTreeSet;
use tracing::debug;

/// Converted Operation
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operation<F> {
    /// Addition
    Add {
        /// Summands
        inputs: [Wire; 2],

        /// Sum
        output: Wire,
    },

    /// Multiplication
    Mul {
        /// Factors
        inputs: [Wire; 2],

        /// Product
        output: Wire,
    },

    /// Division
    Div {
        /// Dividend and Divisor
        inputs: [Wire; 2],

        /// Quotient
        output: Wire,
    },

    /// Multiplication by a Field Constant
    ConstMul {
        /// Folded Constant
        constant: F,

        /// Factor
        input: Wire,

        /// Product
        output: Wire,
    },

    /// Zero Test
    Zerop {
        /// Tested Wire
        input: Wire,

        /// Indicator and Inverse Witness
        outputs: [Wire; 2],
    },
}

impl<F> Operation<F>
where
    F: Field,
{
    /// Converts `gate` into an operation, returning `None` for inputs.
    #[inline]
    pub fn from_gate(gate: &Gate) -> Result<Option<Self>> {
        Ok(Some(match gate {
            Gate::Input { .. } => return Ok(None),
            Gate::Add { inputs, output } => Self::Add {
                inputs: *inputs,
                output: *output,
            },
            Gate::Mul { inputs, output } => Self::Mul {
                inputs: *inputs,
                output: *output,
            },
            Gate::Div { inputs, output } => Self::Div {
                inputs: *inputs,
                output: *output,
            },
            Gate::ConstMul {
                constant,
                input,
                output,
            } => Self::ConstMul {
                constant: F::from_constant(constant),
                input: *input,
                output: *output,
            },
            Gate::ConstDiv {
                constant,
                input,
                output,
            } => Self::ConstMul {
                constant: F::from_constant(constant)
                    .inverse()
                    .ok_or(Error::DivisionByZero { wire: *output })?,
                input: *input,
                output: *output,
            },
            Gate::Zerop { input, outputs } => Self::Zerop {
                input: *input,
                outputs: *outputs,
            },
        }))
    }

    /// Returns the wires produced by `self`.
    #[inline]
    pub fn outputs(&self) -> &[Wire] {
        match self {
            Self::Add { output, .. }
            | Self::Mul { output, .. }
            | Self::Div { output, .. }
            | Self::ConstMul { output, .. } => core::slice::from_ref(output),
            Self::Zerop { outputs, .. } => outputs,
        }
    }

    /// Converts `self` back into a circuit gate.
    #[inline]
    pub fn into_gate(self) -> Gate {
        match self {
            Self::Add { inputs, output } => Gate::Add { inputs, output },
            Self::Mul { inputs, output } => Gate::Mul { inputs, output },
            Self::Div { inputs, output } => Gate::Div { inputs, output },
            Self::ConstMul {
                constant,
                input,
                output,
            } => Gate::ConstMul {
                constant: BigInt::from(constant.to_biguint()),
                input,
                output,
            },
            Self::Zerop { input, outputs } => Gate::Zerop { input, outputs },
        }
    }

    /// Parses the operator `verb` applied to `args`.
    #[inline]
    fn parse(verb: &str, args: &[&str]) -> core::result::Result<Self, ParseErrorKind> {
        match verb {
            "add" => {
                let [a, b, output] = wires(args)?;
                Ok(Self::Add {
                    inputs: [a, b],
                    output,
                })
            }
            "mul" => {
                let [a, b, output] = wires(args)?;
                Ok(Self::Mul {
                    inputs: [a, b],
                    output,
                })
            }
            "div" => {
                let [output, divisor, dividend] = wires(args)?;
                Ok(Self::Div {
                    inputs: [dividend, divisor],
                    output,
                })
            }
            "constmul" => match args {
                [input, constant, output] => Ok(Self::ConstMul {
                    constant: F::from_hex(constant)
                        .ok_or_else(|| ParseErrorKind::InvalidInteger((*constant).to_owned()))?,
                    input: parse_integer(input)?,
                    output: parse_integer(output)?,
                }),
                _ => Err(ParseErrorKind::Malformed),
            },
            "zerop" => {
                let [input, indicator, witness] = wires(args)?;
                Ok(Self::Zerop {
                    input,
                    outputs: [indicator, witness],
                })
            }
            _ => Err(ParseErrorKind::UnknownOperator(verb.to_owned())),
        }
    }
}

impl<F> fmt::Display for Operation<F>
where
    F: Field,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Add { inputs, output } => write!(f, "add {} {} {}", inputs[0], inputs[1], output),
            Self::Mul { inputs, output } => write!(f, "mul {} {} {}", inputs[0], inputs[1], output),
            Self::Div { inputs, output } => write!(f, "div {} {} {}", output, inputs[1], inputs[0]),
            Self::ConstMul {
                constant,
                input,
                output,
            } => write!(f, "constmul {} {} {}", input, constant.to_hex(), output),
            Self::Zerop { input, outputs } => {
                write!(f, "zerop {} {} {}", input, outputs[0], outputs[1])
            }
        }
    }
}

/// Parses exactly `N` wire identifiers.
#[inline]
fn wires<const N: usize>(args: &[&str]) -> core::result::Result<[Wire; N], ParseErrorKind> {
    if args.len() != N {
        return Err(ParseErrorKind::Malformed);
    }
    let mut wires = [0; N];
    for (wire, arg) in wires.iter_mut().zip(args) {
        *wire = parse_integer(arg)?;
    }
    Ok(wires)
}

/// Largest Wire Count accepted by [`Converted::into_circuit`]
///
/// Wires without an operation are implicit inputs, so the header alone decides how many gates are
/// built when reading a converted circuit back.
pub const MAX_CONVERTED_WIRES: usize = 1 << 24;

/// Converted Circuit
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Converted<F> {
    /// Total Wire Count
    pub total_wires: usize,

    /// Smallest Output Wire
    pub out_start: Wire,

    /// Operations in Gate Order
    pub operations: Vec<Operation<F>>,
}

impl<F> Converted<F>
where
    F: Field,
{
    /// Converts `circuit`, folding every constant into `F`.
    ///
    /// A circuit without outputs gets `out_start` equal to its total wire count.
    #[inline]
    pub fn from_circuit(circuit: &Circuit) -> Result<Self> {
        let mut operations = Vec::with_capacity(circuit.gates().len());
        for gate in circuit.gates() {
            if let Some(operation) = Operation::from_gate(gate)? {
                operations.push(operation);
            }
        }
        Ok(Self {
            total_wires: circuit.total_wires(),
            out_start: circuit.first_output().unwrap_or(circuit.total_wires()),
            operations,
        })
    }

    /// Parses the converted circuit format.
    #[inline]
    pub fn parse(text: &str) -> Result<Self> {
        let mut total_wires = None;
        let mut out_start = None;
        let mut operations = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let content = strip_comment(line);
            let tokens = content.split_whitespace().collect::<Vec<_>>();
            let error = |kind| Error::parse(index, content, kind);
            match tokens.as_slice() {
                [] => continue,
                ["input", count] => declare(&mut total_wires, count).map_err(error)?,
                ["out_start", wire] => declare(&mut out_start, wire).map_err(error)?,
                [verb, args @ ..] => operations.push(Operation::parse(verb, args).map_err(error)?),
            }
        }
        let total_wires = total_wires.ok_or(Error::UndeclaredTotal)?;
        Ok(Self {
            total_wires,
            out_start: out_start.unwrap_or(total_wires),
            operations,
        })
    }

    /// Rebuilds a validated [`Circuit`] from `self`.
    ///
    /// Wires that no operation produces become [`Input`](Gate::Input) gates and the wires in
    /// `[out_start, total_wires)` become the circuit outputs.
    ///
    /// The header count is bounded by [`MAX_CONVERTED_WIRES`] and every operation output must lie
    /// below it; both are checked before any gate is materialized.
    #[inline]
    pub fn into_circuit(self) -> Result<Circuit> {
        if self.total_wires > MAX_CONVERTED_WIRES {
            return Err(Error::TooManyWires {
                declared: self.total_wires,
                limit: MAX_CONVERTED_WIRES,
            });
        }
        let produced = self
            .operations
            .iter()
            .flat_map(Operation::outputs)
            .copied()
            .collect::<BTreeSet<_>>();
        if let Some(wire) = produced.range(self.total_wires..).next_back() {
            return Err(Error::WireCountMismatch {
                declared: self.total_wires,
                actual: wire.saturating_add(1),
            });
        }
        let mut builder = CircuitBuilder::with_total(self.total_wires);
        for wire in (0..self.total_wires).filter(|wire| !produced.contains(wire)) {
            builder.push(Gate::Input { output: wire })?;
        }
        for operation in self.operations {
            builder.push(operation.into_gate())?;
        }
        for wire in self.out_start..self.total_wires {
            builder.declare_output(wire);
        }
        builder.finish()
    }
}

impl<F> fmt::Display for Converted<F>
where
    F: Field,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "input {}", self.total_wires)?;
        writeln!(f, "out_start {}", self.out_start)?;
        for operation in &self.operations {
            writeln!(f, "{}", operation)?;
        }
        Ok(())
    }
}

/// Stores the header value `text` into `slot`, which may only be filled once.
#[inline]
fn declare(slot: &mut Option<usize>, text: &str) -> core::result::Result<(), ParseErrorKind> {
    if slot.is_some() {
        return Err(ParseErrorKind::DuplicateDeclaration);
    }
    *slot = Some(parse_integer(text)?);
    Ok(())
}

/// Renders `circuit` in the converted circuit format.
#[inline]
pub fn write_converted<F>(circuit: &Circuit) -> Result<String>
where
    F: Field,
{
    let converted = Converted::<F>::from_circuit(circuit)?;
    debug!(
        operations = converted.operations.len(),
        out_start = converted.out_start,
        "converted circuit"
    );
    Ok(converted.to_string())
}

/// Reads a circuit written by [`write_converted`].
#[inline]
pub fn read_converted<F>(text: &str) -> Result<Circuit>
where
    F: Field,
{
    Converted::<F>::parse(text)?.into_circuit()
}

/// Renders the values of wires `[0, total_wires)` in ascending order.
///
/// Returns [`Error::IncompleteWireTable`] for the first wire without a value.
#[inline]
pub fn write_wires<F>(table: &ValueTable<F>, total_wires: usize) -> Result<String>
where
    F: Field,
{
    let mut dump = String::new();
    for wire in 0..total_wires {
        let value = table
            .get(&wire)
            .ok_or(Error::IncompleteWireTable { wire })?;
        // Writing into a `String` cannot fail.
        let _ = writeln!(dump, "{} {}", wire, value.to_hex());
    }
    Ok(dump)
}

/// Reads a wire value dump written by [`write_wires`].
#[inline]
pub fn read_wires<F>(text: &str) -> Result<ValueTable<F>>
where
    F: Field,
{
    Ok(InputAssignment::parse(text)?.into_inner())
}
