//! Circuit and Input Assignment Parsers
//!
//! Both formats are line oriented. Everything after a `#` is a comment and blank lines are
//! skipped. A circuit line is one of
//!
//! ```text
//! total <N>
//! input <id>
//! output <id>
//! <op> in <k> <id1 .. idk> out <m> <id1 .. idm>
//! ```
//!
//! where `<op>` is `add`, `mul`, `div`, `zerop`, or a constant operator `const-mul-<hex>`,
//! `const-mul-neg-<hex>`, `const-div-<hex>`, `const-div-neg-<hex>`. An input assignment line is
//! `<wire_id> <hex_value>`.

use crate::{
    circuit::{Circuit, CircuitBuilder},
    error::{Error, ParseErrorKind, Result},
    field::{parse_hex, Field},
    gate::{Gate, Wire},
};
use core::str::FromStr;
use num_bigint::BigInt;
use std::collections::{btree_map, BTreeMap};
use tracing::{debug, warn};

/// Parses the circuit source `text` into a validated [`Circuit`].
///
/// The builder is local to this call, so a failure on any line discards everything parsed so far.
#[inline]
pub fn parse(text: &str) -> Result<Circuit> {
    let mut builder = CircuitBuilder::new();
    for (index, line) in text.lines().enumerate() {
        let content = strip_comment(line);
        parse_line(&mut builder, content).map_err(|err| match err {
            LineError::Kind(kind) => Error::parse(index, content, kind),
            LineError::Circuit(err) => err,
        })?;
    }
    builder.finish()
}

impl FromStr for Circuit {
    type Err = Error;

    #[inline]
    fn from_str(text: &str) -> Result<Self> {
        parse(text)
    }
}

/// Line Failure
///
/// Parse errors only know about the line once they reach [`parse`], while builder errors are
/// already complete.
enum LineError {
    /// Parse Failure Kind
    Kind(ParseErrorKind),

    /// Complete Circuit Error
    Circuit(Error),
}

impl From<ParseErrorKind> for LineError {
    #[inline]
    fn from(kind: ParseErrorKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<Error> for LineError {
    #[inline]
    fn from(err: Error) -> Self {
        Self::Circuit(err)
    }
}

/// Returns `line` without its comment.
#[inline]
pub(crate) fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or_default()
}

/// Parses one comment-free line into `builder`.
fn parse_line(builder: &mut CircuitBuilder, line: &str) -> core::result::Result<(), LineError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None if line.is_empty() => return Ok(()),
        None => (line, ""),
    };
    match verb {
        "total" => builder.declare_total(parse_integer(rest)?)?,
        "input" => builder.push(Gate::Input {
            output: parse_integer(rest)?,
        })?,
        "output" => builder.declare_output(parse_integer(rest)?),
        _ => {
            let (inputs, outputs) = parse_io_list(rest)?;
            builder.push(parse_gate(verb, &inputs, &outputs)?)?;
        }
    }
    Ok(())
}

/// Parses a decimal integer that must be the only token of `text`.
#[inline]
pub(crate) fn parse_integer(text: &str) -> core::result::Result<usize, ParseErrorKind> {
    if text.is_empty() || text.contains(char::is_whitespace) {
        return Err(ParseErrorKind::Malformed);
    }
    text.parse()
        .map_err(|_| ParseErrorKind::InvalidInteger(text.to_owned()))
}

/// Parses `in <k> <ids> out <m> <ids>`, checking the counts against the listed wires.
fn parse_io_list(text: &str) -> core::result::Result<(Vec<Wire>, Vec<Wire>), ParseErrorKind> {
    let rest = text
        .strip_prefix("in")
        .ok_or(ParseErrorKind::Malformed)?;
    let (inputs, rest) = parse_wire_list(rest)?;
    let rest = rest
        .trim_start()
        .strip_prefix("out")
        .ok_or(ParseErrorKind::Malformed)?;
    let (outputs, rest) = parse_wire_list(rest)?;
    if !rest.trim().is_empty() {
        return Err(ParseErrorKind::Malformed);
    }
    Ok((inputs, outputs))
}

/// Parses `<count> <id ..>` from the start of `text`, returning the wires and the remaining text.
fn parse_wire_list(text: &str) -> core::result::Result<(Vec<Wire>, &str), ParseErrorKind> {
    if !text.starts_with(char::is_whitespace) {
        return Err(ParseErrorKind::Malformed);
    }
    let (count, rest) = text.split_once('<').ok_or(ParseErrorKind::Malformed)?;
    let declared = parse_integer(count.trim())?;
    let (list, rest) = rest.split_once('>').ok_or(ParseErrorKind::Malformed)?;
    let wires = list
        .split_whitespace()
        .map(parse_integer)
        .collect::<core::result::Result<Vec<_>, _>>()?;
    if wires.len() != declared {
        return Err(ParseErrorKind::CountMismatch {
            declared,
            listed: wires.len(),
        });
    }
    Ok((wires, rest))
}

/// Checks that `operator` received exactly `expected_inputs` inputs and `expected_outputs`
/// outputs.
#[inline]
fn check_arity(
    operator: &str,
    inputs: &[Wire],
    outputs: &[Wire],
    expected_inputs: usize,
    expected_outputs: usize,
) -> core::result::Result<(), ParseErrorKind> {
    if inputs.len() == expected_inputs && outputs.len() == expected_outputs {
        Ok(())
    } else {
        Err(ParseErrorKind::Arity {
            operator: operator.to_owned(),
            expected_inputs,
            expected_outputs,
            inputs: inputs.len(),
            outputs: outputs.len(),
        })
    }
}

/// Parses the signed hexadecimal constant at the end of a `const-*` operator.
#[inline]
fn parse_constant(suffix: &str) -> core::result::Result<BigInt, ParseErrorKind> {
    let (negative, digits) = match suffix.strip_prefix("neg-") {
        Some(digits) => (true, digits),
        None => (false, suffix),
    };
    let magnitude = BigInt::from(
        parse_hex(digits).ok_or_else(|| ParseErrorKind::InvalidInteger(suffix.to_owned()))?,
    );
    Ok(if negative { -magnitude } else { magnitude })
}

/// Builds the gate for `operator` over `inputs` and `outputs`.
fn parse_gate(
    operator: &str,
    inputs: &[Wire],
    outputs: &[Wire],
) -> core::result::Result<Gate, ParseErrorKind> {
    match operator {
        "add" | "mul" | "div" => {
            check_arity(operator, inputs, outputs, 2, 1)?;
            let (inputs, output) = ([inputs[0], inputs[1]], outputs[0]);
            Ok(match operator {
                "add" => Gate::Add { inputs, output },
                "mul" => Gate::Mul { inputs, output },
                _ => Gate::Div { inputs, output },
            })
        }
        "zerop" => {
            check_arity(operator, inputs, outputs, 1, 2)?;
            Ok(Gate::Zerop {
                input: inputs[0],
                outputs: [outputs[0], outputs[1]],
            })
        }
        "split" => Err(ParseErrorKind::UnsupportedOperator(operator.to_owned())),
        _ => {
            if let Some(suffix) = operator.strip_prefix("const-mul-") {
                check_arity(operator, inputs, outputs, 1, 1)?;
                Ok(Gate::ConstMul {
                    constant: parse_constant(suffix)?,
                    input: inputs[0],
                    output: outputs[0],
                })
            } else if let Some(suffix) = operator.strip_prefix("const-div-") {
                check_arity(operator, inputs, outputs, 1, 1)?;
                Ok(Gate::ConstDiv {
                    constant: parse_constant(suffix)?,
                    input: inputs[0],
                    output: outputs[0],
                })
            } else {
                Err(ParseErrorKind::UnknownOperator(operator.to_owned()))
            }
        }
    }
}

/// Input Assignment
///
/// The externally supplied values of a circuit's [`Input`](Gate::Input) wires. The same line
/// format is used by the wire value dump, so this type also reads those back.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InputAssignment<F> {
    /// Assigned Values
    values: BTreeMap<Wire, F>,
}

impl<F> InputAssignment<F> {
    /// Builds a new empty [`InputAssignment`].
    #[inline]
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Assigns `value` to `wire`, returning the previous value if there was one.
    #[inline]
    pub fn insert(&mut self, wire: Wire, value: F) -> Option<F> {
        self.values.insert(wire, value)
    }

    /// Returns the value assigned to `wire`.
    #[inline]
    pub fn get(&self, wire: Wire) -> Option<&F> {
        self.values.get(&wire)
    }

    /// Returns `true` if `wire` has a value.
    #[inline]
    pub fn contains(&self, wire: Wire) -> bool {
        self.values.contains_key(&wire)
    }

    /// Returns the number of assigned wires.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is assigned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the assigned wires in ascending order.
    #[inline]
    pub fn wires(&self) -> impl Iterator<Item = Wire> + '_ {
        self.values.keys().copied()
    }

    /// Returns the underlying wire to value map.
    #[inline]
    pub fn into_inner(self) -> BTreeMap<Wire, F> {
        self.values
    }
}

impl<F> InputAssignment<F>
where
    F: Field,
{
    /// Parses `<wire_id> <hex_value>` lines from `text`. A wire assigned twice is an error.
    #[inline]
    pub fn parse(text: &str) -> Result<Self> {
        let mut values = BTreeMap::new();
        for (index, line) in text.lines().enumerate() {
            let content = strip_comment(line);
            let mut tokens = content.split_whitespace();
            let (wire, value) = match (tokens.next(), tokens.next(), tokens.next()) {
                (None, _, _) => continue,
                (Some(wire), Some(value), None) => (wire, value),
                _ => return Err(Error::parse(index, content, ParseErrorKind::Malformed)),
            };
            let wire =
                parse_integer(wire).map_err(|kind| Error::parse(index, content, kind))?;
            let value = F::from_hex(value).ok_or_else(|| {
                Error::parse(
                    index,
                    content,
                    ParseErrorKind::InvalidInteger(value.to_owned()),
                )
            })?;
            match values.entry(wire) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                btree_map::Entry::Occupied(_) => {
                    return Err(Error::parse(
                        index,
                        content,
                        ParseErrorKind::DuplicateAssignment(wire),
                    ))
                }
            }
        }
        debug!(assigned = values.len(), "parsed input assignment");
        Ok(Self { values })
    }

    /// Drops assignments to wires that are not inputs of `circuit`, logging each one.
    #[inline]
    pub fn retain_inputs(&mut self, circuit: &Circuit) {
        self.values.retain(|wire, _| {
            let is_input = circuit.gate(*wire).map_or(false, Gate::is_input);
            if !is_input {
                warn!(wire, "ignoring value assigned to a wire that is not an input");
            }
            is_input
        });
    }
}

impl<F> FromIterator<(Wire, F)> for InputAssignment<F> {
    #[inline]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (Wire, F)>,
    {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
