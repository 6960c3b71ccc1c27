//! Compilation Errors

use crate::gate::Wire;

/// Compilation Result
pub type Result<T = ()> = core::result::Result<T, Error>;

/// Compilation Error
///
/// Every error is fatal to the compilation run that produced it. The variants name the offending
/// wire or source line so the message is enough to locate the problem in the input files.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// Malformed Source Line
    #[error("line {line}: {kind}: `{content}`")]
    Parse {
        /// One-based line number
        line: usize,

        /// Line content with the comment stripped
        content: String,

        /// Failure Kind
        kind: ParseErrorKind,
    },

    /// A wire was produced by more than one gate.
    #[error("wire {wire} is assigned more than once")]
    DuplicateWireAssignment {
        /// Offending Wire
        wire: Wire,
    },

    /// A declared output or a wire below the total has no producing gate.
    #[error("wire {wire} is not populated")]
    MissingWire {
        /// Missing Wire
        wire: Wire,
    },

    /// The circuit never declared its `total` wire count.
    #[error("circuit does not declare a total wire count")]
    UndeclaredTotal,

    /// The largest produced wire does not match the declared total.
    #[error("circuit declares {declared} wires but assigns {actual}")]
    WireCountMismatch {
        /// Declared Total
        declared: usize,

        /// Largest assigned wire plus one, saturating at `usize::MAX`
        actual: usize,
    },

    /// A converted circuit declares more wires than the reader materializes.
    #[error("converted circuit declares {declared} wires, more than the limit of {limit}")]
    TooManyWires {
        /// Declared Total
        declared: usize,

        /// Accepted Maximum
        limit: usize,
    },

    /// An `input` wire has no value in the input assignment.
    #[error("no value assigned to input wire {wire}")]
    UnassignedInput {
        /// Unassigned Input Wire
        wire: Wire,
    },

    /// A gate reads a wire that is not strictly smaller than its own output.
    #[error("circuit does not flow monotonically: dependencies {dependencies:?} come after wire {wire}")]
    NonMonotonicDependency {
        /// Gate Output Wire
        wire: Wire,

        /// Dependencies of the Gate
        dependencies: Vec<Wire>,
    },

    /// A division gate met a zero divisor.
    #[error("division by zero while computing wire {wire}")]
    DivisionByZero {
        /// Gate Output Wire
        wire: Wire,
    },

    /// The value table has a gap, which means the evaluator skipped a wire.
    #[error("value table is missing wire {wire}")]
    IncompleteWireTable {
        /// First Missing Wire
        wire: Wire,
    },
}

impl Error {
    /// Builds a [`Error::Parse`] for the zero-based `index` line with `content`.
    #[inline]
    pub fn parse(index: usize, content: &str, kind: ParseErrorKind) -> Self {
        Self::Parse {
            line: index + 1,
            content: content.trim().to_owned(),
            kind,
        }
    }
}

/// Parse Error Kind
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// The line does not follow any of the instruction shapes.
    #[error("malformed instruction")]
    Malformed,

    /// An integer or hexadecimal literal failed to parse.
    #[error("invalid integer `{0}`")]
    InvalidInteger(String),

    /// `total` appeared more than once.
    #[error("duplicate total declaration")]
    DuplicateDeclaration,

    /// The operator is not part of the circuit vocabulary.
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    /// The operator is known but deliberately not supported.
    #[error("unsupported operator `{0}`")]
    UnsupportedOperator(String),

    /// An `in`/`out` count disagrees with the number of listed wires.
    #[error("list declares {declared} wires but names {listed}")]
    CountMismatch {
        /// Declared Count
        declared: usize,

        /// Listed Wires
        listed: usize,
    },

    /// The operator was given the wrong number of inputs or outputs.
    #[error("`{operator}` takes {expected_inputs} inputs and {expected_outputs} outputs, found {inputs} and {outputs}")]
    Arity {
        /// Operator Name
        operator: String,

        /// Expected Input Count
        expected_inputs: usize,

        /// Expected Output Count
        expected_outputs: usize,

        /// Listed Input Count
        inputs: usize,

        /// Listed Output Count
        outputs: usize,
    },

    /// A wire received more than one value in an assignment file.
    #[error("wire {0} is assigned more than once")]
    DuplicateAssignment(Wire),
}
