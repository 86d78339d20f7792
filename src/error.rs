//! Error types for the PDL model checker
//!
//! Errors are organized by source: each input language and pipeline stage has its own
//! enum with specific variants, and operations that can fail for several reasons expose
//! wrapper enums combining only the errors they can actually produce. Model-construction
//! errors are fatal to that model; query errors abort only the query, which is what lets
//! the interactive loop keep going after a bad formula.

use std::fmt;
use std::io;

// ============================================================================
// Source-Level Error Enums
// ============================================================================

/// Errors produced while lexing or parsing a PDL formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdlParseError {
    /// A character that is not part of the PDL operator alphabet
    InvalidOperator {
        /// The offending character
        text: String,
        /// Byte offset in the input
        position: usize,
    },
    /// A well-formed token in a position the grammar does not allow
    UnexpectedToken {
        /// The token that was found
        found: String,
        /// Byte offset in the input
        position: usize,
        /// What the parser was looking for
        expected: &'static str,
    },
    /// Input ended in the middle of a formula
    UnexpectedEnd {
        /// What the parser was looking for
        expected: &'static str,
    },
}

impl fmt::Display for PdlParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdlParseError::InvalidOperator { text, position } => write!(
                f,
                "Invalid operator '{}' at position {} in PDL formula",
                text, position
            ),
            PdlParseError::UnexpectedToken {
                found,
                position,
                expected,
            } => write!(
                f,
                "Unexpected token '{}' at position {}: expected {}",
                found, position, expected
            ),
            PdlParseError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of formula: expected {}", expected)
            }
        }
    }
}

impl std::error::Error for PdlParseError {}

/// Errors produced while parsing a boolean expression
///
/// Boolean expressions appear as LAW and transition lines in symbolic model files and
/// as `--state` valuations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprParseError {
    /// A character outside the expression alphabet
    InvalidOperator {
        /// The original input string
        input: String,
        /// Byte offset where the unknown character sits
        position: usize,
    },
    /// Failed to parse due to invalid syntax
    InvalidSyntax {
        /// The error message from the parser
        message: String,
        /// The original input string that failed to parse
        input: String,
    },
}

impl fmt::Display for ExprParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprParseError::InvalidOperator { input, position } => write!(
                f,
                "Invalid character/operator at position {} in expression {:?}",
                position, input
            ),
            ExprParseError::InvalidSyntax { message, input } => {
                write!(f, "Failed to parse expression {:?}: {}", input, message)
            }
        }
    }
}

impl std::error::Error for ExprParseError {}

/// Errors that abort model construction
#[derive(Debug)]
pub enum ModelBuildError {
    /// Two programs share a name
    DuplicateProgram {
        /// The repeated program name
        name: String,
    },
    /// A transition matrix is not n x n for the model's n states
    MatrixShape {
        /// Program the matrix belongs to
        name: String,
        /// Number of states in the model
        expected: usize,
        /// Row count actually provided
        rows: usize,
        /// Column count of the offending row
        columns: usize,
    },
    /// A proposition's valuation vector does not have one entry per state
    ValuationLength {
        /// Proposition the vector belongs to
        name: String,
        /// Number of states in the model
        expected: usize,
        /// Entries actually provided
        actual: usize,
    },
    /// A law or transition expression references a variable that was never declared
    UndeclaredVariable {
        /// The unknown variable name
        name: String,
    },
    /// A model file does not follow the section structure
    Format {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// A law or transition expression failed to parse
    Expr(ExprParseError),
}

impl fmt::Display for ModelBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelBuildError::DuplicateProgram { name } => write!(
                f,
                "The program name '{}' is used at least twice, while program names should be unique",
                name
            ),
            ModelBuildError::MatrixShape {
                name,
                expected,
                rows,
                columns,
            } => write!(
                f,
                "Program '{}' needs a {}x{} matrix, got {} rows of {} columns",
                name, expected, expected, rows, columns
            ),
            ModelBuildError::ValuationLength {
                name,
                expected,
                actual,
            } => write!(
                f,
                "Proposition '{}' has {} valuations for {} states",
                name, actual, expected
            ),
            ModelBuildError::UndeclaredVariable { name } => {
                write!(f, "Variable '{}' is not declared in the PROPS section", name)
            }
            ModelBuildError::Format { line, message } => {
                write!(f, "Malformed model file at line {}: {}", line, message)
            }
            ModelBuildError::Expr(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ModelBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelBuildError::Expr(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExprParseError> for ModelBuildError {
    fn from(err: ExprParseError) -> Self {
        ModelBuildError::Expr(err)
    }
}

/// Errors raised while evaluating a formula against a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The formula references a proposition the model does not declare
    UnknownSymbol {
        /// The unknown proposition name
        name: String,
    },
    /// The formula references a program the model does not define
    UnknownProgram {
        /// The unknown program name
        name: String,
    },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnknownSymbol { name } => {
                write!(f, "Expected formula symbol, got unknown: {}", name)
            }
            EvalError::UnknownProgram { name } => {
                write!(f, "Expected program symbol, got unknown: {}", name)
            }
        }
    }
}

impl std::error::Error for EvalError {}

// ============================================================================
// Operation-Level Error Enums
// ============================================================================

/// Errors that can occur when reading a model from a file
///
/// Returned by `Model::from_explicit_file` and `Model::from_symbolic_file`.
#[derive(Debug)]
pub enum ModelReadError {
    /// The file was read but the model could not be built from it
    Build(ModelBuildError),
    /// IO error while reading
    Io(io::Error),
}

impl fmt::Display for ModelReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelReadError::Build(e) => write!(f, "{}", e),
            ModelReadError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ModelReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelReadError::Build(e) => Some(e),
            ModelReadError::Io(e) => Some(e),
        }
    }
}

impl From<ModelBuildError> for ModelReadError {
    fn from(err: ModelBuildError) -> Self {
        ModelReadError::Build(err)
    }
}

impl From<io::Error> for ModelReadError {
    fn from(err: io::Error) -> Self {
        ModelReadError::Io(err)
    }
}

/// Errors that can occur while answering a query
///
/// Returned by the `check*` family. These never invalidate the model: the caller can
/// recover and issue the next query.
#[derive(Debug)]
pub enum CheckError {
    /// Formula evaluation failed
    Eval(EvalError),
    /// A state valuation expression failed to parse
    Expr(ExprParseError),
    /// A state valuation references an undeclared variable
    UndeclaredVariable {
        /// The unknown variable name
        name: String,
    },
    /// The state valuation does not describe a state of the model
    StateNotInModel,
    /// A truth-vector query was issued against a model without an explicit state list
    NoStateList,
    /// IO error while dumping a result
    Io(io::Error),
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Eval(e) => write!(f, "{}", e),
            CheckError::Expr(e) => write!(f, "{}", e),
            CheckError::UndeclaredVariable { name } => {
                write!(f, "Variable '{}' is not declared in the model", name)
            }
            CheckError::StateNotInModel => write!(f, "State not found in model"),
            CheckError::NoStateList => write!(
                f,
                "Truth-vector output is only available for models built from an explicit state list"
            ),
            CheckError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Eval(e) => Some(e),
            CheckError::Expr(e) => Some(e),
            CheckError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EvalError> for CheckError {
    fn from(err: EvalError) -> Self {
        CheckError::Eval(err)
    }
}

impl From<ExprParseError> for CheckError {
    fn from(err: ExprParseError) -> Self {
        CheckError::Expr(err)
    }
}

impl From<io::Error> for CheckError {
    fn from(err: io::Error) -> Self {
        CheckError::Io(err)
    }
}
