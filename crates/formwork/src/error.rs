use derive_more::Display;
use formwork_core::{
    formula::{CompileError, EvalError, FormulaError, ParseError},
    store::StoreError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable class + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<FormulaError> for Error {
    fn from(err: FormulaError) -> Self {
        let kind = match &err {
            FormulaError::Parse(_) => ErrorKind::Formula(FormulaErrorKind::Parse),
            FormulaError::Compile(_) => ErrorKind::Formula(FormulaErrorKind::Compile),
            FormulaError::Eval(_) => ErrorKind::Formula(FormulaErrorKind::Eval),
        };

        Self::new(kind, ErrorOrigin::Formula, err.to_string())
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        FormulaError::from(err).into()
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        FormulaError::from(err).into()
    }
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        FormulaError::from(err).into()
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::new(ErrorKind::Store, ErrorOrigin::Store, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for embedding callers.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// A formula failed somewhere between source text and a value.
    Formula(FormulaErrorKind),

    /// The caller cannot remediate this.
    Internal,

    /// The schema itself is inconsistent.
    Schema,

    /// Persistence failed.
    Store,
}

///
/// FormulaErrorKind
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FormulaErrorKind {
    /// Parsed, but references something the schema does not declare.
    Compile,

    /// Evaluation failed at runtime (type error, division by zero).
    Eval,

    /// The source text is not a well-formed expression.
    Parse,
}

///
/// ErrorOrigin
/// Which part of the engine raised the error.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Builder,
    Formula,
    Runtime,
    Store,
}

///
/// TESTS
///
