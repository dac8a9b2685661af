//! Module: formula
//! Responsibility: the derived-field expression language — lexing, parsing,
//! slot resolution against declared parents, and evaluation.
//! Does not own: when formulas run or where results land (runtime's job).

mod helpers;
mod model;
mod parse;
mod resolved;
mod runtime;
mod token;

use thiserror::Error as ThisError;

pub use model::{BinaryOp, Expr, UnaryOp};
pub use parse::{ParseError, parse};
pub use resolved::CompileError;
pub use runtime::{EvalContext, EvalError, FormulaProgram};

///
/// FormulaError
/// Umbrella over every way a formula can fail. The form runtime treats any
/// of these as "no value"; callers that want the detail can keep it.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum FormulaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
