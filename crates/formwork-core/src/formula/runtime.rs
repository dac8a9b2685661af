use crate::{
    formula::{
        FormulaError,
        model::{BinaryOp, UnaryOp},
        parse::parse,
        resolved::{ResolvedExpr, resolve},
    },
    types::{Date, FieldId},
    value::Value,
};
use std::cmp::Ordering;
use thiserror::Error as ThisError;

///
/// EvalError
///
/// Runtime evaluation failures. These never escape to users as errors;
/// the form runtime maps them to an unset value.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("operator `{op}` cannot be applied to its operands")]
    Type { op: &'static str },
}

///
/// EvalContext
///
/// Ambient inputs a formula may read beyond its parents. Today that is
/// only the evaluation date, pinned explicitly so tests are deterministic.
///

#[derive(Clone, Copy, Debug)]
pub struct EvalContext {
    today: Date,
}

impl EvalContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            today: Date::today(),
        }
    }

    #[must_use]
    pub const fn pinned(today: Date) -> Self {
        Self { today }
    }

    #[must_use]
    pub const fn today(&self) -> Date {
        self.today
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

///
/// FormulaProgram
///
/// One derived field's formula, compiled to a slot-resolved form.
/// Compilation happens once per runtime; evaluation is allocation-light
/// and total for the caller.
///

#[derive(Clone, Debug)]
pub struct FormulaProgram {
    resolved: ResolvedExpr,
}

impl FormulaProgram {
    /// Compile formula source against the declared parent list.
    pub fn compile(source: &str, parents: &[FieldId]) -> Result<Self, FormulaError> {
        let expr = parse(source)?;
        let resolved = resolve(&expr, parents)?;

        Ok(Self { resolved })
    }

    /// Evaluate against the parents' current values, one slot per declared
    /// parent in declaration order.
    pub fn eval(&self, ctx: &EvalContext, parents: &[Value]) -> Result<Value, EvalError> {
        eval_resolved(&self.resolved, ctx, parents)
    }
}

// Truthiness for conditions and logical operators, matching how the
// original's host language read form values: unset, empty text, zero and
// NaN are false; everything else is true.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Text(s) => !s.is_empty(),
        Value::List(_) => true,
    }
}

fn eval_resolved(
    expr: &ResolvedExpr,
    ctx: &EvalContext,
    parents: &[Value],
) -> Result<Value, EvalError> {
    match expr {
        ResolvedExpr::Literal(value) => Ok(value.clone()),

        // missing slots read as unset rather than failing hard
        ResolvedExpr::Slot(i) => Ok(parents.get(*i).cloned().unwrap_or(Value::Null)),

        ResolvedExpr::Unary { op, expr } => {
            let value = eval_resolved(expr, ctx, parents)?;
            eval_unary(*op, &value)
        }

        // logical operators short-circuit and yield the deciding operand,
        // so `a || fallback` works as a default
        ResolvedExpr::Binary {
            op: BinaryOp::And,
            lhs,
            rhs,
        } => {
            let lhs = eval_resolved(lhs, ctx, parents)?;
            if is_truthy(&lhs) {
                eval_resolved(rhs, ctx, parents)
            } else {
                Ok(lhs)
            }
        }
        ResolvedExpr::Binary {
            op: BinaryOp::Or,
            lhs,
            rhs,
        } => {
            let lhs = eval_resolved(lhs, ctx, parents)?;
            if is_truthy(&lhs) {
                Ok(lhs)
            } else {
                eval_resolved(rhs, ctx, parents)
            }
        }

        ResolvedExpr::Binary { op, lhs, rhs } => {
            let lhs = eval_resolved(lhs, ctx, parents)?;
            let rhs = eval_resolved(rhs, ctx, parents)?;
            eval_binary(*op, &lhs, &rhs)
        }

        ResolvedExpr::Conditional {
            cond,
            then_branch,
            else_branch,
        } => {
            let cond = eval_resolved(cond, ctx, parents)?;
            if is_truthy(&cond) {
                eval_resolved(then_branch, ctx, parents)
            } else {
                eval_resolved(else_branch, ctx, parents)
            }
        }

        ResolvedExpr::Call { helper, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_resolved(arg, ctx, parents)?);
            }

            (helper.run)(ctx, &values)
        }
    }
}

fn eval_unary(op: UnaryOp, value: &Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Neg => value
            .as_number()
            .map(|n| Value::Number(-n))
            .ok_or(EvalError::Type { op: "-" }),
        UnaryOp::Not => Ok(Value::Bool(!is_truthy(value))),
    }
}

fn eval_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    match op {
        // a text operand turns `+` into concatenation
        BinaryOp::Add => {
            if lhs.is_text() || rhs.is_text() {
                Ok(Value::Text(format!("{lhs}{rhs}")))
            } else {
                let (a, b) = numeric_pair(lhs, rhs, op.symbol())?;
                Ok(Value::Number(a + b))
            }
        }
        BinaryOp::Sub | BinaryOp::Mul => {
            let (a, b) = numeric_pair(lhs, rhs, op.symbol())?;
            Ok(Value::Number(match op {
                BinaryOp::Sub => a - b,
                _ => a * b,
            }))
        }
        BinaryOp::Div | BinaryOp::Rem => {
            let (a, b) = numeric_pair(lhs, rhs, op.symbol())?;
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Number(match op {
                BinaryOp::Div => a / b,
                _ => a % b,
            }))
        }

        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let ordering = compare_order(lhs, rhs, op.symbol())?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }

        BinaryOp::Eq => Ok(Value::Bool(loose_eq(lhs, rhs))),
        BinaryOp::Ne => Ok(Value::Bool(!loose_eq(lhs, rhs))),

        BinaryOp::And | BinaryOp::Or => {
            unreachable!("short-circuit operators are evaluated by the caller")
        }
    }
}

fn numeric_pair(lhs: &Value, rhs: &Value, op: &'static str) -> Result<(f64, f64), EvalError> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(EvalError::Type { op }),
    }
}

// Numeric compare when both sides widen to numbers, lexicographic when
// both are text; anything else has no ordering.
fn compare_order(lhs: &Value, rhs: &Value, op: &'static str) -> Result<Ordering, EvalError> {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return a.partial_cmp(&b).ok_or(EvalError::Type { op });
    }

    match (lhs.as_text(), rhs.as_text()) {
        (Some(a), Some(b)) => Ok(a.cmp(b)),
        _ => Err(EvalError::Type { op }),
    }
}

// Equality widens numeric text, otherwise compares structurally.
fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return a == b;
    }

    lhs == rhs
}

///
/// TESTS
///
