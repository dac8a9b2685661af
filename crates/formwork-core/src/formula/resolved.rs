use crate::{
    formula::{
        helpers::{Helper, lookup},
        model::{BinaryOp, Expr, UnaryOp},
    },
    types::FieldId,
    value::Value,
};
use thiserror::Error as ThisError;

///
/// CompileError
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CompileError {
    #[error("helper `{name}` takes {expected} argument(s), found {found}")]
    HelperArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown helper `{name}`")]
    UnknownHelper { name: String },

    #[error("unknown variable `{name}`; formulas may only reference declared parents")]
    UnknownVariable { name: String },
}

///
/// ResolvedExpr
///
/// Slot-resolved formula tree for runtime evaluation. Parent references
/// are resolved once at compile time; evaluation is slot-only.
///

#[derive(Clone, Debug)]
pub(crate) enum ResolvedExpr {
    Literal(Value),
    Slot(usize),
    Unary {
        op: UnaryOp,
        expr: Box<Self>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Self>,
        rhs: Box<Self>,
    },
    Conditional {
        cond: Box<Self>,
        then_branch: Box<Self>,
        else_branch: Box<Self>,
    },
    Call {
        helper: &'static Helper,
        args: Vec<Self>,
    },
}

// Resolve variable names to parent slots and helper names to registry
// entries, rejecting anything the schema did not declare.
pub(crate) fn resolve(expr: &Expr, parents: &[FieldId]) -> Result<ResolvedExpr, CompileError> {
    match expr {
        Expr::Literal(value) => Ok(ResolvedExpr::Literal(value.clone())),

        Expr::Var(name) => parents
            .iter()
            .position(|p| name.eq_ignore_ascii_case(&p.to_string()))
            .map(ResolvedExpr::Slot)
            .ok_or_else(|| CompileError::UnknownVariable { name: name.clone() }),

        Expr::Unary { op, expr } => Ok(ResolvedExpr::Unary {
            op: *op,
            expr: Box::new(resolve(expr, parents)?),
        }),

        Expr::Binary { op, lhs, rhs } => Ok(ResolvedExpr::Binary {
            op: *op,
            lhs: Box::new(resolve(lhs, parents)?),
            rhs: Box::new(resolve(rhs, parents)?),
        }),

        Expr::Conditional {
            cond,
            then_branch,
            else_branch,
        } => Ok(ResolvedExpr::Conditional {
            cond: Box::new(resolve(cond, parents)?),
            then_branch: Box::new(resolve(then_branch, parents)?),
            else_branch: Box::new(resolve(else_branch, parents)?),
        }),

        Expr::Call { helper, args } => {
            let entry = lookup(helper).ok_or_else(|| CompileError::UnknownHelper {
                name: helper.clone(),
            })?;

            if args.len() != entry.arity {
                return Err(CompileError::HelperArity {
                    name: helper.clone(),
                    expected: entry.arity,
                    found: args.len(),
                });
            }

            let args = args
                .iter()
                .map(|arg| resolve(arg, parents))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ResolvedExpr::Call { helper: entry, args })
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parse;

    #[test]
    fn parents_resolve_to_their_slot() {
        let parents = [FieldId::generate(), FieldId::generate()];
        let expr = parse(&format!("{} + {}", parents[1], parents[0])).unwrap();

        let resolved = resolve(&expr, &parents).unwrap();
        let ResolvedExpr::Binary { lhs, rhs, .. } = resolved else {
            panic!("expected a binary expression");
        };
        assert!(matches!(*lhs, ResolvedExpr::Slot(1)));
        assert!(matches!(*rhs, ResolvedExpr::Slot(0)));
    }

    #[test]
    fn undeclared_variables_fail_to_compile() {
        let expr = parse("mystery + 1").unwrap();
        let err = resolve(&expr, &[]).unwrap_err();

        assert_eq!(
            err,
            CompileError::UnknownVariable {
                name: "mystery".into()
            }
        );
    }

    #[test]
    fn unknown_helpers_fail_to_compile() {
        let expr = parse("launchMissiles()").unwrap();
        let err = resolve(&expr, &[]).unwrap_err();

        assert!(matches!(err, CompileError::UnknownHelper { .. }));
    }

    #[test]
    fn helper_arity_is_enforced() {
        let expr = parse("calcAgeISO()").unwrap();
        let err = resolve(&expr, &[]).unwrap_err();

        assert_eq!(
            err,
            CompileError::HelperArity {
                name: "calcAgeISO".into(),
                expected: 1,
                found: 0,
            }
        );
    }
}
