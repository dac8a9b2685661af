use crate::{
    formula::runtime::{EvalContext, EvalError},
    types::Date,
    value::Value,
};
use std::fmt::{self, Debug};

pub(crate) type HelperFn = fn(&EvalContext, &[Value]) -> Result<Value, EvalError>;

///
/// Helper
///
/// One entry in the fixed helper registry. Formulas can call registry
/// members and nothing else; there is no way to reach arbitrary code from
/// a formula.
///

pub struct Helper {
    pub name: &'static str,
    pub arity: usize,
    pub(crate) run: HelperFn,
}

impl Debug for Helper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Helper({})", self.name)
    }
}

pub(crate) const REGISTRY: &[Helper] = &[
    Helper {
        name: "calcAgeISO",
        arity: 1,
        run: calc_age_iso,
    },
    Helper {
        name: "len",
        arity: 1,
        run: length,
    },
    Helper {
        name: "num",
        arity: 1,
        run: to_number,
    },
];

pub(crate) fn lookup(name: &str) -> Option<&'static Helper> {
    REGISTRY.iter().find(|h| h.name == name)
}

// Whole years from an ISO `YYYY-MM-DD` date to the evaluation date.
// Anything that is not parsable date text yields null, not an error.
fn calc_age_iso(ctx: &EvalContext, args: &[Value]) -> Result<Value, EvalError> {
    let Some(text) = args.first().and_then(Value::as_text) else {
        return Ok(Value::Null);
    };
    let Some(date) = Date::parse(text.trim()) else {
        return Ok(Value::Null);
    };

    Ok(Value::Number(f64::from(date.years_until(ctx.today()))))
}

// Character count for text, element count for lists, null otherwise.
#[expect(clippy::cast_precision_loss)]
fn length(_: &EvalContext, args: &[Value]) -> Result<Value, EvalError> {
    let length = args.first().and_then(Value::length);

    Ok(length.map_or(Value::Null, |n| Value::Number(n as f64)))
}

// Numeric widening as a formula-visible function; null when not numeric.
fn to_number(_: &EvalContext, args: &[Value]) -> Result<Value, EvalError> {
    let number = args.first().and_then(Value::as_number);

    Ok(number.map_or(Value::Null, Value::Number))
}

///
/// TESTS
///
