use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// Value
/// the runtime value of a single field
///
/// Null → the field currently has no value (unset, or a failed derivation).
///
/// The JSON shape is untagged so persisted defaults and runtime dumps read
/// as plain JSON scalars/arrays.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Ordered list of values. Used by checkbox fields, which hold the
    /// selected options in selection order.
    List(Vec<Self>),
}

impl Value {
    ///
    /// CONSTRUCTION
    ///

    /// Build a `Value::List` from owned items.
    pub fn from_list<T>(items: Vec<T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    ///
    /// TYPES
    ///

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        if let Self::List(xs) = self {
            Some(xs.as_slice())
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Numeric view of this value.
    ///
    /// `Text` widens when it parses as a float, since form inputs deliver
    /// numbers as text. Everything else is non-numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    ///
    /// EMPTY
    ///

    /// Emptiness as the required-rule sees it: unset, blank text, or an
    /// empty list. `Bool` and `Number` always count as present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::List(xs) => xs.is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Length in Unicode scalar values for text, element count for lists.
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Text(s) => Some(s.chars().count()),
            Self::List(xs) => Some(xs.len()),
            _ => None,
        }
    }
}

// Numbers render without a trailing `.0` when they are whole, so derived
// integer results (ages, counts) display the way users expect.
impl Display for Value {
    #[expect(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Self::Text(s) => write!(f, "{s}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool   => Bool,
    f64    => Number,
    &str   => Text,
    String => Text,
}

impl From<Vec<Self>> for Value {
    fn from(vec: Vec<Self>) -> Self {
        Self::List(vec)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness_covers_null_blank_text_and_empty_list() {
        assert!(Value::Null.is_empty());
        assert!(Value::Text(String::new()).is_empty());
        assert!(Value::List(vec![]).is_empty());

        assert!(!Value::Text("x".into()).is_empty());
        assert!(!Value::Bool(false).is_empty());
        assert!(!Value::Number(0.0).is_empty());
    }

    #[test]
    fn numeric_text_widens() {
        assert_eq!(Value::Text("42".into()).as_number(), Some(42.0));
        assert_eq!(Value::Text(" 3.5 ".into()).as_number(), Some(3.5));
        assert_eq!(Value::Text("abc".into()).as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(Value::Number(25.0).to_string(), "25");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn untagged_json_round_trip() {
        let value = Value::List(vec![
            Value::Text("red".into()),
            Value::Number(2.0),
            Value::Bool(true),
            Value::Null,
        ]);

        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"["red",2.0,true,null]"#);

        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        assert_eq!(Value::Text("héllo".into()).length(), Some(5));
        assert_eq!(Value::from_list(vec!["a", "b"]).length(), Some(2));
        assert_eq!(Value::Number(1.0).length(), None);
    }
}
