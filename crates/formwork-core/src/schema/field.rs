use crate::{types::FieldId, value::Value};
use serde::{Deserialize, Serialize};

///
/// FieldType
///
/// The input widget a field renders as. Select, radio and checkbox fields
/// draw their choices from `Field::options`; checkbox is the only
/// many-valued type.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
}

impl FieldType {
    /// True for types whose values come from the field's option list.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio | Self::Checkbox)
    }

    /// Seed value used when a field declares no explicit default.
    #[must_use]
    pub const fn empty_value(self) -> Value {
        match self {
            Self::Checkbox => Value::List(Vec::new()),
            _ => Value::Text(String::new()),
        }
    }
}

///
/// ValidationRule
///
/// Per-field rule set; every member is optional and rules apply in a fixed
/// precedence (see `validate::validate_rule`). Length rules count Unicode
/// scalar values.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationRule {
    pub required: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub email: bool,
    pub password_rule: bool,
}

impl ValidationRule {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            email: false,
            password_rule: false,
        }
    }

    #[must_use]
    pub const fn required() -> Self {
        let mut rule = Self::none();
        rule.required = true;

        rule
    }

    #[must_use]
    pub const fn email(mut self) -> Self {
        self.email = true;
        self
    }

    #[must_use]
    pub const fn password(mut self) -> Self {
        self.password_rule = true;
        self
    }

    #[must_use]
    pub const fn min_length(mut self, min: u32) -> Self {
        self.min_length = Some(min);
        self
    }

    #[must_use]
    pub const fn max_length(mut self, max: u32) -> Self {
        self.max_length = Some(max);
        self
    }
}

///
/// Field
///
/// One input definition within a form. `order` is 1-based and kept dense by
/// the builder; `id` is immutable once assigned.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    pub label: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
    pub required: bool,

    #[serde(default)]
    pub default_value: Value,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub validation: ValidationRule,

    // derived field properties
    #[serde(default)]
    pub derived: bool,
    #[serde(default)]
    pub parents: Vec<FieldId>,
    #[serde(default)]
    pub formula: String,

    pub order: u32,
}

impl Field {
    /// True when this field computes its value instead of taking input.
    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.derived && !self.formula.is_empty()
    }

    /// The value a fresh runtime seeds for this field: the declared default,
    /// or the type's empty shape when none was set.
    #[must_use]
    pub fn seed_value(&self) -> Value {
        if self.default_value.is_null() {
            self.ty.empty_value()
        } else {
            self.default_value.clone()
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FieldType::Textarea).unwrap(),
            "\"textarea\""
        );
        let ty: FieldType = serde_json::from_str("\"checkbox\"").unwrap();
        assert_eq!(ty, FieldType::Checkbox);
    }

    #[test]
    fn checkbox_seeds_an_empty_list() {
        assert_eq!(FieldType::Checkbox.empty_value(), Value::List(vec![]));
        assert_eq!(FieldType::Date.empty_value(), Value::Text(String::new()));
    }

    #[test]
    fn declared_default_wins_over_type_default() {
        let field = Field {
            id: FieldId::generate(),
            label: "Country".into(),
            ty: FieldType::Select,
            required: false,
            default_value: Value::Text("NZ".into()),
            options: vec!["NZ".into(), "AU".into()],
            validation: ValidationRule::none(),
            derived: false,
            parents: vec![],
            formula: String::new(),
            order: 1,
        };

        assert_eq!(field.seed_value(), Value::Text("NZ".into()));
    }

    #[test]
    fn validation_rule_keys_are_camel_case() {
        let rule = ValidationRule::required().min_length(2).password();
        let json = serde_json::to_value(&rule).unwrap();

        assert_eq!(json["minLength"], 2);
        assert_eq!(json["passwordRule"], true);
        assert!(json["maxLength"].is_null());
    }

    #[test]
    fn rule_deserializes_from_sparse_json() {
        let rule: ValidationRule = serde_json::from_str(r#"{"email":true}"#).unwrap();
        assert!(rule.email);
        assert!(!rule.required);
        assert_eq!(rule.min_length, None);
    }
}
