use crate::{
    schema::{Field, ValidationRule},
    value::Value,
};
use thiserror::Error as ThisError;

///
/// RuleViolation
///
/// One field's validation outcome. The `Display` text is the user-facing
/// message shown next to the input, so wording is part of the contract.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RuleViolation {
    #[error("This field is required")]
    Required,

    #[error("Invalid email address")]
    Email,

    #[error("Minimum length is {min}")]
    MinLength { min: u32 },

    #[error("Maximum length is {max}")]
    MaxLength { max: u32 },

    #[error("Password must be at least 8 characters and include a number")]
    Password,
}

/// Validate a candidate value against a field's rules.
///
/// Rules apply in a fixed precedence and the first violated rule wins, so
/// at most one message is reported per field. The email, length and
/// password rules only inspect text values; other shapes skip them.
#[must_use]
pub fn validate_rule(rule: &ValidationRule, value: &Value) -> Option<RuleViolation> {
    if rule.required && value.is_empty() {
        return Some(RuleViolation::Required);
    }

    let text = value.as_text();

    if rule.email
        && let Some(s) = text
        && !is_valid_email(s)
    {
        return Some(RuleViolation::Email);
    }

    if let Some(min) = rule.min_length
        && let Some(s) = text
        && char_count(s) < min
    {
        return Some(RuleViolation::MinLength { min });
    }

    if let Some(max) = rule.max_length
        && let Some(s) = text
        && char_count(s) > max
    {
        return Some(RuleViolation::MaxLength { max });
    }

    if rule.password_rule
        && let Some(s) = text
        && !is_strong_password(s)
    {
        return Some(RuleViolation::Password);
    }

    None
}

/// Validate a candidate value against a field definition.
#[must_use]
pub fn validate_field(field: &Field, value: &Value) -> Option<RuleViolation> {
    validate_rule(&field.validation, value)
}

#[expect(clippy::cast_possible_truncation)]
fn char_count(s: &str) -> u32 {
    s.chars().count() as u32
}

// `local@domain.tld` shape: no whitespace, exactly one `@`, non-empty
// local part, and a dot inside the domain with at least one character on
// each side.
fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = s.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

// at least 8 characters and at least one digit
fn is_strong_password(s: &str) -> bool {
    s.chars().count() >= 8 && s.chars().any(|c| c.is_ascii_digit())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.into())
    }

    #[test]
    fn required_rejects_every_empty_shape() {
        let rule = ValidationRule::required();

        assert_eq!(
            validate_rule(&rule, &Value::Null),
            Some(RuleViolation::Required)
        );
        assert_eq!(
            validate_rule(&rule, &text("")),
            Some(RuleViolation::Required)
        );
        assert_eq!(
            validate_rule(&rule, &Value::List(vec![])),
            Some(RuleViolation::Required)
        );

        assert_eq!(validate_rule(&rule, &text("x")), None);
        assert_eq!(
            validate_rule(&rule, &Value::from_list(vec!["a"])),
            None
        );
    }

    #[test]
    fn required_wins_over_every_other_rule() {
        let rule = ValidationRule::required().email();

        assert_eq!(
            validate_rule(&rule, &text("")),
            Some(RuleViolation::Required)
        );
    }

    #[test]
    fn email_accepts_plain_addresses_only() {
        let rule = ValidationRule::none().email();

        assert_eq!(validate_rule(&rule, &text("x@y.com")), None);
        assert_eq!(validate_rule(&rule, &text("a@b.co.nz")), None);

        for bad in ["not-an-email", "a@b", "a@.com", "a@com.", "a b@c.com", "a@b@c.com"] {
            assert_eq!(
                validate_rule(&rule, &text(bad)),
                Some(RuleViolation::Email),
                "should reject {bad}"
            );
        }
    }

    #[test]
    fn length_rules_report_the_bound() {
        let rule = ValidationRule::none().min_length(3).max_length(5);

        assert_eq!(
            validate_rule(&rule, &text("ab")),
            Some(RuleViolation::MinLength { min: 3 })
        );
        assert_eq!(
            validate_rule(&rule, &text("abcdef")),
            Some(RuleViolation::MaxLength { max: 5 })
        );
        assert_eq!(validate_rule(&rule, &text("abcd")), None);

        assert_eq!(
            RuleViolation::MinLength { min: 3 }.to_string(),
            "Minimum length is 3"
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let rule = ValidationRule::none().max_length(4);
        assert_eq!(validate_rule(&rule, &text("héllo")), Some(RuleViolation::MaxLength { max: 4 }));

        let rule = ValidationRule::none().min_length(5);
        assert_eq!(validate_rule(&rule, &text("héllo")), None);
    }

    #[test]
    fn password_needs_length_and_a_digit() {
        let rule = ValidationRule::none().password();

        assert_eq!(
            validate_rule(&rule, &text("short1")),
            Some(RuleViolation::Password)
        );
        assert_eq!(
            validate_rule(&rule, &text("longenough")),
            Some(RuleViolation::Password)
        );
        assert_eq!(validate_rule(&rule, &text("longenough1")), None);
    }

    #[test]
    fn text_rules_skip_non_text_values() {
        let rule = ValidationRule::none().email().min_length(5).password();

        assert_eq!(validate_rule(&rule, &Value::Number(3.0)), None);
        assert_eq!(validate_rule(&rule, &Value::from_list(vec!["a"])), None);
    }

    #[test]
    fn empty_rule_set_accepts_anything() {
        assert_eq!(validate_rule(&ValidationRule::none(), &Value::Null), None);
        assert_eq!(
            validate_rule(&ValidationRule::none(), &text("anything")),
            None
        );
    }
}
