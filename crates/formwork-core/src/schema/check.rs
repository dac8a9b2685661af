use crate::{
    formula::FormulaProgram,
    schema::{Field, graph::DerivedOrder},
    types::FieldId,
};
use std::collections::{BTreeMap, BTreeSet};

/// Findings collected per field, keyed by field id.
///
/// Advisory only: a form with findings still freezes and runs, with the
/// affected derived fields left permanently unset.
pub type SchemaIssues = BTreeMap<String, Vec<String>>;

/// Check a field list for structural problems the builder UI should show:
/// dangling or self-referential parents, derived cycles, formulas that do
/// not compile, and option-driven fields with no options.
#[must_use]
pub fn check_fields(fields: &[Field]) -> SchemaIssues {
    let mut issues = SchemaIssues::new();
    let known: BTreeSet<FieldId> = fields.iter().map(|f| f.id).collect();

    let mut report = |id: FieldId, message: String| {
        issues.entry(id.to_string()).or_default().push(message);
    };

    for field in fields {
        for parent in &field.parents {
            if *parent == field.id {
                report(field.id, "field lists itself as a parent".to_string());
            } else if !known.contains(parent) {
                report(field.id, format!("unknown parent `{parent}`"));
            }
        }

        if field.ty.has_options() && field.options.is_empty() {
            report(field.id, "option-driven field has no options".to_string());
        }

        if field.derived && field.formula.is_empty() {
            report(field.id, "derived field has no formula".to_string());
        }

        if field.is_derived() {
            if let Err(err) = FormulaProgram::compile(&field.formula, &field.parents) {
                report(field.id, format!("formula does not compile: {err}"));
            }
        }
    }

    for id in DerivedOrder::compute(fields).cyclic {
        report(id, "derived field is part of a dependency cycle".to_string());
    }

    issues
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, ValidationRule};
    use crate::value::Value;

    fn field(id: FieldId, order: u32) -> Field {
        Field {
            id,
            label: "f".into(),
            ty: FieldType::Text,
            required: false,
            default_value: Value::Null,
            options: vec![],
            validation: ValidationRule::none(),
            derived: false,
            parents: vec![],
            formula: String::new(),
            order,
        }
    }

    #[test]
    fn clean_fields_have_no_findings() {
        let dob = FieldId::generate();
        let age = FieldId::generate();

        let mut derived = field(age, 2);
        derived.derived = true;
        derived.parents = vec![dob];
        derived.formula = format!("calcAgeISO({dob})");

        let issues = check_fields(&[field(dob, 1), derived]);
        assert!(issues.is_empty(), "unexpected findings: {issues:?}");
    }

    #[test]
    fn dangling_and_self_parents_are_reported() {
        let a = FieldId::generate();
        let ghost = FieldId::generate();

        let mut bad = field(a, 1);
        bad.parents = vec![a, ghost];

        let issues = check_fields(&[bad]);
        let findings = &issues[&a.to_string()];
        assert_eq!(findings.len(), 2);
        assert!(findings[0].contains("itself"));
        assert!(findings[1].contains("unknown parent"));
    }

    #[test]
    fn uncompilable_formula_is_reported() {
        let a = FieldId::generate();
        let mut bad = field(a, 1);
        bad.derived = true;
        bad.formula = "mystery(".into();

        let issues = check_fields(&[bad]);
        assert!(issues[&a.to_string()][0].contains("does not compile"));
    }

    #[test]
    fn cycles_are_reported_per_member() {
        let a = FieldId::generate();
        let b = FieldId::generate();

        let mut fa = field(a, 1);
        fa.derived = true;
        fa.parents = vec![b];
        fa.formula = format!("{b}");

        let mut fb = field(b, 2);
        fb.derived = true;
        fb.parents = vec![a];
        fb.formula = format!("{a}");

        let issues = check_fields(&[fa, fb]);
        assert!(issues[&a.to_string()].iter().any(|m| m.contains("cycle")));
        assert!(issues[&b.to_string()].iter().any(|m| m.contains("cycle")));
    }

    #[test]
    fn select_without_options_is_reported() {
        let a = FieldId::generate();
        let mut bad = field(a, 1);
        bad.ty = FieldType::Select;

        let issues = check_fields(&[bad]);
        assert!(issues[&a.to_string()][0].contains("no options"));
    }
}
