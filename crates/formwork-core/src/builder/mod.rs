//! Module: builder
//! Responsibility: the mutable form-under-construction — field list edits
//! with dense 1-based ordering, and freezing into immutable snapshots.

use crate::{
    schema::{Field, FieldType, Form, SchemaIssues, ValidationRule, check_fields},
    types::{FieldId, FormId, Timestamp},
    value::Value,
};

pub const DEFAULT_FORM_NAME: &str = "Untitled form";
pub const DEFAULT_FIELD_LABEL: &str = "Untitled field";

///
/// FieldDraft
///
/// Partial field spec handed to `add_field`; unset members take the
/// documented defaults. The id is never part of a draft — the builder
/// assigns it.
///

#[derive(Clone, Debug, Default)]
pub struct FieldDraft {
    pub label: Option<String>,
    pub ty: Option<FieldType>,
    pub required: Option<bool>,
    pub default_value: Option<Value>,
    pub options: Option<Vec<String>>,
    pub validation: Option<ValidationRule>,
    pub derived: Option<bool>,
    pub parents: Option<Vec<FieldId>>,
    pub formula: Option<String>,
}

impl FieldDraft {
    #[must_use]
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn ty(mut self, ty: FieldType) -> Self {
        self.ty = Some(ty);
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    #[must_use]
    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn validation(mut self, validation: ValidationRule) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Mark the drafted field as derived from `parents` via `formula`.
    #[must_use]
    pub fn derived(mut self, formula: impl Into<String>, parents: Vec<FieldId>) -> Self {
        self.derived = Some(true);
        self.formula = Some(formula.into());
        self.parents = Some(parents);
        self
    }
}

///
/// FieldPatch
///
/// Partial update merged into an existing field. Only set members are
/// applied. `id` and `order` are deliberately absent: ids are immutable
/// and ordering belongs to the list operations.
///

#[derive(Clone, Debug, Default)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub ty: Option<FieldType>,
    pub required: Option<bool>,
    pub default_value: Option<Value>,
    pub options: Option<Vec<String>>,
    pub validation: Option<ValidationRule>,
    pub derived: Option<bool>,
    pub parents: Option<Vec<FieldId>>,
    pub formula: Option<String>,
}

impl FieldPatch {
    fn apply(self, field: &mut Field) {
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(ty) = self.ty {
            field.ty = ty;
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(default_value) = self.default_value {
            field.default_value = default_value;
        }
        if let Some(options) = self.options {
            field.options = options;
        }
        if let Some(validation) = self.validation {
            field.validation = validation;
        }
        if let Some(derived) = self.derived {
            field.derived = derived;
        }
        if let Some(parents) = self.parents {
            field.parents = parents;
        }
        if let Some(formula) = self.formula {
            field.formula = formula;
        }
    }
}

///
/// FormBuilder
///
/// In-progress form definition. Every mutation leaves `order` dense
/// (1..=N, matching list position); freezing produces an immutable `Form`
/// snapshot with a fresh id.
///

#[derive(Clone, Debug)]
pub struct FormBuilder {
    name: String,
    fields: Vec<Field>,
}

impl FormBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: DEFAULT_FORM_NAME.to_string(),
            fields: Vec::new(),
        }
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == *id)
    }

    ///
    /// MUTATION
    ///

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Append a field built from the draft; unset members take defaults.
    /// Returns the freshly assigned id.
    #[expect(clippy::cast_possible_truncation)]
    pub fn add_field(&mut self, draft: FieldDraft) -> FieldId {
        let id = FieldId::generate();
        let field = Field {
            id,
            label: draft.label.unwrap_or_else(|| DEFAULT_FIELD_LABEL.to_string()),
            ty: draft.ty.unwrap_or_default(),
            required: draft.required.unwrap_or(false),
            default_value: draft.default_value.unwrap_or_default(),
            options: draft.options.unwrap_or_default(),
            validation: draft.validation.unwrap_or_default(),
            derived: draft.derived.unwrap_or(false),
            parents: draft.parents.unwrap_or_default(),
            formula: draft.formula.unwrap_or_default(),
            order: self.fields.len() as u32 + 1,
        };
        self.fields.push(field);

        id
    }

    /// Merge a patch into the matching field. False when the id is unknown.
    pub fn update_field(&mut self, id: &FieldId, patch: FieldPatch) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.id == *id) else {
            return false;
        };
        patch.apply(field);

        true
    }

    /// Remove a field and close the order gap. False when the id is unknown.
    pub fn delete_field(&mut self, id: &FieldId) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != *id);
        if self.fields.len() == before {
            return false;
        }
        self.renumber();

        true
    }

    /// Move the field at `from` to position `to`; indices beyond the end
    /// clamp to the last element. No-op on an empty field list.
    pub fn reorder_fields(&mut self, from: usize, to: usize) {
        if self.fields.is_empty() {
            return;
        }

        let last = self.fields.len() - 1;
        let from = from.min(last);
        let to = to.min(last);

        let moved = self.fields.remove(from);
        self.fields.insert(to, moved);
        self.renumber();
    }

    /// Clear back to the initial state.
    pub fn reset(&mut self) {
        self.name = DEFAULT_FORM_NAME.to_string();
        self.fields.clear();
    }

    ///
    /// SNAPSHOT
    ///

    /// Schema-level findings for the current field list (advisory; freezing
    /// is never blocked).
    #[must_use]
    pub fn check(&self) -> SchemaIssues {
        check_fields(&self.fields)
    }

    /// Freeze the current state into an immutable snapshot with a fresh
    /// form id and creation timestamp.
    #[must_use]
    pub fn snapshot(&self) -> Form {
        Form {
            id: FormId::generate(),
            name: self.name.clone(),
            created_at: Timestamp::now(),
            fields: self.fields.clone(),
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    fn renumber(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.order = i as u32 + 1;
        }
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

///
/// TESTS
///
