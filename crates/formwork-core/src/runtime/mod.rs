//! Module: runtime
//! Responsibility: live form state — current values, current errors, and
//! derived recomputation to a fixed point.
//! Does not own: schema mutation (builder) or persistence (store).

use crate::{
    formula::{EvalContext, FormulaProgram},
    schema::{DerivedOrder, Form},
    types::FieldId,
    validate::{RuleViolation, validate_field},
    value::Value,
};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

///
/// DerivedProgram
///
/// One derived field, compiled and ready to run. Kept in topological order
/// so parents always evaluate before their children.
///

#[derive(Clone, Debug)]
struct DerivedProgram {
    field: FieldId,
    parents: Vec<FieldId>,
    program: FormulaProgram,
}

///
/// FormRuntime
///
/// Per-instance state for one rendered form. The schema is fixed for the
/// runtime's lifetime; values and errors change with input. Nothing here
/// is ever persisted.
///

#[derive(Clone, Debug)]
pub struct FormRuntime {
    schema: Form,
    ctx: EvalContext,
    values: BTreeMap<FieldId, Value>,
    errors: BTreeMap<FieldId, RuleViolation>,
    derived: Vec<DerivedProgram>,
    excluded: BTreeSet<FieldId>,
}

impl FormRuntime {
    #[must_use]
    pub fn new(schema: Form) -> Self {
        Self::with_context(schema, EvalContext::new())
    }

    /// Build a runtime with a pinned evaluation context (tests, replays).
    #[must_use]
    pub fn with_context(schema: Form, ctx: EvalContext) -> Self {
        let mut values = BTreeMap::new();
        for field in &schema.fields {
            values.insert(field.id, field.seed_value());
        }

        let order = DerivedOrder::compute(&schema.fields);
        for id in &order.cyclic {
            warn!("derived field {id} is part of a dependency cycle; it will stay unset");
        }

        let mut derived = Vec::with_capacity(order.order.len());
        let mut excluded = order.cyclic;
        for id in &order.order {
            let Some(field) = schema.field(id) else {
                continue;
            };

            match FormulaProgram::compile(&field.formula, &field.parents) {
                Ok(program) => derived.push(DerivedProgram {
                    field: *id,
                    parents: field.parents.clone(),
                    program,
                }),
                Err(err) => {
                    debug!("formula for field {id} does not compile: {err}");
                    excluded.insert(*id);
                }
            }
        }

        // excluded fields are permanently unset, whatever their default said
        for id in &excluded {
            values.insert(*id, Value::Null);
        }

        let mut runtime = Self {
            schema,
            ctx,
            values,
            errors: BTreeMap::new(),
            derived,
            excluded,
        };
        runtime.recompute_derived();

        runtime
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub const fn schema(&self) -> &Form {
        &self.schema
    }

    #[must_use]
    pub fn value(&self, id: &FieldId) -> Option<&Value> {
        self.values.get(id)
    }

    #[must_use]
    pub const fn values(&self) -> &BTreeMap<FieldId, Value> {
        &self.values
    }

    #[must_use]
    pub fn error(&self, id: &FieldId) -> Option<&RuleViolation> {
        self.errors.get(id)
    }

    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<FieldId, RuleViolation> {
        &self.errors
    }

    ///
    /// MUTATION
    ///

    /// Apply one user input: store the value, re-validate that field only,
    /// then let derived fields catch up.
    pub fn set_value(&mut self, id: &FieldId, value: impl Into<Value>) {
        let Some(field) = self.schema.field(id) else {
            debug!("set_value on unknown field {id}; ignoring");
            return;
        };

        let value = value.into();
        match validate_field(field, &value) {
            Some(violation) => self.errors.insert(*id, violation),
            None => self.errors.remove(id),
        };
        self.values.insert(*id, value);

        self.recompute_derived();
    }

    /// Re-evaluate every derived field until values stop changing.
    ///
    /// Programs run in topological order, so one pass settles an acyclic
    /// graph and the loop exists only as a hard stop against surprises;
    /// cycle members were excluded up front. Returns the number of value
    /// updates performed.
    pub fn recompute_derived(&mut self) -> usize {
        let max_passes = self.derived.len() + 1;
        let mut updates = 0;

        for _ in 0..max_passes {
            let mut changed = false;

            for slot in &self.derived {
                let parents: Vec<Value> = slot
                    .parents
                    .iter()
                    .map(|p| self.values.get(p).cloned().unwrap_or(Value::Null))
                    .collect();

                let next = match slot.program.eval(&self.ctx, &parents) {
                    Ok(value) => value,
                    Err(err) => {
                        debug!("formula for field {} failed: {err}", slot.field);
                        Value::Null
                    }
                };

                let current = self.values.get(&slot.field);
                if current != Some(&next) {
                    self.values.insert(slot.field, next);
                    changed = true;
                    updates += 1;
                }
            }

            if !changed {
                break;
            }
        }

        updates
    }

    /// Validate every field against its current value, replacing the whole
    /// error map. Returns true when the form is valid.
    pub fn validate_all(&mut self) -> bool {
        let mut errors = BTreeMap::new();

        for field in &self.schema.fields {
            let value = self.values.get(&field.id).cloned().unwrap_or(Value::Null);
            if let Some(violation) = validate_field(field, &value) {
                errors.insert(field.id, violation);
            }
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Submit the form: full validation, nothing stored. Answers are
    /// deliberately never persisted.
    pub fn submit(&mut self) -> bool {
        self.validate_all()
    }
}

///
/// TESTS
///
