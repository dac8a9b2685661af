//! Core engine for formwork: the schema model, the validation engine, the
//! derived-field formula language, the form runtime, builder state, and
//! the persistence gateway. Ergonomic re-exports live in the `prelude`.

// public exports are one module level down
pub mod builder;
pub mod formula;
pub mod runtime;
pub mod schema;
pub mod store;
pub mod types;
pub mod validate;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, parsers, or backends are re-exported here.
///

pub mod prelude {
    pub use crate::{
        builder::{FieldDraft, FieldPatch, FormBuilder},
        runtime::FormRuntime,
        schema::{Field, FieldType, Form, ValidationRule},
        types::{Date, FieldId, FormId, Timestamp},
        value::Value,
    };
}
