//! ## Crate layout
//! - `core`: schema model, validation, formulas, runtime, builder, stores.
//! - `error`: the public error taxonomy embedders consume.
//!
//! The `prelude` module mirrors the surface a form-building UI needs;
//! reach into `core` for the finer-grained pieces (parsers, helper
//! registry, backends).

pub use formwork_core as core;

mod error;

pub use error::{Error, ErrorKind, ErrorOrigin, FormulaErrorKind};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        builder::{FieldDraft, FieldPatch, FormBuilder},
        formula::EvalContext,
        runtime::FormRuntime,
        schema::{Field, FieldType, Form, ValidationRule},
        store::{FormStore, KeyValue, MemoryKeyValue},
        types::{Date, FieldId, FormId, Timestamp},
        validate::RuleViolation,
        value::Value,
    };
    pub use crate::{Error, ErrorKind, ErrorOrigin};
    pub use serde::{Deserialize, Serialize};
}
