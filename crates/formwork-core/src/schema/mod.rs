mod check;
mod field;
mod form;
mod graph;

pub use check::{SchemaIssues, check_fields};
pub use field::{Field, FieldType, ValidationRule};
pub use form::Form;

pub(crate) use graph::DerivedOrder;
