mod date;
mod id;
mod timestamp;

pub use date::Date;
pub use id::{FieldId, FormId};
pub use timestamp::Timestamp;
