use crate::{
    schema::Field,
    types::{FieldId, FormId, Timestamp},
};
use serde::{Deserialize, Serialize};

///
/// Form
///
/// A frozen form definition: ordered fields plus metadata. Snapshots are
/// immutable once persisted; editing always happens on builder state and
/// produces a new snapshot with a new id.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: FormId,
    pub name: String,
    pub created_at: Timestamp,
    pub fields: Vec<Field>,
}

impl Form {
    // get
    #[must_use]
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == *id)
    }

    /// Fields that compute their value from parents, in list order.
    pub fn derived_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_derived())
    }
}

///
/// TESTS
///
