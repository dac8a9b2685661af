use crate::{schema::Form, store::KeyValue, types::FormId};
use log::warn;
use thiserror::Error as ThisError;

/// Storage key holding the whole form list as one JSON array.
pub const FORMS_KEY: &str = "saved_forms_v1";

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("failed to encode forms: {0}")]
    Encode(#[from] serde_json::Error),
}

///
/// FormStore
///
/// Gateway over a key-value backend. The whole list lives under one key;
/// saves are read-modify-write of that list and nothing is ever updated
/// or deleted in place (append-only by design — duplicate ids are kept).
///

#[derive(Clone, Debug)]
pub struct FormStore<K: KeyValue> {
    backend: K,
    key: &'static str,
}

impl<K: KeyValue> FormStore<K> {
    #[must_use]
    pub const fn new(backend: K) -> Self {
        Self {
            backend,
            key: FORMS_KEY,
        }
    }

    /// Use a non-default storage key (parallel stores, tests).
    #[must_use]
    pub const fn with_key(backend: K, key: &'static str) -> Self {
        Self { backend, key }
    }

    #[must_use]
    pub const fn backend(&self) -> &K {
        &self.backend
    }

    /// Every saved form, oldest first.
    ///
    /// A missing key is an empty store; an unreadable payload is recovered
    /// the same way rather than surfaced, so one bad write can never brick
    /// the form list.
    #[must_use]
    pub fn load_all(&self) -> Vec<Form> {
        let Some(raw) = self.backend.get(self.key) else {
            return Vec::new();
        };

        match serde_json::from_str(&raw) {
            Ok(forms) => forms,
            Err(err) => {
                warn!("stored forms under `{}` are unreadable ({err}); treating store as empty", self.key);
                Vec::new()
            }
        }
    }

    /// Append one form and write the whole list back.
    pub fn save(&mut self, form: &Form) -> Result<(), StoreError> {
        let mut forms = self.load_all();
        forms.push(form.clone());

        let raw = serde_json::to_string(&forms)?;
        self.backend.set(self.key, raw);

        Ok(())
    }

    /// Linear scan by id; `None` when absent.
    #[must_use]
    pub fn load_by_id(&self, id: &FormId) -> Option<Form> {
        self.load_all().into_iter().find(|f| f.id == *id)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::{FieldDraft, FormBuilder},
        schema::ValidationRule,
        store::MemoryKeyValue,
    };

    fn sample_form(name: &str) -> Form {
        let mut builder = FormBuilder::new();
        builder.set_name(name);
        builder.add_field(
            FieldDraft::labeled("Email").validation(ValidationRule::required().email()),
        );

        builder.snapshot()
    }

    #[test]
    fn empty_store_loads_nothing() {
        let store = FormStore::new(MemoryKeyValue::new());
        assert!(store.load_all().is_empty());
        assert!(store.load_by_id(&FormId::generate()).is_none());
    }

    #[test]
    fn saved_form_round_trips_deep_equal() {
        let mut store = FormStore::new(MemoryKeyValue::new());
        let form = sample_form("Signup");

        store.save(&form).unwrap();
        let loaded = store.load_by_id(&form.id).unwrap();

        assert_eq!(loaded, form);
    }

    #[test]
    fn saves_append_in_order() {
        let mut store = FormStore::new(MemoryKeyValue::new());
        let first = sample_form("First");
        let second = sample_form("Second");

        store.save(&first).unwrap();
        store.save(&second).unwrap();

        let names: Vec<String> = store.load_all().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn duplicate_ids_are_kept_not_deduplicated() {
        let mut store = FormStore::new(MemoryKeyValue::new());
        let form = sample_form("Twin");

        store.save(&form).unwrap();
        store.save(&form).unwrap();

        assert_eq!(store.load_all().len(), 2);
    }

    #[test]
    fn corrupt_payload_recovers_as_empty() {
        let mut kv = MemoryKeyValue::new();
        kv.set(FORMS_KEY, "{not json".into());

        let mut store = FormStore::new(kv);
        assert!(store.load_all().is_empty());

        // and the store heals on the next save
        let form = sample_form("Fresh");
        store.save(&form).unwrap();
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn missing_id_is_a_miss_not_an_error() {
        let mut store = FormStore::new(MemoryKeyValue::new());
        store.save(&sample_form("Only")).unwrap();

        assert!(store.load_by_id(&FormId::generate()).is_none());
    }
}
