use crate::store::KeyValue;
use derive_more::{Deref, DerefMut};
use std::collections::BTreeMap;

///
/// MemoryKeyValue
///

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct MemoryKeyValue(BTreeMap<String, String>);

impl MemoryKeyValue {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }
}

impl KeyValue for MemoryKeyValue {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }
}

///
/// TESTS
///
