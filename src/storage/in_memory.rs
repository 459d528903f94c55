use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub(crate) struct InMemoryStorage {
    storage: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl InMemoryStorage {
    pub(crate) fn new() -> Self {
        Self {
            storage: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, HashMap<String, String>>> {
        self.storage
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn save(&self, prefix: &str, key: &str, value: &str) {
        self.lock()
            .entry(prefix.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub(crate) fn get(&self, prefix: &str, key: &str) -> Option<String> {
        self.lock().get(prefix).and_then(|m| m.get(key)).cloned()
    }

    pub(crate) fn delete(&self, prefix: &str, key: &str) {
        if let Entry::Occupied(mut entry) = self.lock().entry(prefix.into()) {
            let map = entry.get_mut();
            map.remove(key);

            if map.is_empty() {
                entry.remove();
            }
        }
    }
}
