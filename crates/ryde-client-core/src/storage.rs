use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex},
};

/// Tab scoped key/value storage holding the session.
///
/// Mirrors the browser `sessionStorage` interface so that a handle to the real
/// thing can be dropped in. Only [`crate::SessionStore`] should ever hold one.
pub trait SessionStorage: Debug + Send + 'static {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: String);
    fn remove_item(&mut self, key: &str);
}

/// In process storage that lives as long as the last clone of it.
///
/// Clones share the same items, this allows tests to keep a handle and look at
/// what the session store wrote.
#[derive(Default, Clone)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

/// Lists the keys only, values include the tokens
impl Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items = self.items.lock().expect("mutex poisoned");
        let mut keys: Vec<&str> = items.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("MemoryStorage").field("keys", &keys).finish()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("mutex poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().expect("mutex poisoned").get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.items
            .lock()
            .expect("mutex poisoned")
            .insert(key.to_string(), value);
    }

    fn remove_item(&mut self, key: &str) {
        self.items.lock().expect("mutex poisoned").remove(key);
    }
}
