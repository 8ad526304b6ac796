//! # Key-value storage abstraction
//!
//! The session layer only needs string keys and string values, the shape of
//! the browser's `localStorage`. [`KeyValueStore`] captures that, so the same
//! session logic runs against an in-memory map ([`crate::MemoryStorage`]), a
//! TOML file on native targets ([`crate::FileStorage`]) or the browser
//! ([`crate::LocalStorage`]).
//!
//! Writes never fail from the caller's point of view: backends log and drop
//! errors, and a torn write is caught by the session restore check.

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}
