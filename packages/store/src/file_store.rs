//! # Filesystem-backed key-value store
//!
//! [`FileStorage`] keeps every key in a single TOML table on disk. It is used
//! on native targets so a session survives restarts the same way
//! `localStorage` does in the browser.
//!
//! ```toml
//! adminName = "alice"
//! adminRole = "admin"
//! adminToken = "eyJhbGciOi..."
//! ```
//!
//! Every operation re-reads the file, so two handles on the same path always
//! agree. A missing or corrupt file reads as empty.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> BTreeMap<String, String> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        match toml::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Ignoring unreadable storage file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(entries)?)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) {
        let mut entries = self.load();
        f(&mut entries);
        if let Err(e) = self.save(&entries) {
            tracing::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|entries| {
            entries.remove(key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Role, Session, SessionService};

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("helpdesk_store_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("session.toml");

        let service = SessionService::new(FileStorage::new(path.clone()));
        service.restore();
        service.login(
            Session {
                role: Role::Staff,
                username: "bob".to_string(),
                token: "t-1".to_string(),
            },
            true,
        );

        // Re-open from the same file
        let reopened = SessionService::new(FileStorage::new(path.clone()));
        let restored = reopened.restore().unwrap();
        assert_eq!(restored.role, Role::Staff);
        assert_eq!(restored.username, "bob");

        reopened.logout();
        assert!(FileStorage::new(path).get("staffToken").is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = std::env::temp_dir().join(format!("helpdesk_store_corrupt_{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("session.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let storage = FileStorage::new(path);
        assert!(storage.get("adminToken").is_none());

        // A write replaces the corrupt content
        storage.set("adminToken", "x");
        assert_eq!(storage.get("adminToken").as_deref(), Some("x"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
