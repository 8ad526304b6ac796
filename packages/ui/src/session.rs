//! Shared session-service constructor for all platforms.
//!
//! Returns a [`ConsoleSession`] backed by the appropriate
//! [`KeyValueStore`](helpdesk_store::KeyValueStore):
//! - **Web** (WASM + `web` feature): `window.localStorage`
//! - **Native**: a TOML file under the user's data directory
//! - **WASM without `web`**: in-memory only

use std::rc::Rc;

use helpdesk_store::{KeyValueStore, SessionService};

/// The session service type every component sees.
pub type ConsoleSession = SessionService<Rc<dyn KeyValueStore>>;

/// Create the platform-appropriate session service. It starts in the loading
/// state; call `restore()` once before rendering guarded routes.
pub fn make_session_service() -> ConsoleSession {
    SessionService::new(make_storage())
}

fn make_storage() -> Rc<dyn KeyValueStore> {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        Rc::new(helpdesk_store::LocalStorage::new())
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        Rc::new(helpdesk_store::MemoryStorage::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let path = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("helpdesk-console")
            .join("session.toml");
        Rc::new(helpdesk_store::FileStorage::new(path))
    }
}
