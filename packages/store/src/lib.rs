pub mod config;
pub mod error;
pub mod kv;
pub mod session;

mod memory;
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStorage;

pub use config::{ConsoleConfig, ServerEndpoint};
pub use error::StoreError;
pub use kv::KeyValueStore;
pub use session::{Role, Session, SessionService, SubscriptionId};
