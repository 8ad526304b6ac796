//! # API crate: everything the console says to the outside world
//!
//! The console is a pure client: tickets, servers, staff and reports all live
//! in an external REST backend, dashboard counts are pushed over a STOMP
//! message bus, and a handful of lookups still go to older per-server PHP
//! endpoints. This crate holds those three conversations and the wire types
//! they exchange. It has no UI and no global state; the session token is
//! passed in by the caller.
//!
//! ## Modules
//!
//! | Module | Target | Purpose |
//! |--------|--------|---------|
//! | [`client`] | all | [`ApiClient`]: bearer-token REST gateway, one method per backend operation |
//! | [`models`] | all | Wire models (tickets, servers, staff, counts, pages, reports, login) |
//! | [`legacy`] | all | [`LegacyClient`]: `opr=` lookups against configured per-server endpoints |
//! | [`live`] | all / wasm | STOMP codec, connection state machine, counts reconciler; the websocket driver on wasm |
//! | [`error`] | all | [`ApiError`] and its user-facing messages |
//!
//! ## Testing
//!
//! Every REST and legacy operation has a request builder that returns the
//! `reqwest::Request` it would send, so tests check URL, query, headers and
//! body without a network. The live-count protocol is tested on raw frame
//! text; only the socket driver is browser-only.

pub mod client;
pub mod error;
pub mod legacy;
pub mod live;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;
pub use legacy::{LegacyAction, LegacyClient, LegacyRecord, ServerDirectory};
pub use live::{ConnectionState, CountsReconciler, LiveOptions};
