//! This crate contains all shared UI for the console: the auth provider and
//! its hooks, toasts, tables, modals and the timers behind them.

use dioxus::prelude::*;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub const CONSOLE_CSS: Asset = asset!("/assets/console.css");

mod session;
pub use session::{make_session_service, ConsoleSession};

mod timer;
pub use timer::{now_ms, sleep};

pub mod views;

mod auth;
pub use auth::{
    expire_session, handle_api_error, use_api, use_auth, use_config, use_flash, use_session_service,
    AuthProvider, AuthState, FlashNotice, LogoutButton,
};

pub mod toast;
pub use toast::{push_toast, use_toasts, ToastLevel, ToastLog};

mod toast_panel;
pub use toast_panel::ToastProvider;

pub mod debounce;
pub use debounce::{use_debounced_search, DebouncedSearch};

pub mod fetch_guard;
pub use fetch_guard::{use_request_generation, FetchTicket, RequestGeneration};

pub mod pagination;
pub use pagination::{PageWindow, Pagination, PAGE_SIZES};

pub mod idle;
pub use idle::{IdleGuard, IdleSupervisor};

pub mod format;

pub mod ticket_actions;
pub use ticket_actions::{filter_by_server, guard_mutation, AssignmentDraft, TicketAction};

mod live_counts;
pub use live_counts::{provide_notification_refresh, use_live_counts, LiveCounts, NotificationRefresh};

mod live_indicator;
pub use live_indicator::LiveIndicator;

mod navbar;
pub use navbar::Navbar;
