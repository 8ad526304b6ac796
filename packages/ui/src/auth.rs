//! Authentication context and hooks for the UI.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use helpdesk_api::{ApiClient, ApiError};
use helpdesk_store::{ConsoleConfig, Role, Session};

use crate::session::{make_session_service, ConsoleSession};

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }
}

impl AuthState {
    fn of(service: &ConsoleSession) -> Self {
        Self {
            session: service.session(),
            loading: service.is_loading(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.role)
    }
}

/// One-shot message shown by the next login page render, e.g. after an idle
/// logout. Lives in memory only, so a reload never shows it again.
#[derive(Clone, Default)]
pub struct FlashNotice(Rc<RefCell<Option<String>>>);

impl FlashNotice {
    pub fn set(&self, message: impl Into<String>) {
        *self.0.borrow_mut() = Some(message.into());
    }

    pub fn take(&self) -> Option<String> {
        self.0.borrow_mut().take()
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

pub fn use_session_service() -> ConsoleSession {
    use_context::<ConsoleSession>()
}

pub fn use_config() -> ConsoleConfig {
    use_context::<ConsoleConfig>()
}

pub fn use_flash() -> FlashNotice {
    use_context::<FlashNotice>()
}

/// Gateway client carrying the current session's token.
pub fn use_api() -> ApiClient {
    let client = use_context::<ApiClient>();
    let auth = use_auth();
    let token = auth.read().session.as_ref().map(|s| s.token.clone());
    client.with_token(token)
}

/// End the session because the backend rejected its token.
pub fn expire_session(service: &ConsoleSession, flash: &FlashNotice, message: &str) {
    tracing::warn!("Session ended: {message}");
    flash.set(message);
    service.logout();
}

/// Route an API failure: unauthorized ends the session, anything else is
/// returned as a toast message.
pub fn handle_api_error(service: &ConsoleSession, flash: &FlashNotice, error: &ApiError) -> String {
    let message = error.user_message();
    if error.is_unauthorized() {
        expire_session(service, flash, &message);
    } else {
        tracing::error!("{error}");
    }
    message
}

/// Provider component that owns the session service and configuration.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(config: ConsoleConfig, children: Element) -> Element {
    let service = use_hook(|| {
        let service = make_session_service();
        service.restore();
        service
    });
    let auth_state = use_signal(|| AuthState::of(&service));

    // Mirror every login/logout into the signal
    let subscription = use_hook({
        let service = service.clone();
        move || {
            service.subscribe(move |session| {
                let mut state = auth_state;
                state.set(AuthState {
                    session: session.cloned(),
                    loading: false,
                })
            })
        }
    });
    use_drop({
        let service = service.clone();
        move || service.unsubscribe(subscription)
    });

    use_context_provider(|| service.clone());
    use_context_provider(|| auth_state);
    use_context_provider(|| ApiClient::new(config.api.base_url.clone()));
    use_context_provider(|| config.clone());
    use_context_provider(FlashNotice::default);

    rsx! {
        {children}
    }
}

/// Button to log out the current user. `on_logout` receives the role that
/// was signed in so the caller can route to its login page.
#[component]
pub fn LogoutButton(
    on_logout: EventHandler<Role>,
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let service = use_session_service();

    let onclick = move |_| {
        let role = service.role().unwrap_or(Role::Admin);
        service.logout();
        on_logout.call(role);
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_store::{KeyValueStore, MemoryStorage, SessionService};

    #[test]
    fn test_flash_is_consumed_once() {
        let flash = FlashNotice::default();
        flash.set("Your session has expired.");
        assert_eq!(flash.take().as_deref(), Some("Your session has expired."));
        assert_eq!(flash.take(), None);
    }

    #[test]
    fn test_unauthorized_error_logs_out_and_flashes() {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStorage::new());
        let service: ConsoleSession = SessionService::new(store);
        service.login(
            Session {
                role: Role::Staff,
                username: "emp7".into(),
                token: "t".into(),
            },
            false,
        );
        let flash = FlashNotice::default();

        let message = handle_api_error(&service, &flash, &ApiError::Unauthorized);
        assert!(service.session().is_none());
        assert_eq!(flash.take(), Some(message));

        let message = handle_api_error(&service, &flash, &ApiError::Network("down".into()));
        assert_eq!(message, "Could not reach the server. Please try again.");
        assert_eq!(flash.take(), None);
    }
}
