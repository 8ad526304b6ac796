//! # Idle timeout
//!
//! [`IdleSupervisor`] is a pure state machine over millisecond timestamps:
//!
//! ```text
//! Active{deadline} ──tick ≥ deadline──▶ Warning{logout_at}
//!      ▲   │                               │        │
//!      │   └─activity: deadline moves       │        └─decline / tick ≥ logout_at─▶ LoggedOut
//!      └──────────────confirm──────────────┘
//! ```
//!
//! While the warning is up, mouse and keyboard activity is ignored: only the
//! explicit "stay logged in" button keeps the session. [`IdleGuard`] drives
//! the machine from window events and a one-second ticker, shows the warning
//! and performs the logout.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;
use helpdesk_store::Role;

use crate::auth::{expire_session, use_config, use_flash, use_session_service};
use crate::timer::{now_ms, sleep};
use crate::views::ModalOverlay;

/// Window events that count as activity.
pub const ACTIVITY_EVENTS: [&str; 6] = ["mousemove", "mousedown", "keydown", "scroll", "touchstart", "click"];

pub const EXPIRED_MESSAGE: &str = "Your session has expired due to inactivity. Please log in again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdlePhase {
    Active { deadline: u64 },
    Warning { logout_at: u64 },
    LoggedOut,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IdleSupervisor {
    timeout_ms: u64,
    warning_ms: u64,
    phase: IdlePhase,
}

impl IdleSupervisor {
    /// `warning_ms` is capped at `timeout_ms`.
    pub fn new(timeout_ms: u64, warning_ms: u64, now: u64) -> Self {
        let warning_ms = warning_ms.min(timeout_ms);
        Self {
            timeout_ms,
            warning_ms,
            phase: IdlePhase::Active {
                deadline: now + timeout_ms - warning_ms,
            },
        }
    }

    pub fn phase(&self) -> IdlePhase {
        self.phase
    }

    fn fresh(&self, now: u64) -> IdlePhase {
        IdlePhase::Active {
            deadline: now + self.timeout_ms - self.warning_ms,
        }
    }

    pub fn activity(&mut self, now: u64) {
        if let IdlePhase::Active { .. } = self.phase {
            self.phase = self.fresh(now);
        }
    }

    pub fn tick(&mut self, now: u64) -> IdlePhase {
        self.phase = match self.phase {
            IdlePhase::Active { deadline } if now >= deadline => IdlePhase::Warning {
                logout_at: now + self.warning_ms,
            },
            IdlePhase::Warning { logout_at } if now >= logout_at => IdlePhase::LoggedOut,
            phase => phase,
        };
        self.phase
    }

    /// "Stay logged in".
    pub fn confirm(&mut self, now: u64) {
        if let IdlePhase::Warning { .. } = self.phase {
            self.phase = self.fresh(now);
        }
    }

    pub fn decline(&mut self) {
        self.phase = IdlePhase::LoggedOut;
    }

    pub fn reset(&mut self, now: u64) {
        self.phase = self.fresh(now);
    }

    /// Whole seconds until logout while warning, rounded up.
    pub fn seconds_left(&self, now: u64) -> Option<u64> {
        match self.phase {
            IdlePhase::Warning { logout_at } => Some(logout_at.saturating_sub(now).div_ceil(1000)),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
struct ActivityListeners {
    closure: wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>,
}

#[cfg(target_arch = "wasm32")]
impl ActivityListeners {
    fn attach(on_activity: impl Fn() + 'static) -> Option<Self> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let window = web_sys::window()?;
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| on_activity())
            as Box<dyn FnMut(web_sys::Event)>);
        for name in ACTIVITY_EVENTS {
            if let Err(e) = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref()) {
                tracing::warn!("Could not watch {name}: {e:?}");
            }
        }
        Some(Self { closure })
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for ActivityListeners {
    fn drop(&mut self) {
        use wasm_bindgen::JsCast;

        if let Some(window) = web_sys::window() {
            for name in ACTIVITY_EVENTS {
                let _ = window.remove_event_listener_with_callback(name, self.closure.as_ref().unchecked_ref());
            }
        }
    }
}

/// Watches for inactivity while a session is open. `on_logout` receives the
/// role that was signed in once the session has been ended.
#[component]
pub fn IdleGuard(on_logout: EventHandler<Role>) -> Element {
    let config = use_config();
    let service = use_session_service();
    let flash = use_flash();
    let mut phase = use_signal(|| None::<IdlePhase>);
    let mut seconds_left = use_signal(|| 0u64);

    let supervisor = use_hook(|| {
        Rc::new(RefCell::new(IdleSupervisor::new(
            config.session.idle_timeout_ms(),
            config.session.warning_ms(),
            now_ms(),
        )))
    });

    #[cfg(target_arch = "wasm32")]
    use_hook({
        let supervisor = supervisor.clone();
        move || {
            Rc::new(ActivityListeners::attach(move || {
                supervisor.borrow_mut().activity(now_ms());
            }))
        }
    });

    use_effect({
        let supervisor = supervisor.clone();
        let service = service.clone();
        let flash = flash.clone();
        move || {
            let supervisor = supervisor.clone();
            let service = service.clone();
            let flash = flash.clone();
            spawn(async move {
                loop {
                    sleep(Duration::from_secs(1)).await;
                    let now = now_ms();
                    let (next, left) = {
                        let mut s = supervisor.borrow_mut();
                        (s.tick(now), s.seconds_left(now))
                    };
                    if *phase.peek() != Some(next) {
                        phase.set(Some(next));
                    }
                    if let Some(left) = left {
                        seconds_left.set(left);
                    }
                    if next == IdlePhase::LoggedOut {
                        let role = service.role().unwrap_or(Role::Admin);
                        expire_session(&service, &flash, EXPIRED_MESSAGE);
                        on_logout.call(role);
                        break;
                    }
                }
            });
        }
    });

    if !matches!(phase(), Some(IdlePhase::Warning { .. })) {
        return rsx! {};
    }

    let stay = {
        let supervisor = supervisor.clone();
        move |_: MouseEvent| {
            supervisor.borrow_mut().confirm(now_ms());
            phase.set(Some(supervisor.borrow().phase()));
        }
    };

    let leave = {
        let supervisor = supervisor.clone();
        move |_: MouseEvent| {
            supervisor.borrow_mut().decline();
            let role = service.role().unwrap_or(Role::Admin);
            expire_session(&service, &flash, EXPIRED_MESSAGE);
            on_logout.call(role);
        }
    };

    rsx! {
        ModalOverlay {
            on_close: move |_| {},
            div {
                class: "modal-body",
                h2 { class: "modal-title", "Are you still there?" }
                p {
                    "You will be logged out in "
                    strong { "{seconds_left}" }
                    " seconds due to inactivity."
                }
                div {
                    class: "modal-actions",
                    button { class: "btn btn-primary", onclick: stay, "Stay logged in" }
                    button { class: "btn btn-outline", onclick: leave, "Log out" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: u64 = 60_000;

    #[test]
    fn test_warning_then_logout_when_ignored() {
        let mut s = IdleSupervisor::new(15 * MIN, MIN, 0);
        assert_eq!(s.tick(14 * MIN - 1), IdlePhase::Active { deadline: 14 * MIN });
        assert_eq!(s.tick(14 * MIN), IdlePhase::Warning { logout_at: 15 * MIN });
        assert_eq!(s.seconds_left(14 * MIN + 500), Some(60));
        assert_eq!(s.tick(15 * MIN), IdlePhase::LoggedOut);
    }

    #[test]
    fn test_activity_resets_deadline_only_while_active() {
        let mut s = IdleSupervisor::new(15 * MIN, MIN, 0);
        s.activity(5 * MIN);
        assert_eq!(s.phase(), IdlePhase::Active { deadline: 19 * MIN });

        s.tick(19 * MIN);
        s.activity(19 * MIN + 10);
        assert_eq!(s.phase(), IdlePhase::Warning { logout_at: 20 * MIN });
    }

    #[test]
    fn test_confirm_restores_active() {
        let mut s = IdleSupervisor::new(15 * MIN, MIN, 0);
        s.tick(14 * MIN);
        s.confirm(14 * MIN + 30_000);
        assert_eq!(
            s.phase(),
            IdlePhase::Active {
                deadline: 28 * MIN + 30_000
            }
        );
    }

    #[test]
    fn test_decline_is_absorbing_until_reset() {
        let mut s = IdleSupervisor::new(15 * MIN, MIN, 0);
        s.tick(14 * MIN);
        s.decline();
        s.activity(14 * MIN + 1);
        s.confirm(14 * MIN + 2);
        assert_eq!(s.tick(100 * MIN), IdlePhase::LoggedOut);
        s.reset(100 * MIN);
        assert_eq!(s.phase(), IdlePhase::Active { deadline: 114 * MIN });
    }

    #[test]
    fn test_warning_longer_than_timeout_is_capped() {
        let mut s = IdleSupervisor::new(30_000, MIN, 0);
        assert_eq!(s.tick(0), IdlePhase::Warning { logout_at: 30_000 });
    }
}
