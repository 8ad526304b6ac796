//! Dashboard counters kept current from two sources: a REST poll on a fixed
//! interval and, in the browser, pushes from the message bus. Both write
//! through one [`CountsReconciler`].

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use helpdesk_api::models::DashboardCounts;
use helpdesk_api::{ConnectionState, CountsReconciler};

use crate::auth::{use_api, use_config};
use crate::timer::sleep;

/// Bumped after every successful poll; the notification bell re-fetches
/// whenever it changes.
#[derive(Clone, Copy, PartialEq)]
pub struct NotificationRefresh(Signal<u64>);

impl NotificationRefresh {
    pub fn bump(self) {
        let mut generation = self.0;
        *generation.write() += 1;
    }

    /// Reading subscribes the caller.
    pub fn generation(&self) -> u64 {
        (self.0)()
    }
}

pub fn provide_notification_refresh() -> NotificationRefresh {
    use_context_provider(|| NotificationRefresh(Signal::new(0)))
}

pub fn use_notification_refresh() -> Option<NotificationRefresh> {
    try_use_context::<NotificationRefresh>()
}

#[derive(Clone, Copy, PartialEq)]
pub struct LiveCounts {
    pub counts: Signal<DashboardCounts>,
    pub state: Signal<ConnectionState>,
    /// Completed polls; pages reload their tables when it changes.
    pub polls: Signal<u64>,
}

/// Start polling and, on wasm, the live socket. Both stop when the calling
/// component unmounts.
pub fn use_live_counts() -> LiveCounts {
    let config = use_config();
    let api = use_api();
    let refresh = use_notification_refresh();
    let reconciler = use_hook(|| Rc::new(RefCell::new(CountsReconciler::new())));
    let counts = use_signal(DashboardCounts::default);
    let state = use_signal(|| ConnectionState::Idle);
    let polls = use_signal(|| 0u64);

    use_effect({
        let reconciler = reconciler.clone();
        let interval = config.live.poll_interval();
        move || {
            let reconciler = reconciler.clone();
            let api = api.clone();
            spawn(async move {
                let mut counts = counts;
                let mut polls = polls;
                loop {
                    // Stamped before the request so a push received while it
                    // is in flight wins.
                    let stamp = reconciler.borrow_mut().stamp();
                    match api.dashboard_counts().await {
                        Ok(snapshot) => {
                            let current = {
                                let mut r = reconciler.borrow_mut();
                                r.apply_snapshot(snapshot, stamp).then(|| r.counts())
                            };
                            if let Some(current) = current {
                                counts.set(current);
                            }
                            *polls.write() += 1;
                            if let Some(refresh) = refresh {
                                refresh.bump();
                            }
                        }
                        Err(e) => tracing::warn!("Dashboard poll failed: {e}"),
                    }
                    match interval {
                        Some(interval) => sleep(interval).await,
                        None => break,
                    }
                }
            });
        }
    });

    #[cfg(target_arch = "wasm32")]
    {
        use helpdesk_api::live::LiveCountClient;
        use helpdesk_api::LiveOptions;

        let auth = crate::auth::use_auth();
        let client = use_hook(|| {
            let token = auth.peek().session.as_ref().map(|s| s.token.clone());
            let reconciler = reconciler.clone();
            LiveCountClient::activate(
                LiveOptions::from_config(&config.live),
                token,
                move |patch| {
                    let current = {
                        let mut r = reconciler.borrow_mut();
                        let stamp = r.stamp();
                        r.apply(&patch, stamp).then(|| r.counts())
                    };
                    if let Some(current) = current {
                        let mut counts = counts;
                        counts.set(current);
                    }
                },
                move |next| {
                    let mut state = state;
                    state.set(next);
                },
            )
        });
        use_drop(move || client.deactivate());
    }

    LiveCounts { counts, state, polls }
}
