use dioxus::prelude::*;
use helpdesk_api::models::{DashboardCounts, Ticket, TicketQuery};
use helpdesk_ui::views::TicketPanel;
use helpdesk_ui::{
    handle_api_error, push_toast, use_api, use_flash, use_live_counts, use_request_generation,
    use_session_service, use_toasts, LiveIndicator, TicketAction, ToastLevel,
};

use crate::Route;

const RECENT_ROWS: u32 = 5;

fn cards(counts: &DashboardCounts) -> [(&'static str, u64); 7] {
    [
        ("Total tickets", counts.total),
        ("Open", counts.open),
        ("In progress", counts.in_progress),
        ("Resolved", counts.resolved),
        ("Closed", counts.closed),
        ("Unassigned", counts.unassigned),
        ("Urgent", counts.urgent),
    ]
}

#[component]
pub fn Dashboard() -> Element {
    let live = use_live_counts();
    let api = use_api();
    let service = use_session_service();
    let flash = use_flash();
    let mut toasts = use_toasts();
    let generation = use_request_generation();
    let mut reload = use_signal(|| 0u64);
    let mut recent = use_signal(Vec::<Ticket>::new);

    // Re-runs after every poll and every ticket change
    use_effect(move || {
        let _ = (live.polls)();
        let _ = reload();
        let ticket = generation.ticket();
        let generation = generation.clone();
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        spawn(async move {
            let query = TicketQuery {
                size: RECENT_ROWS,
                ..Default::default()
            };
            let result = api.list_tickets(&query).await;
            if !generation.is_current(ticket) {
                return;
            }
            match result {
                Ok(page) => recent.set(page.data),
                Err(e) => {
                    let message = handle_api_error(&service, &flash, &e);
                    push_toast(&mut toasts, ToastLevel::Error, &message);
                }
            }
        });
    });

    let counts = (live.counts)();
    let state = (live.state)();

    rsx! {
        div {
            class: "page-header",
            h2 { "Overview" }
            LiveIndicator { state }
        }
        div {
            class: "count-grid",
            for (label, value) in cards(&counts) {
                div {
                    key: "{label}",
                    class: "count-card",
                    div { class: "count-value", "{value}" }
                    div { class: "count-label", "{label}" }
                }
            }
        }
        div {
            class: "page-header",
            h2 { "Recent tickets" }
            Link { to: Route::Tickets {}, "View all" }
        }
        TicketPanel {
            tickets: recent(),
            actions: vec![
                TicketAction::Status,
                TicketAction::Priority,
                TicketAction::Remark,
                TicketAction::Assign,
            ],
            on_changed: move |_| *reload.write() += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_follow_counter_order() {
        let counts = DashboardCounts {
            total: 9,
            urgent: 2,
            ..Default::default()
        };
        let cards = cards(&counts);
        assert_eq!(cards[0], ("Total tickets", 9));
        assert_eq!(cards[6], ("Urgent", 2));
    }
}
