use dioxus::prelude::*;
use helpdesk_api::models::Ticket;

use super::TicketActionModal;
use crate::format::{datetime, or_na};
use crate::ticket_actions::{guard_mutation, TicketAction};
use crate::toast::{push_toast, use_toasts, ToastLevel};

/// Read-only ticket rows with one button per allowed action.
#[component]
pub fn TicketTable(
    tickets: Vec<Ticket>,
    actions: Vec<TicketAction>,
    on_action: EventHandler<(TicketAction, Ticket)>,
    #[props(default = "No tickets found".to_string())] empty_label: String,
) -> Element {
    if tickets.is_empty() {
        return rsx! {
            p { class: "table-empty", "{empty_label}" }
        };
    }

    rsx! {
        div {
            class: "table-wrap",
            table {
                class: "data-table",
                thead {
                    tr {
                        th { "Ticket" }
                        th { "Subject" }
                        th { "Server" }
                        th { "Complainant" }
                        th { "Status" }
                        th { "Priority" }
                        th { "Assigned" }
                        th { "Created" }
                        if !actions.is_empty() {
                            th { "Actions" }
                        }
                    }
                }
                tbody {
                    for ticket in tickets {
                        tr {
                            key: "{ticket.id}",
                            class: if ticket.status.is_terminal() { "row-frozen" } else { "" },
                            td { class: "mono", "{ticket.display_no()}" }
                            td { {or_na(ticket.subject.as_deref())} }
                            td { {or_na(ticket.server_name.as_deref())} }
                            td { {or_na(ticket.complainant_name.as_deref())} }
                            td { span { class: ticket.status.badge_class(), "{ticket.status}" } }
                            td { span { class: ticket.priority.badge_class(), "{ticket.priority}" } }
                            td { "{ticket.assignee_names()}" }
                            td { {datetime(ticket.created_at.as_deref())} }
                            if !actions.is_empty() {
                                td {
                                    class: "row-actions",
                                    for action in actions.clone() {
                                        button {
                                            key: "{action.label()}",
                                            class: "btn btn-small btn-outline",
                                            title: action.label(),
                                            onclick: {
                                                let ticket = ticket.clone();
                                                move |_| on_action.call((action, ticket.clone()))
                                            },
                                            "{action.label()}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// [`TicketTable`] wired to the action modals. Frozen tickets raise a
/// warning toast instead of opening a modal; `on_changed` fires after any
/// successful mutation so the caller can reload.
#[component]
pub fn TicketPanel(
    tickets: Vec<Ticket>,
    actions: Vec<TicketAction>,
    on_changed: EventHandler<()>,
) -> Element {
    let mut toasts = use_toasts();
    let mut open = use_signal(|| None::<(TicketAction, Ticket)>);

    let pick = move |(action, ticket): (TicketAction, Ticket)| match guard_mutation(&ticket, action) {
        Ok(()) => open.set(Some((action, ticket))),
        Err(notice) => push_toast(&mut toasts, ToastLevel::Warning, &notice),
    };

    rsx! {
        TicketTable { tickets, actions, on_action: pick }

        if let Some((action, ticket)) = open() {
            TicketActionModal {
                key: "{ticket.id}-{action.label()}",
                action,
                ticket,
                on_done: move |_| {
                    open.set(None);
                    on_changed.call(());
                },
                on_cancel: move |_| open.set(None),
            }
        }
    }
}
