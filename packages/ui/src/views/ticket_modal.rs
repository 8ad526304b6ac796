use dioxus::prelude::*;
use helpdesk_api::models::{AssignmentRequest, Ticket, TicketPriority, TicketStatus};

use super::ModalOverlay;
use crate::auth::{handle_api_error, use_api, use_flash, use_session_service};
use crate::ticket_actions::{guard_mutation, AssignmentDraft, TicketAction};
use crate::toast::{push_toast, use_toasts, ToastLevel};

/// Form for one ticket mutation. Submits, toasts the outcome and calls
/// `on_done` after a successful request.
#[component]
pub fn TicketActionModal(
    action: TicketAction,
    ticket: Ticket,
    on_done: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let api = use_api();
    let service = use_session_service();
    let flash = use_flash();
    let mut toasts = use_toasts();
    let mut busy = use_signal(|| false);
    let mut field_error = use_signal(|| None::<String>);

    let mut status = use_signal(|| ticket.status.clone());
    let mut priority = use_signal(|| ticket.priority.clone());
    let mut remark = use_signal(|| ticket.remark.clone().unwrap_or_default());
    let mut draft = use_signal(|| AssignmentDraft::new(&ticket.assigned_staff));

    let staff_api = api.clone();
    let staff = use_resource(move || {
        let api = staff_api.clone();
        async move {
            if action == TicketAction::Assign {
                api.all_staff().await
            } else {
                Ok(Vec::new())
            }
        }
    });

    let ticket_no = ticket.display_no();
    let submit = move |_: MouseEvent| {
        if let Err(notice) = guard_mutation(&ticket, action) {
            push_toast(&mut toasts, ToastLevel::Warning, &notice);
            on_cancel.call(());
            return;
        }
        if action == TicketAction::Remark && remark.read().trim().is_empty() {
            field_error.set(Some("Remark cannot be empty".to_string()));
            return;
        }
        if action == TicketAction::Assign && draft.read().merged().is_empty() {
            field_error.set(Some("Select at least one staff member".to_string()));
            return;
        }
        field_error.set(None);

        let id = ticket.id;
        let ticket_no = ticket.display_no();
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        spawn(async move {
            busy.set(true);
            let result = match action {
                TicketAction::Status => {
                    let next = status.peek().clone();
                    api.update_status(id, &next).await
                }
                TicketAction::Priority => {
                    let next = priority.peek().clone();
                    api.update_priority(id, &next).await
                }
                TicketAction::Remark => {
                    let text = remark.peek().clone();
                    api.update_remark(id, &text).await
                }
                TicketAction::Assign => {
                    let staff_ids = draft.peek().merged();
                    let body = AssignmentRequest {
                        staff_ids,
                        ticket_ids: vec![id],
                    };
                    api.assign_tickets(&body).await
                }
            };
            busy.set(false);
            match result {
                Ok(()) => {
                    push_toast(&mut toasts, ToastLevel::Success, &format!("Ticket {ticket_no} updated"));
                    on_done.call(());
                }
                Err(e) => {
                    let message = handle_api_error(&service, &flash, &e);
                    push_toast(&mut toasts, ToastLevel::Error, &message);
                }
            }
        });
    };

    rsx! {
        ModalOverlay {
            on_close: move |_| on_cancel.call(()),
            div {
                class: "modal-body",
                h2 { class: "modal-title", "{action.label()} · {ticket_no}" }

                match action {
                    TicketAction::Status => rsx! {
                        label { class: "form-label", "Status" }
                        select {
                            class: "form-input",
                            onchange: move |evt: FormEvent| status.set(TicketStatus::parse(&evt.value())),
                            for choice in TicketStatus::SELECTABLE {
                                option {
                                    value: "{choice.wire_value()}",
                                    selected: *status.read() == choice,
                                    "{choice.label()}"
                                }
                            }
                        }
                    },
                    TicketAction::Priority => rsx! {
                        label { class: "form-label", "Priority" }
                        select {
                            class: "form-input",
                            onchange: move |evt: FormEvent| priority.set(TicketPriority::parse(&evt.value())),
                            for choice in TicketPriority::SELECTABLE {
                                option {
                                    value: "{choice.wire_value()}",
                                    selected: *priority.read() == choice,
                                    "{choice.label()}"
                                }
                            }
                        }
                    },
                    TicketAction::Remark => rsx! {
                        label { class: "form-label", r#for: "remark", "Remark" }
                        textarea {
                            id: "remark",
                            class: "form-input",
                            rows: 4,
                            value: "{remark}",
                            oninput: move |evt: FormEvent| remark.set(evt.value()),
                        }
                    },
                    TicketAction::Assign => rsx! {
                        label { class: "form-label", "Support staff" }
                        div {
                            class: "staff-picker",
                            match &*staff.read() {
                                None => rsx! { p { class: "muted", "Loading staff..." } },
                                Some(Err(e)) => rsx! { p { class: "field-error", "{e.user_message()}" } },
                                Some(Ok(list)) if list.is_empty() => rsx! { p { class: "muted", "No staff available" } },
                                Some(Ok(list)) => rsx! {
                                    for member in list.clone() {
                                        label {
                                            key: "{member.id}",
                                            class: "staff-option",
                                            input {
                                                r#type: "checkbox",
                                                checked: draft.read().is_selected(member.id),
                                                onchange: move |_| draft.write().toggle(member.id),
                                            }
                                            " {member.name}"
                                        }
                                    }
                                },
                            }
                        }
                    },
                }

                if let Some(error) = field_error() {
                    p { class: "field-error", "{error}" }
                }

                div {
                    class: "modal-actions",
                    button {
                        class: "btn btn-primary",
                        disabled: busy(),
                        onclick: submit,
                        if busy() { "Saving..." } else { "Save" }
                    }
                    button {
                        class: "btn btn-outline",
                        disabled: busy(),
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                }
            }
        }
    }
}
