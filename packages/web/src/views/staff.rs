use dioxus::prelude::*;
use helpdesk_api::models::{FieldErrors, ListQuery, Page, StaffForm, SupportStaff};
use helpdesk_ui::format::or_na;
use helpdesk_ui::views::{ConfirmDialog, ModalOverlay};
use helpdesk_ui::{
    handle_api_error, push_toast, use_api, use_config, use_debounced_search, use_flash,
    use_request_generation, use_session_service, use_toasts, PageWindow, Pagination, ToastLevel,
};

use super::FormField;

#[derive(Clone, PartialEq)]
enum Editing {
    New,
    Existing(SupportStaff),
}

#[component]
pub fn StaffMembers() -> Element {
    let config = use_config();
    let api = use_api();
    let service = use_session_service();
    let flash = use_flash();
    let mut toasts = use_toasts();
    let generation = use_request_generation();

    let mut search = use_debounced_search(config.tables.debounce());
    let mut index = use_signal(|| 0u32);
    let mut size = use_signal(|| config.tables.default_page_size);
    let mut reload = use_signal(|| 0u64);
    let mut page = use_signal(Page::<SupportStaff>::empty);
    let mut editing = use_signal(|| None::<Editing>);
    let mut deleting = use_signal(|| None::<SupportStaff>);
    let mut delete_busy = use_signal(|| false);

    use_effect(move || {
        let _ = search.settled.read();
        if *index.peek() != 0 {
            index.set(0);
        }
    });

    use_effect({
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        move || {
            let query = ListQuery {
                page: index(),
                size: size(),
                search: search.settled.read().clone(),
            };
            let _ = reload();
            let ticket = generation.ticket();
            let generation = generation.clone();
            let api = api.clone();
            let service = service.clone();
            let flash = flash.clone();
            spawn(async move {
                let result = api.list_staff(&query).await;
                if !generation.is_current(ticket) {
                    return;
                }
                match result {
                    Ok(next) => page.set(next),
                    Err(e) => {
                        let message = handle_api_error(&service, &flash, &e);
                        push_toast(&mut toasts, ToastLevel::Error, &message);
                    }
                }
            });
        }
    });

    let confirm_delete = move |_: ()| {
        let Some(member) = deleting.peek().clone() else {
            return;
        };
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        spawn(async move {
            delete_busy.set(true);
            let result = api.delete_staff(member.id).await;
            delete_busy.set(false);
            deleting.set(None);
            match result {
                Ok(()) => {
                    push_toast(&mut toasts, ToastLevel::Success, &format!("{} removed", member.name));
                    *reload.write() += 1;
                }
                Err(e) => {
                    let message = handle_api_error(&service, &flash, &e);
                    push_toast(&mut toasts, ToastLevel::Error, &message);
                }
            }
        });
    };

    let window = PageWindow::of(&*page.read(), index(), size());
    let rows = page.read().data.clone();

    rsx! {
        div {
            class: "table-toolbar",
            input {
                class: "form-input",
                r#type: "search",
                placeholder: "Search staff",
                value: "{search.text}",
                oninput: move |evt: FormEvent| search.input(evt.value()),
            }
            button {
                class: "btn btn-primary",
                onclick: move |_| editing.set(Some(Editing::New)),
                "Add staff"
            }
        }

        if rows.is_empty() {
            p { class: "table-empty", "No staff found" }
        } else {
            div {
                class: "table-wrap",
                table {
                    class: "data-table",
                    thead {
                        tr {
                            th { "Employee ID" }
                            th { "Name" }
                            th { "Email" }
                            th { "Phone" }
                            th { "Active" }
                            th { "Actions" }
                        }
                    }
                    tbody {
                        for member in rows {
                            tr {
                                key: "{member.id}",
                                td { class: "mono", {or_na(member.employee_id.as_deref())} }
                                td { "{member.name}" }
                                td { {or_na(member.email.as_deref())} }
                                td { {or_na(member.phone.as_deref())} }
                                td { if member.active.unwrap_or(true) { "Yes" } else { "No" } }
                                td {
                                    class: "row-actions",
                                    button {
                                        class: "btn btn-small btn-outline",
                                        onclick: {
                                            let member = member.clone();
                                            move |_| editing.set(Some(Editing::Existing(member.clone())))
                                        },
                                        "Edit"
                                    }
                                    button {
                                        class: "btn btn-small btn-outline",
                                        onclick: {
                                            let member = member.clone();
                                            move |_| deleting.set(Some(member.clone()))
                                        },
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        Pagination {
            window,
            on_page: move |next| index.set(next),
            on_size: move |next| {
                size.set(next);
                index.set(0);
            },
        }

        if let Some(mode) = editing() {
            StaffFormModal {
                mode,
                on_saved: move |_| {
                    editing.set(None);
                    *reload.write() += 1;
                },
                on_cancel: move |_| editing.set(None),
            }
        }

        if let Some(member) = deleting() {
            ConfirmDialog {
                title: "Remove staff member",
                message: format!("Remove {}? Their ticket assignments are kept.", member.name),
                confirm_label: "Remove",
                busy: delete_busy(),
                on_confirm: confirm_delete,
                on_cancel: move |_| deleting.set(None),
            }
        }
    }
}

#[component]
fn StaffFormModal(mode: Editing, on_saved: EventHandler<()>, on_cancel: EventHandler<()>) -> Element {
    let api = use_api();
    let service = use_session_service();
    let flash = use_flash();
    let mut toasts = use_toasts();
    let mut form = use_signal(|| match &mode {
        Editing::New => StaffForm {
            active: true,
            ..Default::default()
        },
        Editing::Existing(member) => StaffForm::from_staff(member),
    });
    let mut errors = use_signal(FieldErrors::new);
    let mut busy = use_signal(|| false);

    let editing_id = match &mode {
        Editing::New => None,
        Editing::Existing(member) => Some(member.id),
    };
    let creating = editing_id.is_none();

    let save = move |_: MouseEvent| {
        let current = form.peek().clone();
        let found = current.validate(creating);
        let invalid = !found.is_empty();
        errors.set(found);
        if invalid {
            return;
        }
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        spawn(async move {
            busy.set(true);
            let result = match editing_id {
                Some(id) => api.update_staff(id, &current).await,
                None => api.create_staff(&current).await,
            };
            busy.set(false);
            match result {
                Ok(()) => {
                    let verb = if creating { "added" } else { "updated" };
                    push_toast(&mut toasts, ToastLevel::Success, &format!("{} {verb}", current.name.trim()));
                    on_saved.call(());
                }
                Err(e) => {
                    let message = handle_api_error(&service, &flash, &e);
                    push_toast(&mut toasts, ToastLevel::Error, &message);
                }
            }
        });
    };

    let error = move |field: &str| errors.read().get(field).cloned();
    let password_label = if creating { "Password" } else { "New password (leave blank to keep)" };

    rsx! {
        ModalOverlay {
            on_close: move |_| on_cancel.call(()),
            div {
                class: "modal-body",
                h2 { class: "modal-title", if creating { "Add staff member" } else { "Edit staff member" } }
                FormField {
                    label: "Name",
                    value: form.read().name.clone(),
                    oninput: move |v| form.write().name = v,
                    error: error("name"),
                }
                FormField {
                    label: "Employee ID",
                    value: form.read().employee_id.clone(),
                    oninput: move |v| form.write().employee_id = v,
                    error: error("employee_id"),
                }
                FormField {
                    label: "Email",
                    value: form.read().email.clone(),
                    oninput: move |v| form.write().email = v,
                    error: error("email"),
                    input_type: "email",
                }
                FormField {
                    label: "Phone",
                    value: form.read().phone.clone(),
                    oninput: move |v| form.write().phone = v,
                    error: error("phone"),
                    input_type: "tel",
                }
                FormField {
                    label: password_label.to_string(),
                    value: form.read().password.clone().unwrap_or_default(),
                    oninput: move |v: String| form.write().password = (!v.is_empty()).then_some(v),
                    error: error("password"),
                    input_type: "password",
                    autocomplete: "new-password",
                }
                label {
                    class: "form-check",
                    input {
                        r#type: "checkbox",
                        checked: form.read().active,
                        onchange: move |evt: FormEvent| form.write().active = evt.checked(),
                    }
                    "Active"
                }
                div {
                    class: "modal-actions",
                    button {
                        class: "btn btn-primary",
                        disabled: busy(),
                        onclick: save,
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
