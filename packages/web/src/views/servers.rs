use dioxus::prelude::*;
use helpdesk_api::models::{FieldErrors, ListQuery, Page, Server, ServerForm};
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
    Existing(Server),
}

#[component]
pub fn Servers() -> Element {
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
    let mut page = use_signal(Page::<Server>::empty);
    let mut editing = use_signal(|| None::<Editing>);
    let mut deleting = use_signal(|| None::<Server>);
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
                let result = api.list_servers(&query).await;
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
        let Some(server) = deleting.peek().clone() else {
            return;
        };
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        spawn(async move {
            delete_busy.set(true);
            let result = api.delete_server(server.id).await;
            delete_busy.set(false);
            deleting.set(None);
            match result {
                Ok(()) => {
                    push_toast(&mut toasts, ToastLevel::Success, &format!("Server {} deleted", server.name));
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
                placeholder: "Search servers",
                value: "{search.text}",
                oninput: move |evt: FormEvent| search.input(evt.value()),
            }
            button {
                class: "btn btn-primary",
                onclick: move |_| editing.set(Some(Editing::New)),
                "Add server"
            }
        }

        if rows.is_empty() {
            p { class: "table-empty", "No servers found" }
        } else {
            div {
                class: "table-wrap",
                table {
                    class: "data-table",
                    thead {
                        tr {
                            th { "Name" }
                            th { "Code" }
                            th { "Base URL" }
                            th { "Active" }
                            th { "Actions" }
                        }
                    }
                    tbody {
                        for server in rows {
                            tr {
                                key: "{server.id}",
                                td { "{server.name}" }
                                td { class: "mono", {or_na(server.code.as_deref())} }
                                td { {or_na(server.base_url.as_deref())} }
                                td { if server.active.unwrap_or(true) { "Yes" } else { "No" } }
                                td {
                                    class: "row-actions",
                                    button {
                                        class: "btn btn-small btn-outline",
                                        onclick: {
                                            let server = server.clone();
                                            move |_| editing.set(Some(Editing::Existing(server.clone())))
                                        },
                                        "Edit"
                                    }
                                    button {
                                        class: "btn btn-small btn-outline",
                                        onclick: {
                                            let server = server.clone();
                                            move |_| deleting.set(Some(server.clone()))
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
            ServerFormModal {
                mode,
                on_saved: move |_| {
                    editing.set(None);
                    *reload.write() += 1;
                },
                on_cancel: move |_| editing.set(None),
            }
        }

        if let Some(server) = deleting() {
            ConfirmDialog {
                title: "Delete server",
                message: format!("Delete server \"{}\"? Its tickets keep their history.", server.name),
                busy: delete_busy(),
                on_confirm: confirm_delete,
                on_cancel: move |_| deleting.set(None),
            }
        }
    }
}

#[component]
fn ServerFormModal(mode: Editing, on_saved: EventHandler<()>, on_cancel: EventHandler<()>) -> Element {
    let api = use_api();
    let service = use_session_service();
    let flash = use_flash();
    let mut toasts = use_toasts();
    let mut form = use_signal(|| match &mode {
        Editing::New => ServerForm {
            active: true,
            ..Default::default()
        },
        Editing::Existing(server) => ServerForm::from_server(server),
    });
    let mut errors = use_signal(FieldErrors::new);
    let mut busy = use_signal(|| false);

    let editing_id = match &mode {
        Editing::New => None,
        Editing::Existing(server) => Some(server.id),
    };

    let save = move |_: MouseEvent| {
        let current = form.peek().clone();
        let found = current.validate();
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
                Some(id) => api.update_server(id, &current).await,
                None => api.create_server(&current).await,
            };
            busy.set(false);
            match result {
                Ok(()) => {
                    let verb = if editing_id.is_some() { "updated" } else { "created" };
                    push_toast(&mut toasts, ToastLevel::Success, &format!("Server {} {verb}", current.name.trim()));
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

    rsx! {
        ModalOverlay {
            on_close: move |_| on_cancel.call(()),
            div {
                class: "modal-body",
                h2 { class: "modal-title", if editing_id.is_some() { "Edit server" } else { "Add server" } }
                FormField {
                    label: "Name",
                    value: form.read().name.clone(),
                    oninput: move |v| form.write().name = v,
                    error: error("name"),
                }
                FormField {
                    label: "Code",
                    value: form.read().code.clone(),
                    oninput: move |v| form.write().code = v,
                    error: error("code"),
                }
                FormField {
                    label: "Base URL",
                    value: form.read().base_url.clone(),
                    oninput: move |v| form.write().base_url = v,
                    error: error("base_url"),
                    placeholder: "https://",
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
