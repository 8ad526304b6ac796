use dioxus::prelude::*;
use helpdesk_api::{LegacyAction, LegacyClient, LegacyRecord, ServerDirectory};
use helpdesk_ui::{push_toast, use_config, use_request_generation, use_toasts, ToastLevel};

/// Users, devices and complaint types straight from a server's legacy
/// endpoint.
#[component]
pub fn Lookups() -> Element {
    let config = use_config();
    let mut toasts = use_toasts();
    let generation = use_request_generation();
    let client = use_hook(|| LegacyClient::new(ServerDirectory::from_config(&config)));

    let first_server = client
        .directory()
        .servers()
        .first()
        .map(|s| s.id.clone())
        .unwrap_or_default();
    let mut server_id = use_signal(move || first_server);
    let mut action = use_signal(|| LegacyAction::Users);
    let mut search = use_signal(String::new);
    let mut records = use_signal(|| None::<Vec<LegacyRecord>>);
    let mut busy = use_signal(|| false);

    let run = {
        let client = client.clone();
        move |_: MouseEvent| {
            let client = client.clone();
            let generation = generation.clone();
            let ticket = generation.ticket();
            let server = server_id.peek().clone();
            let action = *action.peek();
            let search = search.peek().clone();
            spawn(async move {
                busy.set(true);
                let result = client.lookup(&server, action, Some(&search)).await;
                if !generation.is_current(ticket) {
                    return;
                }
                busy.set(false);
                match result {
                    Ok(found) => {
                        tracing::info!("{} on {server}: {} records", action.opr(), found.len());
                        records.set(Some(found));
                    }
                    Err(e) => {
                        records.set(None);
                        push_toast(&mut toasts, ToastLevel::Error, &e.user_message());
                    }
                }
            });
        }
    };

    let servers = client.directory().servers().to_vec();
    if servers.is_empty() {
        return rsx! {
            p { class: "table-empty", "No legacy servers are configured." }
        };
    }

    rsx! {
        div {
            class: "table-toolbar",
            select {
                class: "form-input",
                onchange: move |evt: FormEvent| server_id.set(evt.value()),
                for server in servers {
                    option {
                        key: "{server.id}",
                        value: "{server.id}",
                        selected: *server_id.read() == server.id,
                        "{server.name}"
                    }
                }
            }
            select {
                class: "form-input",
                onchange: move |evt: FormEvent| {
                    if let Some(next) = LegacyAction::from_opr(&evt.value()) {
                        action.set(next);
                    }
                },
                for choice in LegacyAction::ALL {
                    option {
                        value: choice.opr(),
                        selected: action() == choice,
                        "{choice.label()}"
                    }
                }
            }
            input {
                class: "form-input",
                r#type: "search",
                placeholder: "Optional search",
                value: "{search}",
                oninput: move |evt: FormEvent| search.set(evt.value()),
            }
            button {
                class: "btn btn-primary",
                disabled: busy(),
                onclick: run,
                if busy() { "Looking up..." } else { "Look up" }
            }
        }

        match records() {
            None => rsx! {},
            Some(found) if found.is_empty() => rsx! {
                p { class: "table-empty", "No records returned" }
            },
            Some(found) => rsx! {
                div {
                    class: "record-list",
                    for (i, record) in found.into_iter().enumerate() {
                        div {
                            key: "{i}",
                            class: "record-card",
                            dl {
                                for (name, value) in record.fields {
                                    dt { "{name}" }
                                    dd { "{value}" }
                                }
                            }
                        }
                    }
                }
            },
        }
    }
}
