use dioxus::prelude::*;
use helpdesk_api::models::{Page, Ticket, TicketPriority, TicketQuery, TicketStatus};
use helpdesk_ui::views::TicketPanel;
use helpdesk_ui::{
    filter_by_server, handle_api_error, push_toast, use_api, use_config, use_debounced_search,
    use_flash, use_request_generation, use_session_service, use_toasts, PageWindow, Pagination,
    TicketAction, ToastLevel,
};

/// Every ticket, server-side paginated and filtered, with all four actions.
#[component]
pub fn Tickets() -> Element {
    let config = use_config();
    let api = use_api();
    let service = use_session_service();
    let flash = use_flash();
    let mut toasts = use_toasts();
    let generation = use_request_generation();

    let mut search = use_debounced_search(config.tables.debounce());
    let mut status = use_signal(|| None::<TicketStatus>);
    let mut priority = use_signal(|| None::<TicketPriority>);
    let mut server_filter = use_signal(String::new);
    let mut index = use_signal(|| 0u32);
    let mut size = use_signal(|| config.tables.default_page_size);
    let mut reload = use_signal(|| 0u64);
    let mut page = use_signal(Page::<Ticket>::empty);
    let mut loading = use_signal(|| false);

    // A settled search starts from the first page
    use_effect(move || {
        let _ = search.settled.read();
        if *index.peek() != 0 {
            index.set(0);
        }
    });

    use_effect(move || {
        let query = TicketQuery {
            page: index(),
            size: size(),
            search: search.settled.read().clone(),
            status: status(),
            priority: priority(),
        };
        let _ = reload();
        let ticket = generation.ticket();
        let generation = generation.clone();
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        spawn(async move {
            loading.set(true);
            let result = api.list_tickets(&query).await;
            if !generation.is_current(ticket) {
                tracing::debug!("Dropped stale ticket page {}", query.page);
                return;
            }
            loading.set(false);
            match result {
                Ok(next) => page.set(next),
                Err(e) => {
                    let message = handle_api_error(&service, &flash, &e);
                    push_toast(&mut toasts, ToastLevel::Error, &message);
                }
            }
        });
    });

    let window = PageWindow::of(&*page.read(), index(), size());
    let rows = filter_by_server(&page.read().data, &server_filter.read());

    rsx! {
        div {
            class: "table-toolbar",
            input {
                class: "form-input",
                r#type: "search",
                placeholder: "Search tickets",
                value: "{search.text}",
                oninput: move |evt: FormEvent| search.input(evt.value()),
            }
            select {
                class: "form-input",
                onchange: move |evt: FormEvent| {
                    let value = evt.value();
                    status.set((!value.is_empty()).then(|| TicketStatus::parse(&value)));
                    index.set(0);
                },
                option { value: "", "All statuses" }
                for choice in TicketStatus::SELECTABLE {
                    option {
                        value: "{choice.wire_value()}",
                        selected: status.read().as_ref() == Some(&choice),
                        "{choice.label()}"
                    }
                }
            }
            select {
                class: "form-input",
                onchange: move |evt: FormEvent| {
                    let value = evt.value();
                    priority.set((!value.is_empty()).then(|| TicketPriority::parse(&value)));
                    index.set(0);
                },
                option { value: "", "All priorities" }
                for choice in TicketPriority::SELECTABLE {
                    option {
                        value: "{choice.wire_value()}",
                        selected: priority.read().as_ref() == Some(&choice),
                        "{choice.label()}"
                    }
                }
            }
            input {
                class: "form-input",
                r#type: "text",
                placeholder: "Filter this page by server",
                value: "{server_filter}",
                oninput: move |evt: FormEvent| server_filter.set(evt.value()),
            }
            if !search.text.read().is_empty() {
                button {
                    class: "btn btn-outline",
                    onclick: move |_| search.clear(),
                    "Clear"
                }
            }
            if loading() {
                span { class: "muted", "Loading..." }
            }
        }

        TicketPanel {
            tickets: rows,
            actions: vec![
                TicketAction::Status,
                TicketAction::Priority,
                TicketAction::Remark,
                TicketAction::Assign,
            ],
            on_changed: move |_| *reload.write() += 1,
        }

        Pagination {
            window,
            on_page: move |next| index.set(next),
            on_size: move |next| {
                size.set(next);
                index.set(0);
            },
        }
    }
}
