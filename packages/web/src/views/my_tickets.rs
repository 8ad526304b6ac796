use dioxus::prelude::*;
use helpdesk_api::models::{Page, Ticket, TicketQuery, TicketStatus};
use helpdesk_ui::views::TicketPanel;
use helpdesk_ui::{
    handle_api_error, push_toast, use_api, use_config, use_debounced_search, use_flash,
    use_request_generation, use_session_service, use_toasts, PageWindow, Pagination, TicketAction,
    ToastLevel,
};

/// Tickets assigned to the signed-in staff member. Staff may only change
/// status and add remarks.
#[component]
pub fn MyTickets() -> Element {
    let config = use_config();
    let api = use_api();
    let service = use_session_service();
    let flash = use_flash();
    let mut toasts = use_toasts();
    let generation = use_request_generation();

    let mut search = use_debounced_search(config.tables.debounce());
    let mut status = use_signal(|| None::<TicketStatus>);
    let mut index = use_signal(|| 0u32);
    let mut size = use_signal(|| config.tables.default_page_size);
    let mut reload = use_signal(|| 0u64);
    let mut page = use_signal(Page::<Ticket>::empty);

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
            priority: None,
        };
        let _ = reload();
        let ticket = generation.ticket();
        let generation = generation.clone();
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        spawn(async move {
            let result = api.my_tickets(&query).await;
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
    });

    let window = PageWindow::of(&*page.read(), index(), size());
    let rows = page.read().data.clone();

    rsx! {
        div {
            class: "table-toolbar",
            input {
                class: "form-input",
                r#type: "search",
                placeholder: "Search my tickets",
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
        }

        TicketPanel {
            tickets: rows,
            actions: vec![TicketAction::Status, TicketAction::Remark],
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
