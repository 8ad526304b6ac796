use chrono::NaiveDate;
use dioxus::prelude::*;
use helpdesk_api::models::{MasterReportRow, Page, ReportQuery, ServerReportRow};
use helpdesk_ui::format::{date, or_na};
use helpdesk_ui::{
    handle_api_error, push_toast, use_api, use_config, use_flash, use_request_generation,
    use_session_service, use_toasts, PageWindow, Pagination, ToastLevel,
};

/// `<input type="date">` value; blank or malformed means no bound.
fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn build_query(from: &str, to: &str, staff: &str) -> Result<ReportQuery, String> {
    let query = ReportQuery {
        from: parse_date(from),
        to: parse_date(to),
        staff_id: staff.parse().ok(),
        ..Default::default()
    };
    query.validate()?;
    Ok(query)
}

#[component]
pub fn Reports() -> Element {
    let config = use_config();
    let api = use_api();
    let service = use_session_service();
    let flash = use_flash();
    let mut toasts = use_toasts();
    let master_generation = use_request_generation();
    let summary_generation = use_request_generation();

    let mut from = use_signal(String::new);
    let mut to = use_signal(String::new);
    let mut staff = use_signal(String::new);
    let mut range_error = use_signal(|| None::<String>);
    let mut applied = use_signal(ReportQuery::default);
    let mut index = use_signal(|| 0u32);
    let mut size = use_signal(|| config.tables.default_page_size);
    let mut master = use_signal(Page::<MasterReportRow>::empty);
    let mut summary = use_signal(Vec::<ServerReportRow>::new);

    let staff_api = api.clone();
    let staff_options = use_resource(move || {
        let api = staff_api.clone();
        async move {
            match api.all_staff().await {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!("Staff filter unavailable: {e}");
                    Vec::new()
                }
            }
        }
    });

    use_effect({
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        move || {
            let query = ReportQuery {
                page: index(),
                size: size(),
                ..applied()
            };
            let ticket = master_generation.ticket();
            let generation = master_generation.clone();
            let api = api.clone();
            let service = service.clone();
            let flash = flash.clone();
            spawn(async move {
                let result = api.master_report(&query).await;
                if !generation.is_current(ticket) {
                    return;
                }
                match result {
                    Ok(next) => master.set(next),
                    Err(e) => {
                        let message = handle_api_error(&service, &flash, &e);
                        push_toast(&mut toasts, ToastLevel::Error, &message);
                    }
                }
            });
        }
    });

    use_effect(move || {
        let query = applied();
        let ticket = summary_generation.ticket();
        let generation = summary_generation.clone();
        let api = api.clone();
        let service = service.clone();
        let flash = flash.clone();
        spawn(async move {
            let result = api.server_report(&query).await;
            if !generation.is_current(ticket) {
                return;
            }
            match result {
                Ok(rows) => summary.set(rows),
                Err(e) => {
                    let message = handle_api_error(&service, &flash, &e);
                    push_toast(&mut toasts, ToastLevel::Error, &message);
                }
            }
        });
    });

    let apply = move |_: MouseEvent| match build_query(&from.read(), &to.read(), &staff.read()) {
        Ok(query) => {
            range_error.set(None);
            index.set(0);
            applied.set(query);
        }
        Err(message) => range_error.set(Some(message)),
    };

    let window = PageWindow::of(&*master.read(), index(), size());
    let master_rows = master.read().data.clone();
    let summary_rows = summary();
    let staff_list = staff_options.read().clone().unwrap_or_default();

    rsx! {
        div {
            class: "table-toolbar",
            label {
                "From "
                input {
                    class: if range_error.read().is_some() { "form-input invalid" } else { "form-input" },
                    r#type: "date",
                    value: "{from}",
                    oninput: move |evt: FormEvent| from.set(evt.value()),
                }
            }
            label {
                "To "
                input {
                    class: if range_error.read().is_some() { "form-input invalid" } else { "form-input" },
                    r#type: "date",
                    value: "{to}",
                    oninput: move |evt: FormEvent| to.set(evt.value()),
                }
            }
            select {
                class: "form-input",
                onchange: move |evt: FormEvent| staff.set(evt.value()),
                option { value: "", "All staff" }
                for member in staff_list {
                    option {
                        key: "{member.id}",
                        value: "{member.id}",
                        selected: *staff.read() == member.id.to_string(),
                        "{member.name}"
                    }
                }
            }
            button { class: "btn btn-primary", onclick: apply, "Apply" }
        }
        if let Some(message) = range_error() {
            p { class: "field-error", "{message}" }
        }

        section {
            class: "report-section",
            h3 { "Master report" }
            if master_rows.is_empty() {
                p { class: "table-empty", "No tickets in this range" }
            } else {
                div {
                    class: "table-wrap",
                    table {
                        class: "data-table",
                        thead {
                            tr {
                                th { "Ticket" }
                                th { "Subject" }
                                th { "Server" }
                                th { "Status" }
                                th { "Priority" }
                                th { "Assigned to" }
                                th { "Created" }
                                th { "Resolved" }
                            }
                        }
                        tbody {
                            for (i, row) in master_rows.into_iter().enumerate() {
                                tr {
                                    key: "{i}",
                                    td { class: "mono", {or_na(row.ticket_no.as_deref())} }
                                    td { {or_na(row.subject.as_deref())} }
                                    td { {or_na(row.server_name.as_deref())} }
                                    td { span { class: row.status.badge_class(), "{row.status}" } }
                                    td { span { class: row.priority.badge_class(), "{row.priority}" } }
                                    td { {or_na(row.assigned_to.as_deref())} }
                                    td { {date(row.created_at.as_deref())} }
                                    td { {date(row.resolved_at.as_deref())} }
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
        }

        section {
            class: "report-section",
            h3 { "By server" }
            if summary_rows.is_empty() {
                p { class: "table-empty", "No server totals in this range" }
            } else {
                div {
                    class: "table-wrap",
                    table {
                        class: "data-table",
                        thead {
                            tr {
                                th { "Server" }
                                th { "Total" }
                                th { "Open" }
                                th { "In progress" }
                                th { "Resolved" }
                                th { "Closed" }
                            }
                        }
                        tbody {
                            for (i, row) in summary_rows.into_iter().enumerate() {
                                tr {
                                    key: "{i}",
                                    td { {or_na(row.server_name.as_deref())} }
                                    td { "{row.total}" }
                                    td { "{row.open}" }
                                    td { "{row.in_progress}" }
                                    td { "{row.resolved}" }
                                    td { "{row.closed}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_range_is_an_inline_error() {
        let err = build_query("2024-05-10", "2024-05-01", "").unwrap_err();
        assert_eq!(err, "Start date must not be after end date");
    }

    #[test]
    fn test_blank_inputs_mean_unbounded() {
        let query = build_query("", " ", "").unwrap();
        assert_eq!(query.from, None);
        assert_eq!(query.to, None);
        assert_eq!(query.staff_id, None);
    }

    #[test]
    fn test_staff_filter_is_parsed() {
        let query = build_query("2024-05-01", "2024-05-01", "17").unwrap();
        assert_eq!(query.staff_id, Some(17));
        assert_eq!(query.from, parse_date("2024-05-01"));
    }
}
