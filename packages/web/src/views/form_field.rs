use dioxus::prelude::*;

/// Labelled input with its validation message underneath.
#[component]
pub fn FormField(
    label: String,
    value: String,
    oninput: EventHandler<String>,
    error: Option<String>,
    #[props(default = "text".to_string())] input_type: String,
    #[props(default)] placeholder: String,
    #[props(default)] autocomplete: String,
) -> Element {
    let class = if error.is_some() { "form-input invalid" } else { "form-input" };

    rsx! {
        label {
            class: "form-label",
            "{label}"
            input {
                class,
                r#type: "{input_type}",
                value: "{value}",
                placeholder: "{placeholder}",
                autocomplete: "{autocomplete}",
                oninput: move |evt: FormEvent| oninput.call(evt.value()),
            }
        }
        if let Some(error) = error {
            p { class: "field-error", "{error}" }
        }
    }
}
