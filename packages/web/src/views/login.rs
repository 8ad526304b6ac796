//! Login pages, one per role. Both post to the role's login endpoint and
//! hand the resulting session to the session service.

use std::collections::BTreeMap;

use dioxus::prelude::*;
use helpdesk_store::Role;
use helpdesk_ui::{use_api, use_auth, use_flash, use_session_service};

use super::FormField;
use crate::Route;

type LoginErrors = BTreeMap<&'static str, String>;

fn username_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Username",
        Role::Staff => "Employee ID",
    }
}

fn validate(role: Role, username: &str, password: &str) -> LoginErrors {
    let mut errors = LoginErrors::new();
    if username.trim().is_empty() {
        errors.insert("username", format!("{} is required", username_label(role)));
    }
    if password.is_empty() {
        errors.insert("password", "Password is required".to_string());
    }
    errors
}

#[component]
pub fn AdminLogin() -> Element {
    rsx! { LoginForm { role: Role::Admin } }
}

#[component]
pub fn StaffLogin() -> Element {
    rsx! { LoginForm { role: Role::Staff } }
}

#[component]
fn LoginForm(role: Role) -> Element {
    let auth = use_auth();
    let service = use_session_service();
    let api = use_api();
    let nav = use_navigator();
    let flash = use_flash();

    // Consumed once; a reload never shows it again
    let notice = use_hook(move || flash.take());

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember = use_signal(|| false);
    let mut errors = use_signal(LoginErrors::new);
    let mut failure = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    // Already signed in as this role
    use_effect(move || {
        if auth().role() == Some(role) {
            nav.replace(Route::home_for(role));
        }
    });

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let name = username.peek().trim().to_string();
        let secret = password.peek().clone();
        let found = validate(role, &name, &secret);
        let invalid = !found.is_empty();
        errors.set(found);
        if invalid || *busy.peek() {
            return;
        }
        failure.set(None);

        let api = api.clone();
        let service = service.clone();
        let remember_me = *remember.peek();
        spawn(async move {
            busy.set(true);
            let outcome = match api.login(role, &name, &secret).await {
                Ok(response) => response.into_session(role, &name),
                Err(e) => Err(e),
            };
            busy.set(false);
            match outcome {
                Ok(session) => {
                    tracing::info!("Signed in as {} ({})", session.username, role.prefix());
                    service.login(session, remember_me);
                    nav.replace(Route::home_for(role));
                }
                Err(e) => {
                    tracing::warn!("Login failed: {e}");
                    password.set(String::new());
                    failure.set(Some(e.user_message()));
                }
            }
        });
    };

    let (other, other_label) = match role {
        Role::Admin => (Route::StaffLogin {}, "Support staff? Sign in here"),
        Role::Staff => (Route::AdminLogin {}, "Administrator? Sign in here"),
    };

    rsx! {
        div {
            class: "login-page",
            form {
                class: "login-card",
                onsubmit,
                h1 { "Helpdesk Console" }
                p { class: "muted", "{role.label()} sign in" }

                if let Some(message) = notice {
                    div { class: "flash", role: "alert", "{message}" }
                }
                if let Some(message) = failure() {
                    div { class: "form-error", role: "alert", "{message}" }
                }

                FormField {
                    label: username_label(role).to_string(),
                    value: username(),
                    oninput: move |v| username.set(v),
                    error: errors.read().get("username").cloned(),
                    autocomplete: "username",
                }
                FormField {
                    label: "Password",
                    value: password(),
                    oninput: move |v| password.set(v),
                    error: errors.read().get("password").cloned(),
                    input_type: "password",
                    autocomplete: "current-password",
                }
                label {
                    class: "form-check",
                    input {
                        r#type: "checkbox",
                        checked: remember(),
                        onchange: move |evt: FormEvent| remember.set(evt.checked()),
                    }
                    "Remember me"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign in" }
                }
                p {
                    class: "login-switch",
                    Link { to: other, "{other_label}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_credentials_are_rejected_per_field() {
        let errors = validate(Role::Staff, "  ", "");
        assert_eq!(errors.get("username").map(String::as_str), Some("Employee ID is required"));
        assert_eq!(errors.get("password").map(String::as_str), Some("Password is required"));
    }

    #[test]
    fn test_filled_form_is_valid() {
        assert!(validate(Role::Admin, "root", "secret").is_empty());
    }
}
