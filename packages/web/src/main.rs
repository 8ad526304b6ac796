use dioxus::prelude::*;

use helpdesk_store::{ConsoleConfig, Role};
use helpdesk_ui::{use_auth, AuthProvider, ToastProvider, CONSOLE_CSS};
use views::{
    AdminLayout, AdminLogin, Dashboard, Lookups, MyTickets, NotFound, Reports, Servers, StaffLayout,
    StaffLogin, StaffMembers, Tickets,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/admin/login")]
    AdminLogin {},
    #[route("/staff/login")]
    StaffLogin {},
    #[layout(AdminLayout)]
        #[route("/admin/dashboard")]
        Dashboard {},
        #[route("/admin/tickets")]
        Tickets {},
        #[route("/admin/servers")]
        Servers {},
        #[route("/admin/staff")]
        StaffMembers {},
        #[route("/admin/reports")]
        Reports {},
        #[route("/admin/lookups")]
        Lookups {},
    #[end_layout]
    #[layout(StaffLayout)]
        #[route("/staff/tickets")]
        MyTickets {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl Route {
    pub fn login_for(role: Role) -> Self {
        match role {
            Role::Admin => Route::AdminLogin {},
            Role::Staff => Route::StaffLogin {},
        }
    }

    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Route::Dashboard {},
            Role::Staff => Route::MyTickets {},
        }
    }

    /// Heading shown in the navbar.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard {} => "Dashboard",
            Route::Tickets {} => "Tickets",
            Route::Servers {} => "Servers",
            Route::StaffMembers {} => "Support Staff",
            Route::Reports {} => "Reports",
            Route::Lookups {} => "Server Lookups",
            Route::MyTickets {} => "My Tickets",
            _ => "Helpdesk",
        }
    }
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const CONSOLE_TOML: &str = include_str!("../console.toml");

fn load_config() -> ConsoleConfig {
    match ConsoleConfig::from_toml(CONSOLE_TOML) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Invalid {}, using defaults: {e}", ConsoleConfig::filename());
            ConsoleConfig::default()
        }
    }
}

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: CONSOLE_CSS }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            config,
            ToastProvider {
                Router::<Route> {}
            }
        }
    }
}

/// Where `/` leads: the signed-in role's home, or the admin login.
fn root_target(role: Option<Role>) -> Route {
    match role {
        Some(role) => Route::home_for(role),
        None => Route::AdminLogin {},
    }
}

#[component]
fn Root() -> Element {
    let nav = use_navigator();
    let auth = use_auth();
    use_effect(move || {
        nav.replace(root_target(auth().role()));
    });
    rsx! {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = ConsoleConfig::from_toml(CONSOLE_TOML).unwrap();
        assert_eq!(config.live.counts_topic, "/topic/dashboard-counts");
        assert!(config.server("alpha").is_some());
    }

    #[test]
    fn test_role_routes() {
        assert_eq!(Route::login_for(Role::Staff).to_string(), "/staff/login");
        assert_eq!(Route::home_for(Role::Admin).to_string(), "/admin/dashboard");
        assert_eq!(Route::home_for(Role::Staff).to_string(), "/staff/tickets");
    }

    #[test]
    fn test_root_redirect_target() {
        assert_eq!(root_target(None).to_string(), "/admin/login");
        assert_eq!(root_target(Some(Role::Admin)).to_string(), "/admin/dashboard");
        assert_eq!(root_target(Some(Role::Staff)).to_string(), "/staff/tickets");
    }
}
