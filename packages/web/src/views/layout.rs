use dioxus::prelude::*;
use helpdesk_store::Role;
use helpdesk_ui::icons::{FaChartColumn, FaGaugeHigh, FaMagnifyingGlass, FaServer, FaTicket, FaUsers};
use helpdesk_ui::{
    provide_notification_refresh, use_auth, use_flash, IdleGuard, Icon, LogoutButton, Navbar,
};

use crate::Route;

#[component]
pub fn AdminLayout() -> Element {
    rsx! { ConsoleLayout { role: Role::Admin } }
}

#[component]
pub fn StaffLayout() -> Element {
    rsx! { ConsoleLayout { role: Role::Staff } }
}

fn wrong_role_notice(required: Role) -> String {
    format!("Please log in as {} to view that page.", required.label())
}

/// Shell for every signed-in page. Renders only for `role`; anyone else is
/// sent to that role's login page.
#[component]
fn ConsoleLayout(role: Role) -> Element {
    let auth = use_auth();
    let flash = use_flash();
    let navigator = use_navigator();
    let route = use_route::<Route>();
    provide_notification_refresh();

    use_effect(move || {
        let state = auth();
        if state.loading {
            return;
        }
        match state.role() {
            Some(current) if current == role => {}
            Some(current) => {
                tracing::warn!("{} session tried a {} page", current.prefix(), role.prefix());
                flash.set(wrong_role_notice(role));
                navigator.replace(Route::login_for(role));
            }
            None => {
                navigator.replace(Route::login_for(role));
            }
        }
    });

    if auth.read().role() != Some(role) {
        return rsx! {};
    }

    let on_logout = move |signed_in: Role| {
        navigator.replace(Route::login_for(signed_in));
    };

    rsx! {
        div {
            class: "console-shell",
            nav {
                class: "console-sidebar",
                div { class: "brand", "Helpdesk" }
                match role {
                    Role::Admin => rsx! {
                        NavLink { to: Route::Dashboard {}, icon: NavIcon::Dashboard, label: "Dashboard" }
                        NavLink { to: Route::Tickets {}, icon: NavIcon::Tickets, label: "Tickets" }
                        NavLink { to: Route::Servers {}, icon: NavIcon::Servers, label: "Servers" }
                        NavLink { to: Route::StaffMembers {}, icon: NavIcon::Staff, label: "Support Staff" }
                        NavLink { to: Route::Reports {}, icon: NavIcon::Reports, label: "Reports" }
                        NavLink { to: Route::Lookups {}, icon: NavIcon::Lookups, label: "Lookups" }
                    },
                    Role::Staff => rsx! {
                        NavLink { to: Route::MyTickets {}, icon: NavIcon::Tickets, label: "My Tickets" }
                    },
                }
            }
            div {
                class: "console-main",
                Navbar {
                    title: route.title().to_string(),
                    LogoutButton { on_logout, class: "btn btn-outline" }
                }
                main {
                    class: "console-content",
                    Outlet::<Route> {}
                }
            }
        }
        IdleGuard { on_logout }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum NavIcon {
    Dashboard,
    Tickets,
    Servers,
    Staff,
    Reports,
    Lookups,
}

#[component]
fn NavLink(to: Route, icon: NavIcon, label: String) -> Element {
    let icon = match icon {
        NavIcon::Dashboard => rsx! { Icon { icon: FaGaugeHigh, width: 15, height: 15 } },
        NavIcon::Tickets => rsx! { Icon { icon: FaTicket, width: 15, height: 15 } },
        NavIcon::Servers => rsx! { Icon { icon: FaServer, width: 15, height: 15 } },
        NavIcon::Staff => rsx! { Icon { icon: FaUsers, width: 15, height: 15 } },
        NavIcon::Reports => rsx! { Icon { icon: FaChartColumn, width: 15, height: 15 } },
        NavIcon::Lookups => rsx! { Icon { icon: FaMagnifyingGlass, width: 15, height: 15 } },
    };

    rsx! {
        Link {
            to,
            active_class: "active",
            {icon}
            "{label}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_role_notice_names_required_role() {
        assert_eq!(
            wrong_role_notice(Role::Admin),
            "Please log in as Administrator to view that page."
        );
    }
}
