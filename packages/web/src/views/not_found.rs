use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "not-found",
            h2 { "Page not found" }
            p { class: "muted", "Nothing lives at /{path}." }
            Link { to: Route::Root {}, "Back to the console" }
        }
    }
}
