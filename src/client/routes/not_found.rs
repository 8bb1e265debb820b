use dioxus::prelude::*;

use crate::client::{components::Page, router::Route};

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx!(
        Page { class: "centered",
            div { class: "stack",
                p { class: "title", "Page not found" }
                p { "Nothing lives at /{path}" }
                Link { to: Route::Home {}, class: "btn", "Back to the dashboard" }
            }
        }
    )
}
