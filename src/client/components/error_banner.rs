use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaTriangleExclamation;
use dioxus_free_icons::Icon;

#[component]
pub fn ErrorBanner(message: String) -> Element {
    rsx!(
        div { class: "alert alert-error", role: "alert",
            Icon { width: 20, height: 20, icon: FaTriangleExclamation }
            p { "{message}" }
        }
    )
}
