use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaBook, FaSeedling};
use dioxus_free_icons::Icon;

pub use crate::client::router::Route;

#[component]
pub fn Navbar() -> Element {
    rsx! {
        div {
            class: "navbar",
            div {
                class: "navbar-start",
                Icon { width: 24, height: 24, icon: FaSeedling }
                p { class: "title", "Harvest" }
            }
            div {
                class: "navbar-end",
                a { href: "/api/docs", class: "btn btn-outline",
                    Icon { width: 16, height: 16, icon: FaBook }
                    "API Docs"
                }
            }
        }

        Outlet::<Route> {}
    }
}
