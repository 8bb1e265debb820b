use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaFileCsv, FaImage};
use dioxus_free_icons::Icon;

use harvest::model::api::download_links;

/// Links downloading the selection as CSV and as chart image
///
/// The server records each download in the background.
#[component]
pub fn DownloadButtons(selected: Vec<String>) -> Element {
    let [(csv_label, csv_href), (png_label, png_href)] = download_links(&selected);

    rsx!(
        div { class: "downloads",
            a { href: csv_href, download: "", class: "btn",
                Icon { width: 16, height: 16, icon: FaFileCsv }
                "{csv_label}"
            }
            a { href: png_href, download: "", class: "btn",
                Icon { width: 16, height: 16, icon: FaImage }
                "{png_label}"
            }
        }
    )
}
