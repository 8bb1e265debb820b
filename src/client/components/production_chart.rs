use dioxus::prelude::*;

use harvest::model::{chart, production::ProductionTable};

/// Overlapping area chart of the table, one color per region
#[component]
pub fn ProductionChart(table: ProductionTable) -> Element {
    let svg = chart::render_svg(&table.melt());

    rsx!(
        div { class: "chart", dangerous_inner_html: svg }
    )
}
