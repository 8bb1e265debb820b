use dioxus::prelude::*;

use harvest::model::production::{ProductionTable, REGION_COLUMN};

/// Production figures in display units, one row per region
#[component]
pub fn ProductionTableView(table: ProductionTable) -> Element {
    rsx!(
        div { class: "table-wrapper",
            table { class: "table",
                thead {
                    tr {
                        th { "{REGION_COLUMN}" }
                        for year in table.years.iter() {
                            th { class: "numeric", "{year}" }
                        }
                    }
                }
                tbody {
                    for (index, row) in table.rows.iter().enumerate() {
                        tr { key: "{index}",
                            td { "{row.region}" }
                            for value in row.values.iter() {
                                td { class: "numeric", {format_value(*value)} }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}
