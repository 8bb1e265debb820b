use dioxus::document::{Meta, Title};
use dioxus::prelude::*;

use harvest::model::{
    api::{EMPTY_SELECTION_MESSAGE, NO_DATA_MESSAGE},
    production::ProductionTable,
};

use crate::client::components::{
    DownloadButtons, ErrorBanner, Page, ProductionChart, ProductionTableView, RegionPicker,
};

#[component]
pub fn Home() -> Element {
    let regions = use_signal(Vec::<String>::new);
    let selected = use_signal(Vec::<String>::new);
    let production = use_signal(|| None::<ProductionTable>);
    let error = use_signal(|| None::<String>);

    // Load the region list once, then the table whenever the selection changes
    #[cfg(feature = "web")]
    {
        use crate::client::util::api::{get_production, get_regions};

        let mut regions = regions;
        let mut production = production;
        let mut error = error;

        let region_future = use_resource(|| async move { get_regions().await });
        use_effect(move || match &*region_future.read() {
            Some(Ok(list)) => regions.set(list.clone()),
            Some(Err(err)) => error.set(Some(err.clone())),
            None => (),
        });

        let production_future = use_resource(move || async move {
            let selected = selected();
            if selected.is_empty() {
                return Ok(None);
            }
            get_production(&selected).await.map(|dto| Some(dto.table))
        });
        use_effect(move || match &*production_future.read() {
            Some(Ok(table)) => {
                production.set(table.clone());
                error.set(None);
            }
            Some(Err(err)) => {
                production.set(None);
                error.set(Some(err.clone()));
            }
            None => (),
        });
    }

    let selection = selected.read().clone();

    rsx!(
        Title { "Harvest" }
        Meta {
            name: "description",
            content: "Gross agricultural production by country."
        }
        Page {
            div { class: "dashboard",
                h1 { class: "title", "Gross Agricultural Production" }
                if let Some(message) = error() {
                    ErrorBanner { message }
                }
                RegionPicker { regions: regions(), selected }
                if selection.is_empty() {
                    p { class: "notice", "{EMPTY_SELECTION_MESSAGE}" }
                } else if let Some(table) = production() {
                    if table.is_empty() {
                        p { class: "notice", "{NO_DATA_MESSAGE}" }
                    } else {
                        h2 { "Gross Agricultural Production ($B)" }
                        ProductionTableView { table: table.clone() }
                        ProductionChart { table: table.clone() }
                        DownloadButtons { selected: selection.clone() }
                    }
                } else if error().is_none() {
                    div { class: "skeleton" }
                }
            }
        }
    )
}
