use dioxus::prelude::*;

/// Checkbox list for picking any number of regions
///
/// `selected` keeps regions in the order they were picked.
#[component]
pub fn RegionPicker(regions: Vec<String>, mut selected: Signal<Vec<String>>) -> Element {
    rsx!(
        fieldset { class: "region-picker",
            legend { "Select countries" }
            div { class: "region-list",
                for region in regions {
                    label { key: "{region}", class: "region-option",
                        input {
                            r#type: "checkbox",
                            checked: selected.read().contains(&region),
                            onchange: {
                                let region = region.clone();
                                move |event: FormEvent| {
                                    let mut selected = selected.write();
                                    if event.checked() {
                                        if !selected.contains(&region) {
                                            selected.push(region.clone());
                                        }
                                    } else {
                                        selected.retain(|r| r != &region);
                                    }
                                }
                            },
                        }
                        span { "{region}" }
                    }
                }
            }
            if !selected.read().is_empty() {
                button {
                    class: "btn btn-outline",
                    onclick: move |_| selected.write().clear(),
                    "Clear selection"
                }
            }
        }
    )
}
