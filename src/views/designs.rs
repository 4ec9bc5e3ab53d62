use crate::studio::Studio;
use crate::types::SavedDesign;
use crate::views::comparator::Comparator;
use crate::views::shared::design_saved_date;
use dioxus::prelude::*;

#[component]
pub fn DesignsGallery(studio: Signal<Studio>, show_designs: Signal<bool>) -> Element {
    let mut show_designs = show_designs;
    let designs: Vec<SavedDesign> = studio.read().saved_designs().to_vec();

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| show_designs.set(false),
            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),
                div { class: "modal-header",
                    h2 { "My designs" }
                    button { class: "btn", onclick: move |_| show_designs.set(false), "Close" }
                }
                if designs.is_empty() {
                    p { class: "text-muted", "No saved designs yet. Save a design to see it here." }
                } else {
                    div { class: "design-grid",
                        for design in designs.into_iter().rev() {
                            DesignCard { key: "{design.id}", studio, design }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn DesignCard(studio: Signal<Studio>, design: SavedDesign) -> Element {
    let mut studio = studio;
    let id = design.id;
    let saved_on = design_saved_date(id);
    let before = design.original().data_url();
    let after = design.generated().data_url();

    rsx! {
        div { class: "design-card",
            div { class: "design-card-header",
                div {
                    strong { "{design.style}" }
                    p { class: "text-muted", "{saved_on}" }
                }
                button {
                    class: "btn",
                    onclick: move |_| {
                        studio.with_mut(|s| s.delete_saved_design(id));
                    },
                    "Delete"
                }
            }
            div { class: "stage",
                Comparator { before, after }
            }
        }
    }
}
