use crate::studio::Studio;
use crate::styles::find_style;
use crate::views::chat::ChatPanel;
use crate::views::comparator::Comparator;
use crate::views::shared::Loader;
use crate::views::style_gallery::StyleGallery;
use dioxus::prelude::*;

#[component]
pub fn Workspace(studio: Signal<Studio>, just_saved: Signal<bool>) -> Element {
    let mut studio = studio;
    let saved_ack = just_saved();
    let state = studio.read();
    let Some(session) = state.session() else {
        return rsx! {};
    };

    let before = session.original.data_url();
    let after = session.generated.as_ref().map(|image| image.data_url());
    let style_note = session
        .style
        .as_deref()
        .and_then(find_style)
        .map(|style| format!("{}: {}", style.name, style.description));
    let loading = state.loading_message().map(str::to_string);
    let error = state.error().map(str::to_string);
    let can_save = state.can_save();
    drop(state);

    rsx! {
        div { class: "workspace",
            div { class: "workspace-left",
                div { class: "stage",
                    if let Some(after) = after {
                        Comparator { before, after }
                    } else {
                        img { src: "{before}", alt: "Uploaded room" }
                    }
                    if let Some(message) = error {
                        div { class: "stage-error",
                            span { "{message}" }
                            button {
                                class: "btn",
                                onclick: move |_| studio.with_mut(|s| s.dismiss_error()),
                                "Dismiss"
                            }
                        }
                    }
                    if let Some(message) = loading {
                        Loader {
                            message,
                            on_cancel: move |_| {
                                studio.with_mut(|s| s.cancel_pending());
                            },
                        }
                    }
                }
                if let Some(note) = style_note {
                    p { class: "text-muted", "{note}" }
                }
                button {
                    class: "btn btn-primary btn-block",
                    disabled: !can_save,
                    onclick: move |_| {
                        studio.with_mut(|s| s.save_current_design());
                    },
                    if saved_ack { "Saved!" } else { "Save design" }
                }
                StyleGallery { studio }
            }
            div { class: "workspace-right",
                ChatPanel { studio }
            }
        }
    }
}
