use crate::ai::GenerationClient;
use crate::storage::SharedStore;
use crate::studio::{Studio, Timings};
use crate::theme::theme_definition;
use crate::types::AutoSaveStatus;
use crate::views::{DesignsGallery, Uploader, Workspace};
use dioxus::prelude::*;
use std::sync::Arc;

/// Services the front end is launched with.
#[derive(Clone)]
pub struct AppServices {
    pub client: Arc<dyn GenerationClient>,
    pub store: SharedStore,
}

#[component]
pub fn App() -> Element {
    let services = use_context::<AppServices>();
    let studio = use_signal(|| Studio::open(services.store.clone(), Timings::default()));
    let autosave_status = use_signal(AutoSaveStatus::default);
    let just_saved = use_signal(|| false);
    let show_designs = use_signal(|| false);

    use_studio_watchers(studio, autosave_status, just_saved);

    rsx! {
        ThemeStyles {}
        div { class: "app",
            AppHeader { studio, autosave_status, show_designs }
            main { class: "main",
                if studio.read().session().is_some() {
                    Workspace { studio, just_saved }
                } else {
                    Uploader { studio }
                }
            }
            if show_designs() {
                DesignsGallery { studio, show_designs }
            }
        }
    }
}

/// Mirrors the studio's timer-driven flags into signals so they re-render.
fn use_studio_watchers(
    studio: Signal<Studio>,
    mut autosave_status: Signal<AutoSaveStatus>,
    mut just_saved: Signal<bool>,
) {
    use_hook(move || {
        let mut status_rx = studio.peek().watch_autosave_status();
        spawn(async move {
            while status_rx.changed().await.is_ok() {
                let status = *status_rx.borrow_and_update();
                autosave_status.set(status);
            }
        });

        let mut saved_rx = studio.peek().watch_just_saved();
        spawn(async move {
            while saved_rx.changed().await.is_ok() {
                let raised = *saved_rx.borrow_and_update();
                just_saved.set(raised);
            }
        });
    });
}

#[component]
fn ThemeStyles() -> Element {
    let definition = theme_definition();
    rsx! {
        style { dangerous_inner_html: "{definition.palette}" }
        style { dangerous_inner_html: "{definition.layout}" }
    }
}

#[component]
fn AppHeader(
    studio: Signal<Studio>,
    autosave_status: Signal<AutoSaveStatus>,
    show_designs: Signal<bool>,
) -> Element {
    let mut studio = studio;
    let mut show_designs = show_designs;
    let (has_session, enabled, saved_count) = {
        let state = studio.read();
        (
            state.session().is_some(),
            state.autosave_enabled(),
            state.saved_designs().len(),
        )
    };

    rsx! {
        header { class: "header",
            span { class: "header-title", "AI Interior Designer" }
            div { class: "header-actions",
                if has_session {
                    AutoSaveIndicator { status: autosave_status(), enabled }
                    button {
                        class: format_args!("switch {}", if enabled { "on" } else { "" }),
                        role: "switch",
                        aria_checked: enabled.to_string(),
                        title: "Autosave",
                        onclick: move |_| studio.with_mut(|s| s.set_autosave_enabled(!enabled)),
                        span { class: "switch-knob" }
                    }
                    button {
                        class: "btn",
                        onclick: move |_| studio.with_mut(|s| s.reset_session()),
                        "New design"
                    }
                }
                button {
                    class: "btn",
                    onclick: move |_| show_designs.set(true),
                    "My designs ({saved_count})"
                }
            }
        }
    }
}

#[component]
fn AutoSaveIndicator(status: AutoSaveStatus, enabled: bool) -> Element {
    if !enabled {
        return rsx! { span { class: "autosave-status", "Autosave off" } };
    }
    match status {
        AutoSaveStatus::Saving => rsx! { span { class: "autosave-status", "Saving..." } },
        AutoSaveStatus::Saved => rsx! { span { class: "autosave-status saved", "Saved" } },
        AutoSaveStatus::Idle => rsx! { span { class: "autosave-status" } },
    }
}
