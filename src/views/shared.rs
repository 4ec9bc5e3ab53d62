use crate::ai::GenerationClient;
use crate::studio::Studio;
use dioxus::prelude::*;
use std::sync::Arc;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const DESIGN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:zero], [year]");

pub fn start_style(mut studio: Signal<Studio>, client: Arc<dyn GenerationClient>, style: String) {
    let Some(request) = studio.with_mut(|s| s.begin_style(&style)) else {
        return;
    };
    spawn(async move {
        let result = request.run(client.as_ref()).await;
        studio.with_mut(|s| s.finish_style(request.ticket, result));
    });
}

pub fn start_chat(mut studio: Signal<Studio>, client: Arc<dyn GenerationClient>, text: String) {
    let Some(turn) = studio.with_mut(|s| s.begin_chat(&text)) else {
        return;
    };
    spawn(async move {
        let outcome = turn.run(client.as_ref()).await;
        studio.with_mut(|s| s.finish_chat(turn.ticket, outcome));
    });
}

pub fn start_shopping(mut studio: Signal<Studio>, client: Arc<dyn GenerationClient>) {
    let Some(request) = studio.with_mut(|s| s.begin_shopping()) else {
        return;
    };
    spawn(async move {
        let result = request.run(client.as_ref()).await;
        studio.with_mut(|s| s.finish_shopping(request.ticket, result));
    });
}

/// Saved design ids are creation times in milliseconds.
pub fn design_saved_date(id: u64) -> String {
    let Ok(mut datetime) = OffsetDateTime::from_unix_timestamp_nanos(i128::from(id) * 1_000_000)
    else {
        return "Unknown date".to_string();
    };

    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }

    datetime
        .format(DESIGN_DATE_FORMAT)
        .unwrap_or_else(|_| "Unknown date".to_string())
}

#[component]
pub fn Loader(message: String, on_cancel: EventHandler<()>) -> Element {
    rsx! {
        div { class: "loader",
            div { class: "spinner" }
            p { "{message}" }
            button {
                class: "btn",
                onclick: move |_| on_cancel.call(()),
                "Cancel"
            }
        }
    }
}
