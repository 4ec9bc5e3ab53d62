use crate::studio::Studio;
use crate::types::EncodedImage;
use dioxus::html::FileEngine;
use dioxus::prelude::*;
use std::sync::Arc;

const UNSUPPORTED_FILE: &str = "Please choose a PNG or JPEG photo.";
const UNREADABLE_FILE: &str = "Could not read that file. Please try another photo.";

#[component]
pub fn Uploader(studio: Signal<Studio>) -> Element {
    let mut dragging = use_signal(|| false);
    let problem = use_signal(|| None::<&'static str>);

    rsx! {
        div { class: "uploader",
            h2 { "Restyle your room" }
            p { class: "text-muted", "Upload a photo and pick a style to see it redesigned." }
            label {
                class: format_args!("dropzone {}", if dragging() { "dragging" } else { "" }),
                ondragover: move |evt| {
                    evt.prevent_default();
                    dragging.set(true);
                },
                ondragleave: move |_| dragging.set(false),
                ondrop: move |evt| async move {
                    evt.prevent_default();
                    dragging.set(false);
                    if let Some(engine) = evt.files() {
                        load_photo(engine, studio, problem).await;
                    }
                },
                input {
                    r#type: "file",
                    accept: "image/png, image/jpeg",
                    multiple: false,
                    onchange: move |evt| async move {
                        if let Some(engine) = evt.files() {
                            load_photo(engine, studio, problem).await;
                        }
                    },
                }
                p { "Drag a photo here, or click to browse" }
                p { class: "text-muted", "PNG or JPEG" }
            }
            if let Some(message) = problem() {
                p { class: "stage-error", "{message}" }
            }
        }
    }
}

async fn load_photo(
    engine: Arc<dyn FileEngine>,
    mut studio: Signal<Studio>,
    mut problem: Signal<Option<&'static str>>,
) {
    let Some(name) = engine.files().into_iter().next() else {
        return;
    };
    let Some(bytes) = engine.read_file(&name).await else {
        tracing::warn!(file = %name, "could not read dropped file");
        problem.set(Some(UNREADABLE_FILE));
        return;
    };
    match EncodedImage::from_upload(&name, &bytes) {
        Some(image) => {
            problem.set(None);
            studio.with_mut(|s| s.upload_image(image));
        }
        None => problem.set(Some(UNSUPPORTED_FILE)),
    }
}
