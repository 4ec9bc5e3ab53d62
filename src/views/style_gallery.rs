use crate::styles::DESIGN_STYLES;
use crate::studio::Studio;
use crate::ui::AppServices;
use crate::views::shared::start_style;
use dioxus::prelude::*;

#[component]
pub fn StyleGallery(studio: Signal<Studio>) -> Element {
    let services = use_context::<AppServices>();
    let (active, busy) = {
        let state = studio.read();
        (
            state.session().and_then(|s| s.style.clone()),
            state.is_loading(),
        )
    };

    rsx! {
        div { class: "carousel",
            for style in DESIGN_STYLES.iter() {
                button {
                    key: "{style.name}",
                    class: format_args!(
                        "style-card {}",
                        if active.as_deref() == Some(style.name) { "active" } else { "" }
                    ),
                    title: "{style.description}",
                    disabled: busy,
                    onclick: {
                        let client = services.client.clone();
                        move |_| start_style(studio, client.clone(), style.name.to_string())
                    },
                    img { src: "{style.preview_url}", alt: "{style.name}" }
                    div { class: "style-card-name", "{style.name}" }
                }
            }
        }
    }
}
