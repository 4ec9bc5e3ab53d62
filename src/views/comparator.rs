use dioxus::prelude::*;

/// Before/after slider. The original is revealed left of the handle.
#[component]
pub fn Comparator(before: String, after: String) -> Element {
    let mut position = use_signal(|| 50.0_f64);
    let reveal = position();
    let hidden = 100.0 - reveal;

    rsx! {
        div { class: "comparator",
            img { src: "{after}", alt: "Redesigned room" }
            div {
                class: "comparator-overlay",
                style: "clip-path: inset(0 {hidden}% 0 0);",
                img { src: "{before}", alt: "Original room" }
            }
            div { class: "comparator-handle", style: "left: calc({reveal}% - 2px);" }
            input {
                class: "comparator-range",
                r#type: "range",
                min: "0",
                max: "100",
                step: "0.5",
                value: "{reveal}",
                aria_label: "Compare before and after",
                oninput: move |ev| {
                    if let Ok(value) = ev.value().parse::<f64>() {
                        position.set(value.clamp(0.0, 100.0));
                    }
                },
            }
        }
    }
}
