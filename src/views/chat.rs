use crate::session::SessionPhase;
use crate::studio::Studio;
use crate::types::{ChatMessage, Sender, ShoppingItem};
use crate::ui::AppServices;
use crate::views::shared::{start_chat, start_shopping};
use dioxus::events::Key;
use dioxus::prelude::*;

#[component]
pub fn ChatPanel(studio: Signal<Studio>) -> Element {
    let services = use_context::<AppServices>();
    let mut input = use_signal(String::new);

    let (messages, phase, busy) = {
        let state = studio.read();
        (
            state
                .session()
                .map(|s| s.chat_history.clone())
                .unwrap_or_default(),
            state.phase(),
            state.is_loading(),
        )
    };
    let typing = matches!(phase, SessionPhase::Chatting | SessionPhase::ShoppingLookup);

    let chat_client = services.client.clone();
    let mut send_message = move |text: String| {
        if text.trim().is_empty() || busy {
            return;
        }
        input.set(String::new());
        start_chat(studio, chat_client.clone(), text);
    };
    let mut send_from_key = send_message.clone();

    let shopping_client = services.client.clone();

    rsx! {
        div { class: "chatbot",
            div { class: "chat-list",
                for (i, msg) in messages.into_iter().enumerate() {
                    MessageBubble { key: "{i}", message: msg }
                }
                if typing {
                    div { class: "message-row",
                        div { class: "bubble ai typing", "Thinking..." }
                    }
                }
            }
            form {
                class: "composer",
                onsubmit: move |ev| ev.prevent_default(),
                input {
                    r#type: "text",
                    placeholder: "e.g. make the rug blue",
                    value: "{input}",
                    disabled: busy,
                    oninput: move |ev| input.set(ev.value()),
                    onkeydown: move |ev| {
                        if ev.key() == Key::Enter && !ev.modifiers().shift() {
                            ev.prevent_default();
                            send_from_key(input());
                        }
                    },
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy || input().trim().is_empty(),
                    onclick: move |_| send_message(input()),
                    "Send"
                }
            }
            div { class: "chat-footer",
                button {
                    class: "btn btn-block",
                    disabled: busy,
                    onclick: move |_| start_shopping(studio, shopping_client.clone()),
                    "Find shoppable items"
                }
            }
        }
    }
}

#[component]
fn MessageBubble(message: ChatMessage) -> Element {
    let side = match message.sender {
        Sender::User => "user",
        Sender::Ai => "ai",
    };
    rsx! {
        div { class: format_args!("message-row {}", side),
            div { class: format_args!("bubble {}", side),
                p { "{message.text}" }
                if !message.items.is_empty() {
                    ShoppingList { items: message.items.clone() }
                }
            }
        }
    }
}

#[component]
fn ShoppingList(items: Vec<ShoppingItem>) -> Element {
    rsx! {
        ul { class: "shopping-list",
            for item in items {
                li { key: "{item.url}",
                    a { href: "{item.url}", target: "_blank", rel: "noopener noreferrer", "{item.item_name}" }
                    " - {item.price}"
                }
            }
        }
    }
}
