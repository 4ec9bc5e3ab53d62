use once_cell::sync::Lazy;
use serde_json::{Value, json};

pub fn style_instruction(style: &str) -> String {
    format!("Redesign this room in a {style} style.")
}

pub fn refine_system_instruction(language: &str) -> String {
    format!(
        "You are an expert interior design assistant. Your task is to translate a user's \
conversational design request into a clear, concise, and direct instruction for an image \
generation AI. The instruction should be a short phrase or sentence describing the visual \
change. For example, if the user says 'I think the room needs to be brighter and more \
welcoming', you should output 'Make the walls a lighter color and add warm lighting'. Only \
output the direct instruction for the AI, nothing else. The output should be in {language}."
    )
}

pub const SHOPPING_PROMPT: &str = "Based on the items in this image, provide a list of 5 similar shoppable items. For each item, provide the item name, a URL to an online store, and an approximate price in USD.";

pub static SHOPPING_RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "itemName": { "type": "STRING" },
                "url": { "type": "STRING" },
                "price": { "type": "STRING" }
            },
            "required": ["itemName", "url", "price"]
        }
    })
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_instruction_template() {
        assert_eq!(
            style_instruction("Minimalist"),
            "Redesign this room in a Minimalist style."
        );
    }

    #[test]
    fn test_refine_instruction_names_language() {
        assert!(refine_system_instruction("Turkish").ends_with("The output should be in Turkish."));
    }

    #[test]
    fn test_shopping_schema_requires_all_fields() {
        let required = SHOPPING_RESPONSE_SCHEMA["items"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 3);
    }
}
