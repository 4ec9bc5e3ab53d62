use base64::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub item_name: String,
    pub url: String,
    pub price: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ShoppingItem>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            items: Vec::new(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            items: Vec::new(),
        }
    }

    pub fn ai_with_items(text: impl Into<String>, items: Vec<ShoppingItem>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            items,
        }
    }
}

/// A base64 image payload together with its MIME type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: BASE64_STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Encodes an uploaded file, taking the MIME type from its name and
    /// falling back to the file signature.
    pub fn from_upload(file_name: &str, bytes: &[u8]) -> Option<Self> {
        let mime_type = mime_from_file_name(file_name).or_else(|| sniff_mime(bytes))?;
        Some(Self::from_bytes(bytes, mime_type))
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64_STANDARD.decode(&self.data)
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Upload formats accepted by the picker.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg"];

pub fn mime_from_file_name(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        Some("image/png")
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDesign {
    pub id: u64,
    pub style: String,
    pub original_image: String,
    pub generated_image: String,
    pub original_mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_mime_type: Option<String>,
}

impl SavedDesign {
    pub fn original(&self) -> EncodedImage {
        EncodedImage::new(self.original_image.clone(), self.original_mime_type.clone())
    }

    pub fn generated(&self) -> EncodedImage {
        let mime_type = self
            .generated_mime_type
            .clone()
            .unwrap_or_else(|| self.original_mime_type.clone());
        EncodedImage::new(self.generated_image.clone(), mime_type)
    }
}

/// Single-slot snapshot of the session being edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSavedDesign {
    pub original_image_base64: String,
    pub generated_image_base64: String,
    #[serde(default)]
    pub current_style: Option<String>,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_mime_type: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AutoSaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
}
