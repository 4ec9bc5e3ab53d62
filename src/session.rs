use crate::types::{AutoSavedDesign, ChatMessage, EncodedImage, SavedDesign};

pub const WELCOME_MESSAGE: &str = "Welcome! I'm your AI interior designer. Pick a style below to get started, or chat with me to refine the design.";

/// The photo currently being edited and everything said about it.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub original: EncodedImage,
    pub generated: Option<EncodedImage>,
    pub style: Option<String>,
    pub chat_history: Vec<ChatMessage>,
}

/// Work the studio is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    Styling,
    Chatting,
    ShoppingLookup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Uploaded,
    Styling,
    Chatting,
    ShoppingLookup,
}

impl From<Activity> for SessionPhase {
    fn from(activity: Activity) -> Self {
        match activity {
            Activity::Styling => SessionPhase::Styling,
            Activity::Chatting => SessionPhase::Chatting,
            Activity::ShoppingLookup => SessionPhase::ShoppingLookup,
        }
    }
}

impl Session {
    pub fn new(original: EncodedImage) -> Self {
        Self {
            original,
            generated: None,
            style: None,
            chat_history: vec![ChatMessage::ai(WELCOME_MESSAGE)],
        }
    }

    pub fn from_snapshot(snapshot: AutoSavedDesign) -> Self {
        let generated_mime = snapshot
            .generated_mime_type
            .unwrap_or_else(|| snapshot.mime_type.clone());
        let generated = (!snapshot.generated_image_base64.is_empty())
            .then(|| EncodedImage::new(snapshot.generated_image_base64, generated_mime));
        Self {
            original: EncodedImage::new(snapshot.original_image_base64, snapshot.mime_type),
            generated,
            style: snapshot.current_style,
            chat_history: snapshot.chat_history,
        }
    }

    /// The image further edits build on: the latest result, else the upload.
    pub fn working_image(&self) -> &EncodedImage {
        self.generated.as_ref().unwrap_or(&self.original)
    }

    /// Autosave snapshot. Nothing is worth saving before the first edit.
    pub fn snapshot(&self) -> Option<AutoSavedDesign> {
        let generated = self.generated.as_ref()?;
        Some(AutoSavedDesign {
            original_image_base64: self.original.data.clone(),
            generated_image_base64: generated.data.clone(),
            current_style: self.style.clone(),
            chat_history: self.chat_history.clone(),
            mime_type: self.original.mime_type.clone(),
            generated_mime_type: Some(generated.mime_type.clone()),
        })
    }

    /// Needs a finished edit and a chosen style.
    pub fn to_saved_design(&self, id: u64) -> Option<SavedDesign> {
        let generated = self.generated.as_ref()?;
        let style = self.style.clone()?;
        Some(SavedDesign {
            id,
            style,
            original_image: self.original.data.clone(),
            generated_image: generated.data.clone(),
            original_mime_type: self.original.mime_type.clone(),
            generated_mime_type: Some(generated.mime_type.clone()),
        })
    }
}
