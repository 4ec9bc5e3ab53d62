use crate::types::{EncodedImage, ShoppingItem};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no API key configured; set GEMINI_API_KEY")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("the model did not return an image ({reason}); this can be caused by safety filtering or an unclear instruction")]
    NoImage { reason: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// The external image/text service the studio depends on.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Turns a conversational request into a short, direct edit
    /// instruction. Returns the request unchanged when refinement fails.
    async fn refine_instruction(&self, request: &str) -> String;

    async fn edit_image(
        &self,
        image: &EncodedImage,
        instruction: &str,
    ) -> GenerationResult<EncodedImage>;

    async fn find_shoppable_items(&self, image: &EncodedImage)
    -> GenerationResult<Vec<ShoppingItem>>;
}
