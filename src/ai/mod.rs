/// AI module for roomstyler
///
/// This module is the boundary to the hosted generation service. The studio
/// only sees the `GenerationClient` trait; `GeminiClient` implements it over
/// the Gemini REST API.
///
/// # Architecture
///
/// - `client` - The `GenerationClient` contract and its error type
/// - `gemini` - Gemini `generateContent` implementation
/// - `prompts` - Instruction templates and the shopping response schema
///
/// # Usage
///
/// ```rust,no_run
/// use roomstyler::ai::{GeminiClient, GenerationClient};
/// use roomstyler::config::AppConfig;
/// use roomstyler::types::EncodedImage;
///
/// # async fn example(room: EncodedImage) -> anyhow::Result<()> {
/// let client = GeminiClient::new(&AppConfig::from_env()?)?;
/// let instruction = client.refine_instruction("the room feels too dark").await;
/// let edited = client.edit_image(&room, &instruction).await?;
/// # Ok(())
/// # }
/// ```
mod client;
mod gemini;
pub mod prompts;

// Re-export main types
pub use client::{GenerationClient, GenerationError, GenerationResult};
pub use gemini::GeminiClient;
