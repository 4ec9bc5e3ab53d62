use super::client::{GenerationClient, GenerationError, GenerationResult};
use super::prompts::{SHOPPING_PROMPT, SHOPPING_RESPONSE_SCHEMA, refine_system_instruction};
use crate::config::AppConfig;
use crate::types::{EncodedImage, ShoppingItem};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    refine_model: String,
    edit_model: String,
    shopping_model: String,
    reply_language: String,
}

// Gemini wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn image(image: &EncodedImage) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type.clone(),
                data: image.data.clone(),
            }),
        }
    }
}

impl Content {
    fn user(parts: Vec<Part>) -> Self {
        Self {
            parts,
            role: Some("user".to_string()),
        }
    }
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    fn text(&self) -> Option<String> {
        let joined: String = self
            .first_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    fn image(&self) -> Option<EncodedImage> {
        self.first_parts()
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| !inline.data.is_empty())
            .map(|inline| EncodedImage::new(inline.data.clone(), inline.mime_type.clone()))
    }

    /// Why no content came back, for error messages.
    fn missing_reason(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            return format!("blocked: {reason}");
        }
        match self.candidates.first() {
            Some(candidate) => candidate
                .finish_reason
                .clone()
                .map(|reason| format!("finish reason: {reason}"))
                .unwrap_or_else(|| "no image part in response".to_string()),
            None => "no candidates in response".to_string(),
        }
    }
}

fn parse_shopping_items(text: &str) -> GenerationResult<Vec<ShoppingItem>> {
    let json = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(json)
        .map_err(|e| GenerationError::InvalidResponse(format!("shopping items: {e}")))
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> GenerationResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            refine_model: config.refine_model.clone(),
            edit_model: config.edit_model.clone(),
            shopping_model: config.shopping_model.clone(),
            reply_language: config.reply_language.clone(),
        })
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GenerationResult<GenerateContentResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let parts: usize = request.contents.iter().map(|c| c.parts.len()).sum();
        tracing::debug!(model, parts, "gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(model, %status, "gemini request failed");
            return Err(GenerationError::Api { status, body });
        }

        tracing::debug!(model, bytes = body.len(), "gemini response");
        serde_json::from_str(&body).map_err(|e| GenerationError::InvalidResponse(e.to_string()))
    }

    async fn try_refine(&self, request: &str) -> GenerationResult<String> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(request)])],
            system_instruction: Some(Content {
                parts: vec![Part::text(refine_system_instruction(&self.reply_language))],
                role: None,
            }),
            generation_config: None,
        };
        let response = self.generate(&self.refine_model, &body).await?;
        response
            .text()
            .ok_or_else(|| GenerationError::InvalidResponse("empty refinement".to_string()))
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn refine_instruction(&self, request: &str) -> String {
        match self.try_refine(request).await {
            Ok(instruction) => instruction,
            Err(err) => {
                tracing::warn!(error = %err, "prompt refinement failed, using the request as-is");
                request.to_string()
            }
        }
    }

    async fn edit_image(
        &self,
        image: &EncodedImage,
        instruction: &str,
    ) -> GenerationResult<EncodedImage> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::image(image),
                Part::text(instruction),
            ])],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE"]),
                ..Default::default()
            }),
        };
        let response = self.generate(&self.edit_model, &body).await?;
        match response.image() {
            Some(edited) => {
                tracing::info!(mime = %edited.mime_type, bytes = edited.data.len(), "image edit complete");
                Ok(edited)
            }
            None => {
                let reason = response.missing_reason();
                tracing::warn!(%reason, "image edit returned no image");
                Err(GenerationError::NoImage { reason })
            }
        }
    }

    async fn find_shoppable_items(
        &self,
        image: &EncodedImage,
    ) -> GenerationResult<Vec<ShoppingItem>> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::image(image),
                Part::text(SHOPPING_PROMPT),
            ])],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                response_schema: Some(SHOPPING_RESPONSE_SCHEMA.clone()),
                ..Default::default()
            }),
        };
        let response = self.generate(&self.shopping_model, &body).await?;
        let text = response.text().ok_or_else(|| {
            GenerationError::InvalidResponse(response.missing_reason())
        })?;
        parse_shopping_items(&text)
    }
}
