//! Illustration Client — wraps the OpenAI image API (`gpt-image-1`) for
//! fresh ukiyo-e generation and for re-editing an existing artwork with the
//! English haiku typeset inside it.

pub mod artifacts;
pub mod handlers;
pub mod prompt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm_client::retry::{with_backoff, RetryPolicy};

const IMAGE_GENERATION_URL: &str = "https://api.openai.com/v1/images/generations";
const IMAGE_EDIT_URL: &str = "https://api.openai.com/v1/images/edits";
/// The image model; hardcoded like the chat model to prevent drift.
pub const IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_SIZE: &str = "1024x1024";
const REQUEST_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Image API returned no data")]
    EmptyData,
}

impl ImageError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ImageError::Http(e) => e.is_timeout() || e.is_connect(),
            ImageError::Api { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

/// Explicitly constructed image client, owned by app state.
#[derive(Clone)]
pub struct ImageClient {
    client: reqwest::Client,
    api_key: String,
    policy: RetryPolicy,
}

impl ImageClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
            policy: RetryPolicy::default(),
        }
    }

    /// Renders a fresh illustration for the prompt; returns PNG bytes.
    pub async fn generate(&self, prompt: &str, size: &str) -> Result<Vec<u8>, ImageError> {
        let body = GenerationRequest {
            model: IMAGE_MODEL,
            prompt,
            size,
            n: 1,
        };

        let body_ref = &body;
        let response = with_backoff(&self.policy, ImageError::is_retryable, move || async move {
            let response = self
                .client
                .post(IMAGE_GENERATION_URL)
                .bearer_auth(&self.api_key)
                .json(body_ref)
                .send()
                .await?;
            read_images_response(response).await
        })
        .await?;

        decode_first(response)
    }

    /// Edits an existing PNG with the given prompt (multipart upload);
    /// returns the edited PNG bytes.
    pub async fn edit(
        &self,
        base_png: &[u8],
        prompt: &str,
        size: &str,
    ) -> Result<Vec<u8>, ImageError> {
        let response = with_backoff(&self.policy, ImageError::is_retryable, move || async move {
            let image_part = reqwest::multipart::Part::bytes(base_png.to_vec())
                .file_name("image.png")
                .mime_str("image/png")?;
            let form = reqwest::multipart::Form::new()
                .part("image", image_part)
                .text("model", IMAGE_MODEL)
                .text("prompt", prompt.to_string())
                .text("size", size.to_string());

            let response = self
                .client
                .post(IMAGE_EDIT_URL)
                .bearer_auth(&self.api_key)
                .multipart(form)
                .send()
                .await?;
            read_images_response(response).await
        })
        .await?;

        decode_first(response)
    }
}

async fn read_images_response(response: reqwest::Response) -> Result<ImagesResponse, ImageError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ImageError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

fn decode_first(response: ImagesResponse) -> Result<Vec<u8>, ImageError> {
    let b64 = response
        .data
        .into_iter()
        .next()
        .and_then(|d| d.b64_json)
        .ok_or(ImageError::EmptyData)?;
    Ok(BASE64.decode(b64)?)
}
