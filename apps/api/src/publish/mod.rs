//! Publishing Client — posts the final haiku text and illustration to X.
//!
//! Uses an OAuth2 user-context access token. When no token is configured the
//! app simply runs without a publisher; handlers report that cleanly instead
//! of failing at startup.

pub mod handlers;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::llm_client::retry::{with_backoff, RetryPolicy};

const MEDIA_UPLOAD_URL: &str = "https://api.x.com/2/media/upload";
const CREATE_TWEET_URL: &str = "https://api.x.com/2/tweets";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// X counts characters, not bytes.
const MAX_POST_CHARS: usize = 280;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Post text is empty")]
    EmptyText,

    #[error("API response missing {0}")]
    MissingField(&'static str),
}

impl PublishError {
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishError::Http(e) => e.is_timeout() || e.is_connect(),
            PublishError::Api { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<TweetMedia>,
}

#[derive(Debug, Serialize)]
struct TweetMedia {
    media_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: Option<TweetData>,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    data: Option<MediaData>,
}

#[derive(Debug, Deserialize)]
struct MediaData {
    id: String,
}

/// Explicitly constructed publishing client, owned by app state.
#[derive(Clone)]
pub struct XClient {
    client: reqwest::Client,
    access_token: String,
    policy: RetryPolicy,
}

impl XClient {
    pub fn new(access_token: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            access_token,
            policy: RetryPolicy::default(),
        }
    }

    /// Posts `text` (truncated to 280 chars) with an optional PNG attachment.
    /// Returns the post URL.
    pub async fn post(&self, text: &str, image: Option<&[u8]>) -> Result<String, PublishError> {
        let text = prepare_text(text)?;

        let media_id = match image {
            Some(png) => Some(self.upload_media(png).await?),
            None => None,
        };

        let tweet_id = self.create_tweet(&text, media_id).await?;
        let url = format!("https://x.com/i/web/status/{tweet_id}");
        info!("Posted to X: {url}");
        Ok(url)
    }

    async fn upload_media(&self, png: &[u8]) -> Result<String, PublishError> {
        let response = with_backoff(&self.policy, PublishError::is_retryable, move || async move {
            let media_part = reqwest::multipart::Part::bytes(png.to_vec())
                .file_name("image.png")
                .mime_str("image/png")?;
            let form = reqwest::multipart::Form::new()
                .part("media", media_part)
                .text("media_category", "tweet_image");

            let response = self
                .client
                .post(MEDIA_UPLOAD_URL)
                .bearer_auth(&self.access_token)
                .multipart(form)
                .send()
                .await?;
            read_json::<MediaUploadResponse>(response).await
        })
        .await?;

        response
            .data
            .map(|d| d.id)
            .ok_or(PublishError::MissingField("media id"))
    }

    async fn create_tweet(
        &self,
        text: &str,
        media_id: Option<String>,
    ) -> Result<String, PublishError> {
        let body = CreateTweetRequest {
            text,
            media: media_id.map(|id| TweetMedia {
                media_ids: vec![id],
            }),
        };

        let body_ref = &body;
        let response = with_backoff(&self.policy, PublishError::is_retryable, move || async move {
            let response = self
                .client
                .post(CREATE_TWEET_URL)
                .bearer_auth(&self.access_token)
                .json(body_ref)
                .send()
                .await?;
            read_json::<CreateTweetResponse>(response).await
        })
        .await?;

        response
            .data
            .map(|d| d.id)
            .ok_or(PublishError::MissingField("tweet id"))
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PublishError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(PublishError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

fn prepare_text(text: &str) -> Result<String, PublishError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PublishError::EmptyText);
    }
    Ok(truncate_post(text))
}

/// Keeps the first 277 characters and appends `…` when over the limit.
fn truncate_post(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= MAX_POST_CHARS {
        return text.to_string();
    }
    let mut truncated: String = chars[..MAX_POST_CHARS - 3].iter().collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate_post("🌿 初雪や"), "🌿 初雪や");
    }

    #[test]
    fn test_long_text_truncated_by_chars_not_bytes() {
        let long: String = "雪".repeat(300);
        let truncated = truncate_post(&long);
        assert_eq!(truncated.chars().count(), 278);
        assert!(truncated.ends_with('…'));
    }

    #[test]
    fn test_exactly_280_chars_not_truncated() {
        let text: String = "a".repeat(280);
        assert_eq!(truncate_post(&text), text);
    }

    #[test]
    fn test_empty_text_rejected() {
        assert!(matches!(prepare_text("   "), Err(PublishError::EmptyText)));
    }

    #[test]
    fn test_whitespace_trimmed_before_posting() {
        assert_eq!(prepare_text("  post  ").unwrap(), "post");
    }

    #[test]
    fn test_tweet_body_omits_media_when_absent() {
        let body = CreateTweetRequest {
            text: "hello",
            media: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("media").is_none());
    }

    #[test]
    fn test_tweet_body_carries_media_ids() {
        let body = CreateTweetRequest {
            text: "hello",
            media: Some(TweetMedia {
                media_ids: vec!["123".to_string()],
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["media"]["media_ids"][0], "123");
    }
}
