//! Axum route handlers for illustration generation and caption re-editing.

use axum::{extract::State, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::errors::AppError;
use crate::generation::reference_selector::Reference;
use crate::image::artifacts::{save_artifacts, ArtifactPaths};
use crate::image::prompt::{build_caption_directives, build_image_prompt, CaptionLayout};
use crate::image::{DEFAULT_SIZE, IMAGE_MODEL};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IllustrationRequest {
    pub haiku_ja: String,
    #[serde(default)]
    pub explanation_ja: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub aesthetic: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub experience: String,
    /// Echoed into the artifact metadata only.
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default = "default_size")]
    pub size: String,
}

fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

#[derive(Debug, Serialize)]
pub struct IllustrationResponse {
    pub prompt: String,
    /// Base64-encoded PNG.
    pub image_b64: String,
    pub artifacts: ArtifactPaths,
}

#[derive(Debug, Deserialize)]
pub struct CaptionRequest {
    /// Base64-encoded PNG of the artwork to edit.
    pub image_b64: String,
    /// The English haiku to typeset (exact line breaks preserved).
    #[serde(default)]
    pub haiku_en: String,
    #[serde(flatten)]
    pub layout: CaptionLayout,
    /// Full directive override; when set, `haiku_en` and layout are ignored.
    #[serde(default)]
    pub directives: Option<String>,
    #[serde(default = "default_size")]
    pub size: String,
}

#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub directives: String,
    pub image_b64: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/illustrations
///
/// Builds the ukiyo-e prompt for the haiku, renders it, and persists the
/// PNG + metadata pair under the output directory.
pub async fn handle_generate_illustration(
    State(state): State<AppState>,
    Json(request): Json<IllustrationRequest>,
) -> Result<Json<IllustrationResponse>, AppError> {
    if request.haiku_ja.trim().is_empty() {
        return Err(AppError::Validation("haiku_ja cannot be empty".to_string()));
    }

    let prompt = {
        let mut rng = rand::thread_rng();
        build_image_prompt(
            &request.haiku_ja,
            &request.explanation_ja,
            &request.season,
            &request.keyword,
            &request.aesthetic,
            &mut rng,
        )
    };

    let png = state
        .images
        .generate(&prompt, &request.size)
        .await
        .map_err(|e| AppError::Image(format!("Illustration failed: {e}")))?;
    info!("Illustration rendered: {} bytes", png.len());

    let meta = json!({
        "season": request.season,
        "emotion": request.emotion,
        "aesthetic": request.aesthetic,
        "keyword": request.keyword,
        "experience": request.experience,
        "haiku": { "ja": request.haiku_ja },
        "explanation_ja": request.explanation_ja,
        "references": request.references,
        "image_prompt": prompt,
        "size": request.size,
        "model": IMAGE_MODEL,
        "created_at": Local::now().to_rfc3339(),
    });
    let artifacts = save_artifacts(&png, &meta, &state.config.output_dir)?;

    Ok(Json(IllustrationResponse {
        prompt,
        image_b64: BASE64.encode(&png),
        artifacts,
    }))
}

/// POST /api/v1/illustrations/caption
///
/// Re-edits an existing artwork so the English haiku is typeset inside it.
pub async fn handle_caption_illustration(
    State(state): State<AppState>,
    Json(request): Json<CaptionRequest>,
) -> Result<Json<CaptionResponse>, AppError> {
    let base_png = BASE64
        .decode(&request.image_b64)
        .map_err(|e| AppError::Validation(format!("image_b64 is not valid base64: {e}")))?;

    let directives = match request.directives {
        Some(custom) if !custom.trim().is_empty() => custom,
        _ => {
            if request.haiku_en.trim().is_empty() {
                return Err(AppError::Validation(
                    "haiku_en cannot be empty when no directives are given".to_string(),
                ));
            }
            build_caption_directives(&request.haiku_en, &request.layout)
        }
    };

    let edited = state
        .images
        .edit(&base_png, &directives, &request.size)
        .await
        .map_err(|e| AppError::Image(format!("Caption edit failed: {e}")))?;

    Ok(Json(CaptionResponse {
        directives,
        image_b64: BASE64.encode(&edited),
    }))
}
