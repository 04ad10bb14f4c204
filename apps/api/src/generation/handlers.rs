//! Axum route handlers for the haiku generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::corpus::taxonomy::{aesthetic_info, AESTHETICS, EMOTIONS, SEASONS};
use crate::errors::AppError;
use crate::generation::generator::{
    generate_haiku, translate_haiku, HaikuRequest, HaikuResponse,
};
use crate::generation::reference_selector::{select_references, Reference, SelectionCriteria};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReferencesResponse {
    pub references: Vec<Reference>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub haiku_ja: String,
    #[serde(default)]
    pub explanation_ja: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub post_block: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/taxonomy
///
/// The fixed form vocabularies: seasons, emotions, and aesthetics with their
/// descriptive text.
pub async fn handle_taxonomy() -> Json<Value> {
    let aesthetics: Vec<Value> = AESTHETICS
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "info": aesthetic_info(name),
            })
        })
        .collect();

    Json(json!({
        "seasons": SEASONS,
        "emotions": EMOTIONS,
        "aesthetics": aesthetics,
    }))
}

/// POST /api/v1/references
///
/// Runs reference selection for the given criteria so the client can preview
/// and lock references before generating.
pub async fn handle_select_references(
    State(state): State<AppState>,
    Json(criteria): Json<SelectionCriteria>,
) -> Result<Json<ReferencesResponse>, AppError> {
    let references = {
        let mut rng = rand::thread_rng();
        select_references(&state.corpus, &criteria, &mut rng)
    };
    info!(
        "Selected {} references (k={}, season={:?})",
        references.len(),
        criteria.k,
        criteria.season
    );
    Ok(Json(ReferencesResponse { references }))
}

/// POST /api/v1/haiku
///
/// Full generation: selects references (unless the client passes locked
/// ones back) and asks the LLM for a new haiku with explanation and
/// per-reference reasons.
pub async fn handle_generate_haiku(
    State(state): State<AppState>,
    Json(request): Json<HaikuRequest>,
) -> Result<Json<HaikuResponse>, AppError> {
    let references = match request.references.clone() {
        Some(locked) => locked,
        None => {
            let mut rng = rand::thread_rng();
            select_references(&state.corpus, &request.criteria, &mut rng)
        }
    };

    let response = generate_haiku(&state.llm, &request, references).await?;
    Ok(Json(response))
}

/// POST /api/v1/haiku/translation
///
/// Produces the four-block English X post for a finished haiku.
pub async fn handle_translate(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    if request.haiku_ja.trim().is_empty() {
        return Err(AppError::Validation("haiku_ja cannot be empty".to_string()));
    }

    let post_block =
        translate_haiku(&state.llm, &request.haiku_ja, &request.explanation_ja).await?;
    Ok(Json(TranslateResponse { post_block }))
}
