//! Haiku Generation — turns selected references plus the user's form input
//! into a new 5-7-5 haiku via the LLM, and a separate English X-post block.
//!
//! Reference selection happens before the async LLM call (the caller resolves
//! references first); this module only builds prompts and interprets output.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::{
    HAIKU_PROMPT_TEMPLATE, HAIKU_SYSTEM, TRANSLATION_PROMPT_TEMPLATE, TRANSLATION_SYSTEM,
};
use crate::generation::reference_selector::{Reference, SelectionCriteria};
use crate::llm_client::{LlmClient, LlmError};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for haiku generation. Criteria are flattened so the client
/// sends one flat object; previously locked references may be passed back to
/// skip re-selection.
#[derive(Debug, Clone, Deserialize)]
pub struct HaikuRequest {
    #[serde(flatten)]
    pub criteria: SelectionCriteria,
    /// The user's free-text experience memo.
    #[serde(default)]
    pub experience: String,
    /// Locked references from an earlier selection call, if any.
    #[serde(default)]
    pub references: Option<Vec<Reference>>,
}

/// The LLM's structured output. Every field defaults to empty so a partial
/// JSON object still produces a usable draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HaikuDraft {
    #[serde(default)]
    pub haiku_ja: String,
    #[serde(default)]
    pub explanation_ja: String,
    #[serde(default)]
    pub reasons_refs_ja: String,
    #[serde(default)]
    pub references_numbered: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HaikuResponse {
    #[serde(flatten)]
    pub draft: HaikuDraft,
    pub references: Vec<Reference>,
}

#[derive(Debug, Default, Deserialize)]
struct PostBlock {
    #[serde(default)]
    post_block: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Generates a new haiku from the given references and form input.
///
/// A model response that cannot be parsed as JSON degrades to an empty draft
/// carrying only the numbered references, matching the selector's
/// never-fatal posture; transport and API errors still propagate.
pub async fn generate_haiku(
    llm: &LlmClient,
    request: &HaikuRequest,
    references: Vec<Reference>,
) -> Result<HaikuResponse, AppError> {
    let references_numbered = numbered_references(&references);
    let user_prompt = build_haiku_prompt(request, &references_numbered);

    info!(
        "Haiku prompt built: system={} chars, user={} chars, {} references",
        HAIKU_SYSTEM.chars().count(),
        user_prompt.chars().count(),
        references.len()
    );

    let draft = match llm.call_json::<HaikuDraft>(HAIKU_SYSTEM, &user_prompt).await {
        Ok(mut draft) => {
            if draft.references_numbered.is_empty() {
                draft.references_numbered = references_numbered;
            }
            draft
        }
        Err(LlmError::Parse(e)) => {
            warn!("Haiku response was not valid JSON even after repair: {e}");
            HaikuDraft {
                references_numbered,
                ..Default::default()
            }
        }
        Err(e) => return Err(AppError::Llm(format!("Haiku generation failed: {e}"))),
    };

    Ok(HaikuResponse { draft, references })
}

/// Generates the English X-post block for a finished haiku.
pub async fn translate_haiku(
    llm: &LlmClient,
    haiku_ja: &str,
    explanation_ja: &str,
) -> Result<String, AppError> {
    let user_prompt = TRANSLATION_PROMPT_TEMPLATE
        .replace("{haiku_ja}", haiku_ja)
        .replace("{explanation_ja}", explanation_ja);

    let block: PostBlock = llm
        .call_json(TRANSLATION_SYSTEM, &user_prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Translation failed: {e}")))?;

    if block.post_block.trim().is_empty() {
        return Err(AppError::Llm(
            "Translation returned an empty post block".to_string(),
        ));
    }
    Ok(block.post_block)
}

/// Formats references for the prompt: `1. {text} | 出典: {source}` per line.
pub fn numbered_references(references: &[Reference]) -> String {
    references
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} | 出典: {}", i + 1, r.text, r.source))
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_haiku_prompt(request: &HaikuRequest, references_numbered: &str) -> String {
    let c: &SelectionCriteria = &request.criteria;
    HAIKU_PROMPT_TEMPLATE
        .replace("{season}", c.season.as_deref().unwrap_or(""))
        .replace("{emotion}", c.emotion.as_deref().unwrap_or(""))
        .replace("{aesthetic}", c.aesthetic.as_deref().unwrap_or(""))
        .replace("{keyword}", c.keyword.as_deref().unwrap_or(""))
        .replace("{experience}", &request.experience)
        .replace("{references_numbered}", references_numbered)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
