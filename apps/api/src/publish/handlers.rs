//! Axum route handler for posting the final text and image to X.

use std::path::{Path, PathBuf};

use axum::{extract::State, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::publish::PublishError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub text: String,
    /// Base64-encoded PNG to attach. Mutually exclusive with `image_path`.
    #[serde(default)]
    pub image_b64: Option<String>,
    /// Path of a previously saved artifact PNG. Must resolve inside the
    /// configured output directory; anything else is rejected.
    #[serde(default)]
    pub image_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub url: String,
}

/// POST /api/v1/posts
///
/// Posts the text (truncated to 280 chars) with an optional image to X.
/// Returns 503 when no access token is configured.
pub async fn handle_publish(
    State(state): State<AppState>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, AppError> {
    let publisher = state
        .publisher
        .as_ref()
        .ok_or(AppError::PublishingDisabled)?;

    let image = resolve_image(&request, &state.config.output_dir)?;

    let url = publisher
        .post(&request.text, image.as_deref())
        .await
        .map_err(|e| match e {
            PublishError::EmptyText => {
                AppError::Validation("Post text cannot be empty".to_string())
            }
            other => AppError::Publish(other.to_string()),
        })?;

    Ok(Json(PublishResponse { url }))
}

/// Loads the attachment bytes from the request. `image_b64` and `image_path`
/// are mutually exclusive; a path is only honored after it resolves inside
/// `output_dir`.
fn resolve_image(
    request: &PublishRequest,
    output_dir: &Path,
) -> Result<Option<Vec<u8>>, AppError> {
    match (&request.image_b64, &request.image_path) {
        (Some(_), Some(_)) => Err(AppError::Validation(
            "Send either image_b64 or image_path, not both".to_string(),
        )),
        (Some(b64), None) => Ok(Some(BASE64.decode(b64).map_err(|e| {
            AppError::Validation(format!("image_b64 is not valid base64: {e}"))
        })?)),
        (None, Some(path)) => {
            let resolved = resolve_artifact_path(path, output_dir)?;
            Ok(Some(std::fs::read(&resolved).map_err(|e| {
                AppError::Validation(format!("Cannot read image at {}: {e}", resolved.display()))
            })?))
        }
        (None, None) => Ok(None),
    }
}

/// Canonicalizes `requested` and verifies it stays under `output_dir`.
/// Symlinks and `..` components are resolved before the containment check,
/// so a path that escapes the artifact directory is rejected even when it
/// textually starts with it.
fn resolve_artifact_path(requested: &Path, output_dir: &Path) -> Result<PathBuf, AppError> {
    let root = output_dir.canonicalize().map_err(|e| {
        AppError::Validation(format!(
            "Artifact directory {} is not readable: {e}",
            output_dir.display()
        ))
    })?;
    let resolved = requested.canonicalize().map_err(|e| {
        AppError::Validation(format!("Cannot read image at {}: {e}", requested.display()))
    })?;
    if !resolved.starts_with(&root) {
        return Err(AppError::Validation(format!(
            "image_path must point inside the artifact directory {}",
            output_dir.display()
        )));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn request(image_b64: Option<&str>, image_path: Option<PathBuf>) -> PublishRequest {
        PublishRequest {
            text: "初雪や".to_string(),
            image_b64: image_b64.map(str::to_string),
            image_path,
        }
    }

    #[test]
    fn test_path_inside_output_dir_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("haiku_image_20260830_120000.png");
        fs::write(&png, [1, 2, 3]).unwrap();

        let image = resolve_image(&request(None, Some(png)), dir.path()).unwrap();
        assert_eq!(image, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_path_outside_output_dir_is_rejected() {
        let artifacts = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let secret = elsewhere.path().join(".env");
        fs::write(&secret, "OPENAI_API_KEY=sk-secret").unwrap();

        let result = resolve_image(&request(None, Some(secret)), artifacts.path());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_traversal_out_of_output_dir_is_rejected() {
        let parent = tempfile::tempdir().unwrap();
        let artifacts = parent.path().join("outputs");
        fs::create_dir(&artifacts).unwrap();
        let secret = parent.path().join("secret.txt");
        fs::write(&secret, "hidden").unwrap();

        // Textually under outputs/, resolves to the parent after `..`.
        let sneaky = artifacts.join("..").join("secret.txt");
        let result = resolve_image(&request(None, Some(sneaky)), &artifacts);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_missing_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("no_such.png");
        let result = resolve_image(&request(None, Some(gone)), dir.path());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_both_sources_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.png");
        fs::write(&png, [0]).unwrap();

        let result = resolve_image(&request(Some("AA=="), Some(png)), dir.path());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_b64_source_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let encoded = BASE64.encode([9, 9]);
        let image = resolve_image(&request(Some(&encoded), None), dir.path()).unwrap();
        assert_eq!(image, Some(vec![9, 9]));
    }

    #[test]
    fn test_invalid_b64_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_image(&request(Some("not base64!!"), None), dir.path());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_no_image_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let image = resolve_image(&request(None, None), dir.path()).unwrap();
        assert!(image.is_none());
    }
}
