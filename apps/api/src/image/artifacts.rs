//! Artifact persistence — writes the generated PNG and its metadata JSON to
//! the output directory with a shared timestamp so pairs sort together.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactPaths {
    pub png: PathBuf,
    pub meta: PathBuf,
}

/// Saves `png` as `haiku_image_{ts}.png` and `meta` as `haiku_meta_{ts}.json`
/// under `output_dir`, creating the directory if needed.
pub fn save_artifacts(
    png: &[u8],
    meta: &serde_json::Value,
    output_dir: &Path,
) -> Result<ArtifactPaths> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output dir {}", output_dir.display()))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let png_path = output_dir.join(format!("haiku_image_{ts}.png"));
    let meta_path = output_dir.join(format!("haiku_meta_{ts}.json"));

    fs::write(&png_path, png)
        .with_context(|| format!("Failed to write {}", png_path.display()))?;
    let meta_text =
        serde_json::to_string_pretty(meta).context("Failed to serialize artifact metadata")?;
    fs::write(&meta_path, meta_text)
        .with_context(|| format!("Failed to write {}", meta_path.display()))?;

    Ok(ArtifactPaths {
        png: png_path,
        meta: meta_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_saves_png_and_meta_pair() {
        let dir = tempfile::tempdir().unwrap();
        let meta = json!({
            "season": "冬",
            "haiku": {"ja": "初雪や"},
            "model": crate::image::IMAGE_MODEL,
        });

        let paths = save_artifacts(&[1, 2, 3], &meta, dir.path()).unwrap();

        assert!(paths.png.exists());
        assert!(paths.meta.exists());
        assert_eq!(fs::read(&paths.png).unwrap(), vec![1, 2, 3]);

        let loaded: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.meta).unwrap()).unwrap();
        assert_eq!(loaded["season"], "冬");
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("outputs").join("deep");
        let paths = save_artifacts(&[0], &json!({}), &nested).unwrap();
        assert!(paths.png.starts_with(&nested));
    }
}
