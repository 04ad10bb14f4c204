//! Corpus — the fixed collection of Issa haiku available for reference
//! selection, loaded once at startup from CSV and immutable thereafter.
//!
//! The production CSV carries Japanese headers (`俳句`, `読み`, ...); serde
//! aliases map them onto the Rust fields. Missing columns degrade to empty
//! defaults rather than failing the load.

pub mod taxonomy;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

/// One row of the haiku dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorpusEntry {
    #[serde(rename = "俳句", default)]
    pub text: String,
    /// Phonetic rendering; may be empty.
    #[serde(rename = "読み", default)]
    pub reading: String,
    /// Free-text seasonal word candidates; may be empty.
    #[serde(rename = "季語候補", default)]
    pub season_word_candidates: String,
    #[serde(rename = "季節", default)]
    pub season: String,
    /// Plutchik primary emotion tag.
    #[serde(rename = "plutchik_main", default)]
    pub emotion: String,
    /// Japanese aesthetic tag.
    #[serde(rename = "nihon_main", default)]
    pub aesthetic: String,
    #[serde(rename = "出典", default)]
    pub source: String,
    #[serde(rename = "年", default)]
    pub year: String,
    /// Marks onomatopoeic / repetitive phrasing.
    #[serde(
        rename = "has_repetition",
        default,
        deserialize_with = "de_loose_bool"
    )]
    pub has_repetition: bool,
}

/// Accepts the boolean spellings that show up in exported CSVs:
/// `True`/`False` (pandas), `true`/`false`, `1`/`0`, and empty.
fn de_loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        raw.as_deref().map(str::trim),
        Some("True") | Some("true") | Some("TRUE") | Some("1")
    ))
}

/// The loaded haiku corpus. Treated as immutable for the process lifetime
/// and shared behind an `Arc` in app state.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    pub fn new(entries: Vec<CorpusEntry>) -> Self {
        Self { entries }
    }

    /// Loads the corpus CSV from disk. Strips a UTF-8 BOM if present
    /// (the production file is exported as utf-8-sig).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open corpus CSV at {}", path.display()))?;
        let corpus = Self::from_reader(file)?;
        info!(
            "Corpus loaded: {} entries from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }

    /// Reads corpus rows from any CSV source. Malformed rows are skipped
    /// with a warning; they never abort the load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(strip_bom(reader)?);

        let mut entries = Vec::new();
        for (index, record) in csv_reader.deserialize::<CorpusEntry>().enumerate() {
            match record {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping malformed corpus row {}: {e}", index + 2),
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Buffers the input and drops a leading UTF-8 BOM so the first header
/// name matches its serde alias.
fn strip_bom<R: Read>(mut reader: R) -> Result<std::io::Cursor<Vec<u8>>> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .context("Failed to read corpus CSV")?;
    if buf.starts_with(&[0xEF, 0xBB, 0xBF]) {
        buf.drain(..3);
    }
    Ok(std::io::Cursor::new(buf))
}
