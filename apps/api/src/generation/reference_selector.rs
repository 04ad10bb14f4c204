//! Reference Selector — picks reference haiku from the corpus for generation.
//!
//! Filter criteria come from the user form; randomness is injected so tests
//! can seed the draws and assert the deterministic structure. No LLM calls.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::corpus::taxonomy::SKIP_AESTHETIC;
use crate::corpus::{Corpus, CorpusEntry};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// User-chosen selection filters. All dimensions optional; an unset filter
/// passes every row through for that dimension.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionCriteria {
    pub season: Option<String>,
    pub emotion: Option<String>,
    /// The skip sentinel (`スキップ`) disables this filter like `None` does.
    pub aesthetic: Option<String>,
    /// Expanded through the synonym table before substring matching.
    pub keyword: Option<String>,
    /// Desired number of references.
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub prioritize_repetition: bool,
}

fn default_k() -> usize {
    3
}

/// A selected reference — the denormalized projection handed to the
/// generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub text: String,
    /// Formatted provenance: `"{source} ({year})"`.
    pub source: String,
    pub season: String,
    pub emotion: String,
    pub aesthetic: String,
    pub has_repetition: bool,
}

impl Reference {
    fn from_entry(entry: &CorpusEntry) -> Self {
        Self {
            text: entry.text.clone(),
            source: format!("{} ({})", entry.source.trim(), entry.year.trim()),
            season: entry.season.clone(),
            emotion: entry.emotion.clone(),
            aesthetic: entry.aesthetic.clone(),
            has_repetition: entry.has_repetition,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Selection algorithm
// ────────────────────────────────────────────────────────────────────────────

/// At most this many base-filtered rows are considered when filling the
/// result in corpus order.
const BASE_FILL_LIMIT: usize = 10;

/// Expands a user keyword into its search terms. Unknown keywords fall back
/// to the keyword itself.
pub fn synonym_terms(keyword: &str) -> Vec<String> {
    let terms: &[&str] = match keyword {
        "子供" => &["子供", "子", "童", "児", "小僧", "小坊主"],
        "海" => &["海", "夏の海", "海士", "海苔", "海辺"],
        "桜" => &["桜", "桜花", "遅桜", "山桜"],
        other => return vec![other.to_string()],
    };
    terms.iter().map(|t| t.to_string()).collect()
}

/// Selects up to `criteria.k` references from the corpus.
///
/// Result ordering:
/// 1. one random repetition-flagged entry from the FULL corpus, if requested
/// 2. one random free-text keyword match
/// 3. base-filtered rows in corpus order (first 10 considered)
/// 4. remaining free-text matches in corpus order
///
/// Entries are de-duplicated by `text` throughout. The priority picks (1–2)
/// deliberately bypass the base filters so they always have a chance to
/// appear regardless of season/emotion/aesthetic.
pub fn select_references(
    corpus: &Corpus,
    criteria: &SelectionCriteria,
    rng: &mut impl Rng,
) -> Vec<Reference> {
    if criteria.k == 0 {
        return Vec::new();
    }

    let entries = corpus.entries();
    let base = base_filtered(entries, criteria);

    let terms = criteria
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(synonym_terms)
        .unwrap_or_default();
    let free: Vec<&CorpusEntry> = if terms.is_empty() {
        Vec::new()
    } else {
        entries
            .iter()
            .filter(|e| {
                terms.iter().any(|t| {
                    e.text.contains(t.as_str())
                        || e.reading.contains(t.as_str())
                        || e.season_word_candidates.contains(t.as_str())
                })
            })
            .collect()
    };

    let mut picked: Vec<&CorpusEntry> = Vec::new();

    // Priority pick 1: a repetition-flagged entry, drawn from the whole corpus.
    if criteria.prioritize_repetition {
        let flagged: Vec<&CorpusEntry> = entries.iter().filter(|e| e.has_repetition).collect();
        if !flagged.is_empty() {
            picked.push(flagged[rng.gen_range(0..flagged.len())]);
        }
    }

    // Priority pick 2: one random free-text match.
    if !free.is_empty() {
        let candidate = free[rng.gen_range(0..free.len())];
        if !contains_text(&picked, candidate) {
            picked.push(candidate);
        }
    }

    // Fill from the base-filtered set in corpus order.
    for entry in base.iter().take(BASE_FILL_LIMIT) {
        if picked.len() >= criteria.k {
            break;
        }
        if !contains_text(&picked, entry) {
            picked.push(entry);
        }
    }

    // Pad from the remaining free-text matches.
    if picked.len() < criteria.k {
        for entry in &free {
            if picked.len() >= criteria.k {
                break;
            }
            if !contains_text(&picked, entry) {
                picked.push(entry);
            }
        }
    }

    picked.truncate(criteria.k);
    picked.into_iter().map(Reference::from_entry).collect()
}

/// Applies the exact-match filters. Deterministic: same corpus and criteria
/// always yield the same set, in corpus order.
pub fn base_filtered<'a>(
    entries: &'a [CorpusEntry],
    criteria: &SelectionCriteria,
) -> Vec<&'a CorpusEntry> {
    entries
        .iter()
        .filter(|e| {
            dimension_matches(criteria.season.as_deref(), &e.season)
                && dimension_matches(criteria.emotion.as_deref(), &e.emotion)
                && aesthetic_matches(criteria.aesthetic.as_deref(), &e.aesthetic)
        })
        .collect()
}

fn dimension_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted {
        Some(value) if !value.is_empty() => actual == value,
        _ => true,
    }
}

fn aesthetic_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted {
        Some(SKIP_AESTHETIC) => true,
        other => dimension_matches(other, actual),
    }
}

fn contains_text(picked: &[&CorpusEntry], candidate: &CorpusEntry) -> bool {
    picked.iter().any(|p| p.text == candidate.text)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(text: &str, season: &str, emotion: &str, aesthetic: &str) -> CorpusEntry {
        CorpusEntry {
            text: text.to_string(),
            season: season.to_string(),
            emotion: emotion.to_string(),
            aesthetic: aesthetic.to_string(),
            source: "七番日記".to_string(),
            year: "1814".to_string(),
            ..Default::default()
        }
    }

    fn autumn_corpus() -> Corpus {
        Corpus::new(vec![
            entry("秋の句一", "秋", "悲しみ", "もののあはれ"),
            entry("秋の句二", "秋", "悲しみ", "もののあはれ"),
            entry("秋の句三", "秋", "悲しみ", "もののあはれ"),
            entry("春の句", "春", "喜び", "愛らしさ"),
            entry("夏の句", "夏", "驚き", "素朴"),
        ])
    }

    fn criteria(season: &str, emotion: &str, aesthetic: &str) -> SelectionCriteria {
        SelectionCriteria {
            season: Some(season.to_string()),
            emotion: Some(emotion.to_string()),
            aesthetic: Some(aesthetic.to_string()),
            keyword: None,
            k: 3,
            prioritize_repetition: false,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_result_never_exceeds_k() {
        let corpus = autumn_corpus();
        for k in 0..6 {
            let mut c = SelectionCriteria {
                k,
                ..Default::default()
            };
            c.prioritize_repetition = true;
            let refs = select_references(&corpus, &c, &mut rng());
            assert!(refs.len() <= k, "k={k} returned {} refs", refs.len());
        }
    }

    #[test]
    fn test_k_zero_returns_empty() {
        let corpus = autumn_corpus();
        let c = SelectionCriteria {
            k: 0,
            prioritize_repetition: true,
            keyword: Some("秋".to_string()),
            ..Default::default()
        };
        assert!(select_references(&corpus, &c, &mut rng()).is_empty());
    }

    #[test]
    fn test_empty_corpus_returns_empty() {
        let corpus = Corpus::new(vec![]);
        let c = SelectionCriteria {
            season: Some("秋".to_string()),
            keyword: Some("桜".to_string()),
            k: 3,
            prioritize_repetition: true,
            ..Default::default()
        };
        assert!(select_references(&corpus, &c, &mut rng()).is_empty());
    }

    #[test]
    fn test_results_are_distinct_by_text() {
        let mut entries = vec![entry("重複句", "秋", "悲しみ", "もののあはれ"); 4];
        entries[0].has_repetition = true;
        entries.push(entry("別の句", "秋", "悲しみ", "もののあはれ"));
        let corpus = Corpus::new(entries);

        let mut c = criteria("秋", "悲しみ", "もののあはれ");
        c.prioritize_repetition = true;
        c.keyword = Some("重複".to_string());
        let refs = select_references(&corpus, &c, &mut rng());

        for (i, a) in refs.iter().enumerate() {
            for b in refs.iter().skip(i + 1) {
                assert_ne!(a.text, b.text, "Duplicate reference text in result");
            }
        }
    }

    #[test]
    fn test_repetition_pick_comes_first() {
        let mut entries = vec![
            entry("秋の句一", "秋", "悲しみ", "もののあはれ"),
            entry("秋の句二", "秋", "悲しみ", "もののあはれ"),
        ];
        let mut flagged = entry("雁よ雁いくつのとしから旅をした", "秋", "悲しみ", "愛らしさ");
        flagged.has_repetition = true;
        entries.push(flagged);
        let corpus = Corpus::new(entries);

        let mut c = criteria("秋", "悲しみ", "もののあはれ");
        c.prioritize_repetition = true;
        let refs = select_references(&corpus, &c, &mut rng());

        assert!(refs[0].has_repetition, "First reference must be flagged");
    }

    #[test]
    fn test_repetition_pick_bypasses_base_filters() {
        // The only flagged entry matches none of the filters; it must still lead.
        let mut flagged = entry("猫の子がちょいと押えるおち葉かな", "冬", "喜び", "愛らしさ");
        flagged.has_repetition = true;
        let corpus = Corpus::new(vec![
            entry("秋の句一", "秋", "悲しみ", "もののあはれ"),
            flagged,
        ]);

        let mut c = criteria("秋", "悲しみ", "もののあはれ");
        c.prioritize_repetition = true;
        let refs = select_references(&corpus, &c, &mut rng());

        assert!(refs[0].has_repetition);
        assert_eq!(refs[0].season, "冬");
    }

    #[test]
    fn test_base_matches_follow_corpus_order() {
        let corpus = autumn_corpus();
        let c = criteria("秋", "悲しみ", "もののあはれ");
        let refs = select_references(&corpus, &c, &mut rng());

        let texts: Vec<&str> = refs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["秋の句一", "秋の句二", "秋の句三"]);
    }

    #[test]
    fn test_unset_filters_pass_all_rows() {
        let corpus = autumn_corpus();
        let c = SelectionCriteria {
            k: 5,
            ..Default::default()
        };
        let refs = select_references(&corpus, &c, &mut rng());
        assert_eq!(refs.len(), 5);
    }

    #[test]
    fn test_skip_sentinel_disables_aesthetic_filter() {
        let corpus = autumn_corpus();
        let with_skip = SelectionCriteria {
            season: Some("秋".to_string()),
            emotion: Some("悲しみ".to_string()),
            aesthetic: Some(SKIP_AESTHETIC.to_string()),
            k: 10,
            ..Default::default()
        };
        let without = SelectionCriteria {
            aesthetic: None,
            ..with_skip.clone()
        };

        let a = base_filtered(corpus.entries(), &with_skip);
        let b = base_filtered(corpus.entries(), &without);
        assert_eq!(a.len(), b.len(), "Skip sentinel must behave like unset");
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_base_filter_is_idempotent() {
        let corpus = autumn_corpus();
        let c = criteria("秋", "悲しみ", "もののあはれ");
        let first: Vec<String> = base_filtered(corpus.entries(), &c)
            .iter()
            .map(|e| e.text.clone())
            .collect();
        let second: Vec<String> = base_filtered(corpus.entries(), &c)
            .iter()
            .map(|e| e.text.clone())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sakura_synonyms_make_rows_eligible() {
        let mut rows = Vec::new();
        for (i, word) in ["桜", "桜花", "遅桜", "山桜"].iter().enumerate() {
            rows.push(entry(&format!("{word}の句{i}"), "春", "喜び", "風雅"));
        }
        rows.push(entry("梅の句", "春", "喜び", "風雅"));
        let corpus = Corpus::new(rows);

        let c = SelectionCriteria {
            keyword: Some("桜".to_string()),
            k: 10,
            ..Default::default()
        };
        // All four synonym rows must be reachable through the free-text pad.
        let refs = select_references(&corpus, &c, &mut rng());
        for word in ["桜", "桜花", "遅桜", "山桜"] {
            assert!(
                refs.iter().any(|r| r.text.contains(word)),
                "Synonym {word} row missing from result"
            );
        }
    }

    #[test]
    fn test_keyword_matches_reading_and_season_words() {
        let mut by_reading = entry("初時雨", "冬", "悲しみ", "寂び");
        by_reading.reading = "はつしぐれさるもこみのをほしげなり".to_string();
        let mut by_season_word = entry("炬燵の句", "冬", "喜び", "素朴");
        by_season_word.season_word_candidates = "時雨".to_string();
        let corpus = Corpus::new(vec![by_reading, by_season_word]);

        let c = SelectionCriteria {
            keyword: Some("時雨".to_string()),
            k: 5,
            ..Default::default()
        };
        let refs = select_references(&corpus, &c, &mut rng());
        assert_eq!(refs.len(), 2, "Both reading and season-word hits expected");
    }

    #[test]
    fn test_base_fill_considers_only_first_ten_rows() {
        let rows: Vec<CorpusEntry> = (0..15)
            .map(|i| entry(&format!("秋の句{i:02}"), "秋", "悲しみ", "もののあはれ"))
            .collect();
        let corpus = Corpus::new(rows);

        let mut c = criteria("秋", "悲しみ", "もののあはれ");
        c.k = 12;
        let refs = select_references(&corpus, &c, &mut rng());

        // Only the head of the base-filtered set is eligible.
        assert_eq!(refs.len(), 10);
        assert!(refs.iter().all(|r| {
            let n: usize = r.text[r.text.len() - 2..].parse().unwrap_or(99);
            n < 10
        }));
    }

    #[test]
    fn test_free_text_pads_when_base_is_short() {
        let corpus = Corpus::new(vec![
            entry("秋の句一", "秋", "悲しみ", "もののあはれ"),
            entry("桜の句一", "春", "喜び", "風雅"),
            entry("桜の句二", "春", "喜び", "風雅"),
        ]);
        let c = SelectionCriteria {
            season: Some("秋".to_string()),
            keyword: Some("桜".to_string()),
            k: 3,
            ..Default::default()
        };
        let refs = select_references(&corpus, &c, &mut rng());
        assert_eq!(refs.len(), 3);
        assert_eq!(
            refs.iter().filter(|r| r.text.contains("桜")).count(),
            2,
            "Both free-text matches must pad the short base set"
        );
    }

    #[test]
    fn test_source_is_formatted_with_year() {
        let corpus = autumn_corpus();
        let c = criteria("秋", "悲しみ", "もののあはれ");
        let refs = select_references(&corpus, &c, &mut rng());
        assert_eq!(refs[0].source, "七番日記 (1814)");
    }

    #[test]
    fn test_unknown_keyword_falls_back_to_itself() {
        assert_eq!(synonym_terms("紅葉"), vec!["紅葉".to_string()]);
    }

    #[test]
    fn test_known_keyword_expands() {
        let terms = synonym_terms("子供");
        assert_eq!(terms.len(), 6);
        assert!(terms.contains(&"小坊主".to_string()));
    }

    #[test]
    fn test_same_seed_same_selection() {
        let mut entries = autumn_corpus().entries().to_vec();
        for e in entries.iter_mut().take(3) {
            e.has_repetition = true;
        }
        let corpus = Corpus::new(entries);

        let mut c = criteria("秋", "悲しみ", "もののあはれ");
        c.prioritize_repetition = true;

        let a = select_references(&corpus, &c, &mut StdRng::seed_from_u64(7));
        let b = select_references(&corpus, &c, &mut StdRng::seed_from_u64(7));
        let texts = |refs: &[Reference]| {
            refs.iter().map(|r| r.text.clone()).collect::<Vec<_>>()
        };
        assert_eq!(texts(&a), texts(&b));
    }
}
