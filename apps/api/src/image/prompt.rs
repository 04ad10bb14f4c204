//! Illustration prompt builders: the Hiroshige ukiyo-e prompt for fresh
//! generation, and the typesetting directives for re-editing the artwork
//! with the English haiku placed inside it.

use rand::Rng;
use serde::Deserialize;

use crate::corpus::taxonomy::SKIP_AESTHETIC;

/// Scene motifs; one is drawn at random per prompt so repeated generations
/// for the same haiku vary.
pub const UKIYOE_MOTIFS: [&str; 30] = [
    "pine trees swaying in wind",
    "Mount Fuji in distance",
    "boats on calm river",
    "cranes flying above water",
    "cherry blossoms falling",
    "moon over still pond",
    "paper lanterns glowing at dusk",
    "snow on rooftops",
    "farmers planting rice",
    "autumn rice fields with golden ears",
    "bamboo forest in wind",
    "willow branches over river",
    "waves crashing on shore",
    "misty mountain path",
    "plum blossoms near gate",
    "wild geese flying south",
    "fireflies over stream",
    "sunrise over sea",
    "evening bell near temple",
    "deer in autumn forest",
    "fishermen pulling nets",
    "tea house by the roadside",
    "torches lighting a festival",
    "herons standing in shallow water",
    "wind blowing through pampas grass",
    "children playing with kites",
    "woman hanging laundry in breeze",
    "path lined with red maple trees",
    "bridge seen from afar in morning mist",
    "mountain village under falling snow",
];

fn season_in_english(season: &str) -> &'static str {
    match season {
        "春" => "spring",
        "夏" => "summer",
        "秋" => "autumn",
        "冬" => "winter",
        "新年" => "new year",
        "無季" => "seasonless",
        _ => "seasonal",
    }
}

/// Per-aesthetic rendering nuance appended to the prompt tail.
fn aesthetic_nuance(aesthetic: &str) -> Option<&'static str> {
    let nuance = match aesthetic {
        "侘び" => "Emphasize muted tones, plain forms, and generous negative space.",
        "寂び" => "Suggest patina and weathered textures, gentle fading at edges.",
        "幽玄" => "Use layered haze and softened contours to hint unseen depth.",
        "もののあはれ" => "Let fading light and falling leaves imply transience.",
        "風雅" => "Aim for refined balance and dignified spacing; gentle hint of gold.",
        "無常" => "Render subtle shifts of light and thin clouds to evoke impermanence.",
        "愛らしさ" => "Include tiny animals or children naturally, never as main focus.",
        "素朴" => "Keep forms simple and avoid ornate patterns.",
        "滑稽" => "Allow a slight, poetic twist in pose or placement.",
        "淡白" => "Reduce brushstrokes; leave wide calm surfaces.",
        "静寂" => "Minimize motion; widen sky/water/snow planes.",
        "余情" => "Leave fragments and do not narrate all details.",
        _ => return None,
    };
    Some(nuance)
}

/// Builds the ukiyo-e generation prompt for a finished haiku. The motif is
/// drawn from `UKIYOE_MOTIFS` via the injected RNG.
pub fn build_image_prompt(
    haiku_ja: &str,
    explanation_ja: &str,
    season: &str,
    keyword: &str,
    aesthetic: &str,
    rng: &mut impl Rng,
) -> String {
    let season_en = season_in_english(season);
    let aesthetic_line = if aesthetic == SKIP_AESTHETIC || aesthetic.is_empty() {
        String::new()
    } else {
        format!("Japanese aesthetic: {aesthetic}\n")
    };
    let motif = UKIYOE_MOTIFS[rng.gen_range(0..UKIYOE_MOTIFS.len())];

    let mut prompt = format!(
        r#"Utagawa Hiroshige style ukiyo-e, Edo-period {season_en}.
Haiku: {haiku_ja}
Explanation: {explanation_ja}
Keyword (seasonal word or theme): {keyword}
{aesthetic_line}- Composition: vast nature as main subject; small human/animal figures (<=1/10 of scene); avoid bridges and torii gates; include {motif}.
- Colors: indigo gradients (aizuri-e), soft browns/greens, washi paper texture; subtle gold accents if sunlight/dawn.
- Mood: poetic, tranquil, simple. Reflect "yugen", "sabi", "aware".
- Aspect ratio: square (1:1) for NFT format.
- Strict bans: no text, no Western realism, no oil painting, no 3D, no modern objects, no close-up bridges or torii gates.
"#
    );

    if let Some(nuance) = aesthetic_nuance(aesthetic) {
        prompt.push_str(&format!("\n- Aesthetic nuance: {nuance}\n"));
    }
    prompt
}

// ────────────────────────────────────────────────────────────────────────────
// Caption typesetting directives
// ────────────────────────────────────────────────────────────────────────────

/// Where the English haiku is placed inside the artwork.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptionAnchor {
    BottomCenter,
    BottomRight,
    BottomLeft,
    Center,
    TopRight,
    #[default]
    TopLeft,
    TopCenter,
}

impl CaptionAnchor {
    fn as_str(self) -> &'static str {
        match self {
            CaptionAnchor::BottomCenter => "bottom-center",
            CaptionAnchor::BottomRight => "bottom-right",
            CaptionAnchor::BottomLeft => "bottom-left",
            CaptionAnchor::Center => "center",
            CaptionAnchor::TopRight => "top-right",
            CaptionAnchor::TopLeft => "top-left",
            CaptionAnchor::TopCenter => "top-center",
        }
    }
}

/// Layout knobs for the caption edit. Defaults mirror the form's initial
/// values.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionLayout {
    #[serde(default)]
    pub anchor: CaptionAnchor,
    #[serde(default = "default_inset_pct")]
    pub inset_pct: u8,
    #[serde(default = "default_min_bottom_px")]
    pub min_bottom_px: u16,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
}

fn default_inset_pct() -> u8 {
    5
}

fn default_min_bottom_px() -> u16 {
    52
}

fn default_line_spacing() -> f32 {
    1.35
}

impl Default for CaptionLayout {
    fn default() -> Self {
        Self {
            anchor: CaptionAnchor::default(),
            inset_pct: default_inset_pct(),
            min_bottom_px: default_min_bottom_px(),
            line_spacing: default_line_spacing(),
        }
    }
}

/// Builds the edit prompt that typesets the English haiku inside the
/// existing artwork without altering the scene.
pub fn build_caption_directives(haiku_en: &str, layout: &CaptionLayout) -> String {
    format!(
        r#"Typeset the following English haiku **inside the existing artwork** (no bands, no extra margins, no canvas expansion).
Use Allura font; if unavailable, use a similar elegant script. Keep exact line breaks; no quotes, no extra text:
{haiku_en}

Layout constraints (important):
- Do not add any translucent band, shape, or new margins.
- Place the poem at the {anchor} area of the scene.
- Respect a safe inset of {inset_pct}% from all edges; no glyph may touch or cross the edges.
- Keep the text baseline at least {min_bottom_px}px above the bottom edge (on a 1024×1024 canvas).
- If there is any risk of clipping, automatically reduce the font size and increase line spacing to about {line_spacing}×.
- Apply a subtle shadow or thin outline for legibility, but keep it unobtrusive.
- Preserve the ukiyo-e look-and-feel; do not alter the scene except placing the text.
- Final output must be exactly 1024×1024."#,
        anchor = layout.anchor.as_str(),
        inset_pct = layout.inset_pct,
        min_bottom_px = layout.min_bottom_px,
        line_spacing = layout.line_spacing,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    #[test]
    fn test_prompt_includes_a_known_motif() {
        let prompt = build_image_prompt("初雪や", "説明", "冬", "雪", "静寂", &mut rng());
        assert!(
            UKIYOE_MOTIFS.iter().any(|m| prompt.contains(m)),
            "Prompt must embed one of the fixed motifs"
        );
    }

    #[test]
    fn test_prompt_maps_season_to_english() {
        let prompt = build_image_prompt("", "", "秋", "", SKIP_AESTHETIC, &mut rng());
        assert!(prompt.contains("Edo-period autumn"));
        let fallback = build_image_prompt("", "", "謎", "", SKIP_AESTHETIC, &mut rng());
        assert!(fallback.contains("Edo-period seasonal"));
    }

    #[test]
    fn test_skip_sentinel_omits_aesthetic_line() {
        let prompt = build_image_prompt("句", "説明", "春", "桜", SKIP_AESTHETIC, &mut rng());
        assert!(!prompt.contains("Japanese aesthetic:"));
        assert!(!prompt.contains("Aesthetic nuance:"));
    }

    #[test]
    fn test_aesthetic_adds_line_and_nuance() {
        let prompt = build_image_prompt("句", "説明", "春", "桜", "もののあはれ", &mut rng());
        assert!(prompt.contains("Japanese aesthetic: もののあはれ"));
        assert!(prompt.contains("Aesthetic nuance: Let fading light"));
    }

    #[test]
    fn test_same_seed_same_motif() {
        let a = build_image_prompt("句", "", "春", "", SKIP_AESTHETIC, &mut rng());
        let b = build_image_prompt("句", "", "春", "", SKIP_AESTHETIC, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn test_caption_directives_embed_layout() {
        let layout = CaptionLayout {
            anchor: CaptionAnchor::BottomCenter,
            inset_pct: 7,
            min_bottom_px: 64,
            line_spacing: 1.5,
        };
        let directives = build_caption_directives("snow melts—\nthe village fills\nwith children", &layout);
        assert!(directives.contains("bottom-center"));
        assert!(directives.contains("7%"));
        assert!(directives.contains("64px"));
        assert!(directives.contains("1.5×"));
        assert!(directives.contains("the village fills"));
    }

    #[test]
    fn test_caption_layout_defaults_match_form() {
        let layout = CaptionLayout::default();
        let directives = build_caption_directives("haiku", &layout);
        assert!(directives.contains("top-left"));
        assert!(directives.contains("5%"));
        assert!(directives.contains("52px"));
        assert!(directives.contains("1.35×"));
    }

    #[test]
    fn test_anchor_deserializes_kebab_case() {
        let anchor: CaptionAnchor = serde_json::from_str("\"bottom-right\"").unwrap();
        assert_eq!(anchor.as_str(), "bottom-right");
    }
}
