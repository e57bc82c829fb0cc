//! Deterministic layout selection.
//!
//! Slides and infographics don't store which of the five presentation
//! templates they use. The choice is derived from the title with the classic
//! 32-bit string hash (`hash = hash * 31 + unit` over UTF-16 code units,
//! wrapping), so the same title renders the same way on every pass.
//!
//! ```text
//! infographic  = |hash(title)| mod 5
//! slide        = (|hash(title)| + point_count + subtitle_len) mod 5
//! ```
//!
//! The slide formula mixes in the current number of plotted items and the
//! subtitle length. Editing either one can move a slide to another template
//! even though its title didn't change. That behaviour is kept for parity with
//! already-published decks; `layout.mix_signals = false` turns the extra
//! terms off, and an explicit `layoutIndex` on the slide overrides the hash
//! entirely (see [`layout_for_slide`]).

use crate::config::LayoutConfig;
use crate::types::Slide;
use crate::visual::{VisualContent, raw_item_count};
use serde::Serialize;
use serde_json::Value;

/// Number of templates in each layout family.
pub const LAYOUT_VARIANTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideLayout {
    Spotlight,
    SplitLeft,
    SplitRight,
    Stacked,
    Grid,
}

impl SlideLayout {
    pub const ALL: [SlideLayout; LAYOUT_VARIANTS] = [
        SlideLayout::Spotlight,
        SlideLayout::SplitLeft,
        SlideLayout::SplitRight,
        SlideLayout::Stacked,
        SlideLayout::Grid,
    ];

    /// Index is taken modulo the variant count.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % LAYOUT_VARIANTS]
    }

    pub fn name(self) -> &'static str {
        match self {
            SlideLayout::Spotlight => "spotlight",
            SlideLayout::SplitLeft => "split-left",
            SlideLayout::SplitRight => "split-right",
            SlideLayout::Stacked => "stacked",
            SlideLayout::Grid => "grid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InfographicLayout {
    Columns,
    Rows,
    Radial,
    Timeline,
    Cards,
}

impl InfographicLayout {
    pub const ALL: [InfographicLayout; LAYOUT_VARIANTS] = [
        InfographicLayout::Columns,
        InfographicLayout::Rows,
        InfographicLayout::Radial,
        InfographicLayout::Timeline,
        InfographicLayout::Cards,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % LAYOUT_VARIANTS]
    }

    pub fn name(self) -> &'static str {
        match self {
            InfographicLayout::Columns => "columns",
            InfographicLayout::Rows => "rows",
            InfographicLayout::Radial => "radial",
            InfographicLayout::Timeline => "timeline",
            InfographicLayout::Cards => "cards",
        }
    }
}

/// Incidental quantities mixed into the slide hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutSignals {
    pub point_count: usize,
    /// Subtitle length in UTF-16 code units.
    pub subtitle_len: usize,
}

impl LayoutSignals {
    pub fn new(point_count: usize, subtitle: &str) -> Self {
        Self {
            point_count,
            subtitle_len: subtitle.encode_utf16().count(),
        }
    }

    /// Signals as they currently stand for a raw `visualContent` value.
    /// Every array element counts, typed or not.
    pub fn from_visual(value: &Value) -> Self {
        let visual = VisualContent::from_value(value);
        Self::new(raw_item_count(value), visual.subtitle().unwrap_or_default())
    }
}

/// 32-bit signed string hash over UTF-16 code units.
pub fn title_hash(title: &str) -> i32 {
    title.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// `|hash|` without overflow: `i32::MIN` maps to `2^31`.
fn hash_magnitude(title: &str) -> u64 {
    u64::from(title_hash(title).unsigned_abs())
}

pub fn infographic_layout_index(title: &str) -> usize {
    (hash_magnitude(title) % LAYOUT_VARIANTS as u64) as usize
}

pub fn slide_layout_index(title: &str, signals: LayoutSignals) -> usize {
    let mixed = hash_magnitude(title) + signals.point_count as u64 + signals.subtitle_len as u64;
    (mixed % LAYOUT_VARIANTS as u64) as usize
}

pub fn select_infographic_layout(title: &str) -> InfographicLayout {
    InfographicLayout::from_index(infographic_layout_index(title))
}

pub fn select_slide_layout(title: &str, signals: LayoutSignals) -> SlideLayout {
    SlideLayout::from_index(slide_layout_index(title, signals))
}

/// Template for a slide, honouring an explicit `layoutIndex` when enabled.
pub fn layout_for_slide(slide: &Slide, config: &LayoutConfig) -> SlideLayout {
    if config.honor_layout_index {
        if let Some(index) = slide.layout_index {
            return SlideLayout::from_index(index);
        }
    }
    let signals = if config.mix_signals {
        LayoutSignals::from_visual(&slide.visual_content)
    } else {
        LayoutSignals::default()
    };
    select_slide_layout(&slide.title, signals)
}

/// Template for a slide's infographic. Hashes the visual's own title when it
/// has one, the slide title otherwise.
pub fn infographic_layout_for_slide(slide: &Slide) -> InfographicLayout {
    let visual = VisualContent::from_value(&slide.visual_content);
    select_infographic_layout(visual.title().unwrap_or(&slide.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_matches_reference_values() {
        assert_eq!(title_hash(""), 0);
        assert_eq!(title_hash("a"), 97);
        assert_eq!(title_hash("abc"), 96354);
        assert_eq!(title_hash("hello"), 99162322);
        assert_eq!(title_hash("Hello World"), -862545276);
    }

    #[test]
    fn hash_uses_utf16_code_units() {
        assert_eq!(title_hash("é"), 233);
        // surrogate pair D83D DE00
        assert_eq!(title_hash("😀"), 1772899);
    }

    #[test]
    fn minimum_hash_does_not_overflow() {
        assert_eq!(title_hash("polygenelubricants"), i32::MIN);
        // 2^31 mod 5 == 3
        assert_eq!(infographic_layout_index("polygenelubricants"), 3);
    }

    #[test]
    fn infographic_index_is_hash_mod_five() {
        assert_eq!(infographic_layout_index("abc"), 4);
        assert_eq!(infographic_layout_index("hello"), 2);
        assert_eq!(infographic_layout_index("Hello World"), 1);
        assert_eq!(select_infographic_layout(""), InfographicLayout::Columns);
    }

    #[test]
    fn slide_index_mixes_signals() {
        let signals = LayoutSignals::new(3, "xy");
        assert_eq!(signals.subtitle_len, 2);
        // (96354 + 3 + 2) mod 5
        assert_eq!(slide_layout_index("abc", signals), 4);
        assert_eq!(slide_layout_index("abc", LayoutSignals::new(4, "xy")), 0);
    }

    #[test]
    fn selection_is_stable_and_in_range() {
        for title in ["", "Intro", "The Economics of Sleep", "Épisode 3", "日本語"] {
            for points in 0..7 {
                let signals = LayoutSignals::new(points, "subtitle");
                let first = slide_layout_index(title, signals);
                assert_eq!(first, slide_layout_index(title, signals));
                assert!(first < LAYOUT_VARIANTS);
            }
        }
    }

    fn slide(value: serde_json::Value) -> Slide {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn explicit_layout_index_wins() {
        let s = slide(json!({"title": "abc", "layoutIndex": 7}));
        let config = LayoutConfig::default();
        assert_eq!(layout_for_slide(&s, &config), SlideLayout::SplitRight);

        let ignore = LayoutConfig {
            honor_layout_index: false,
            ..LayoutConfig::default()
        };
        assert_eq!(layout_for_slide(&s, &ignore), SlideLayout::Grid);
    }

    #[test]
    fn slide_layout_reads_signals_from_visual() {
        let s = slide(json!({
            "title": "abc",
            "visualContent": {
                "type": "key_stats",
                "content": {"subtitle": "xy", "stats": [{}, {}, {}]}
            }
        }));
        assert_eq!(layout_for_slide(&s, &LayoutConfig::default()), SlideLayout::Grid);

        let unmixed = LayoutConfig {
            mix_signals: false,
            ..LayoutConfig::default()
        };
        // 96354 mod 5
        assert_eq!(layout_for_slide(&s, &unmixed), SlideLayout::Grid);
    }

    #[test]
    fn scalar_items_count_toward_slide_layout() {
        let s = slide(json!({
            "title": "abc",
            "visualContent": {"type": "bar_chart", "content": {"data": [10, 20, 30]}}
        }));
        // (96354 + 3) mod 5
        assert_eq!(layout_for_slide(&s, &LayoutConfig::default()), SlideLayout::SplitRight);
        assert_eq!(LayoutSignals::from_visual(&s.visual_content).point_count, 3);

        let stats = json!({"type": "key_stats", "content": {"keyStats": ["12k", "48"], "subtitle": "xy"}});
        assert_eq!(LayoutSignals::from_visual(&stats), LayoutSignals::new(2, "xy"));
    }

    #[test]
    fn editing_points_moves_mixed_layout_only() {
        let before = slide(json!({
            "title": "abc",
            "visualContent": {"type": "bar_chart", "content": {"data": [{}, {}, {}]}}
        }));
        let after = slide(json!({
            "title": "abc",
            "visualContent": {"type": "bar_chart", "content": {"data": [{}, {}, {}, {}]}}
        }));
        let mixed = LayoutConfig::default();
        assert_ne!(layout_for_slide(&before, &mixed), layout_for_slide(&after, &mixed));

        let unmixed = LayoutConfig {
            mix_signals: false,
            ..LayoutConfig::default()
        };
        assert_eq!(layout_for_slide(&before, &unmixed), layout_for_slide(&after, &unmixed));
    }

    #[test]
    fn infographic_prefers_visual_title() {
        let s = slide(json!({
            "title": "Slide",
            "visualContent": {"type": "map", "content": {"title": "hello"}}
        }));
        assert_eq!(infographic_layout_for_slide(&s), InfographicLayout::Radial);
    }
}
