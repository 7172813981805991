// src/utils/lang.rs

//! Coarse language tagging for review bodies.
//!
//! CJK scripts are unambiguous from codepoints alone and the statistical
//! detector is unreliable on short strings, so codepoint checks run first
//! and the detector is only a fallback.

use crate::models::Language;

/// Classify free text as Chinese, English, or unknown.
///
/// Order, first match wins: strip pictographic glyphs; any CJK Unified
/// Ideograph means Chinese; pure ASCII letters/digits/whitespace plus
/// common punctuation means English; otherwise fall back to statistical
/// detection, mapping anything that is not confidently English to unknown.
pub fn classify(text: &str) -> Language {
    let stripped: String = text.chars().filter(|c| !is_pictographic(*c)).collect();

    if stripped.chars().any(is_cjk_ideograph) {
        return Language::Zh;
    }

    if !stripped.trim().is_empty() && stripped.chars().all(is_plain_english_char) {
        return Language::En;
    }

    match whatlang::detect(&stripped) {
        Some(info) if info.lang() == whatlang::Lang::Eng => Language::En,
        _ => Language::Unknown,
    }
}

/// CJK Unified Ideographs block.
fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn is_plain_english_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || ".,!?'\"-".contains(c)
}

/// Emoji and pictographic glyphs that confuse script detection.
fn is_pictographic(c: char) -> bool {
    matches!(c,
        '\u{1f000}'..='\u{1f02f}'   // mahjong tiles
        | '\u{1f300}'..='\u{1f5ff}' // misc symbols and pictographs
        | '\u{1f600}'..='\u{1f64f}' // emoticons
        | '\u{1f680}'..='\u{1f6ff}' // transport and map symbols
        | '\u{1f900}'..='\u{1f9ff}' // supplemental symbols
        | '\u{1fa70}'..='\u{1faff}' // symbols extended-A
        | '\u{2600}'..='\u{26ff}'   // misc symbols
        | '\u{2700}'..='\u{27bf}'   // dingbats
        | '\u{1f1e6}'..='\u{1f1ff}' // regional indicators (flags)
        | '\u{fe0f}'                // variation selector
        | '\u{200d}'                // zero-width joiner
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chinese_text() {
        assert_eq!(classify("你好"), Language::Zh);
        assert_eq!(classify("介面很好用，五顆星"), Language::Zh);
    }

    #[test]
    fn test_english_text() {
        assert_eq!(classify("Hello, world!"), Language::En);
        assert_eq!(classify("Works great - 5 stars."), Language::En);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(classify(""), Language::Unknown);
        assert_eq!(classify("   "), Language::Unknown);
    }

    #[test]
    fn test_emoji_only() {
        assert_eq!(classify("👍👍🔥"), Language::Unknown);
    }

    #[test]
    fn test_emoji_does_not_mask_chinese() {
        assert_eq!(classify("好用👍"), Language::Zh);
    }

    #[test]
    fn test_mixed_chinese_wins_over_latin() {
        assert_eq!(classify("good app 很好"), Language::Zh);
    }

    #[test]
    fn test_non_latin_non_cjk_is_unknown() {
        // Korean: outside both the ideograph block and the ASCII set
        assert_eq!(classify("정말 좋아요"), Language::Unknown);
    }

    #[test]
    fn test_classify_is_total() {
        for text in ["", "a", "你", "👍", "\u{fe0f}", "123", "?!"] {
            // Must map every input to exactly one variant without panicking
            let _ = classify(text);
        }
    }
}
