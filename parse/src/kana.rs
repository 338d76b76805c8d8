//! Kana normalization used by the derived hiragana indexes on names/words
//! and by `getNames` kana-equivalence matching (spec.md §3, §4.5, GLOSSARY).

/// Map katakana to its hiragana equivalent, character by character. Glyphs
/// with no hiragana counterpart (the `ヷヸヹヺ` block, the prolonged-sound
/// mark `ー`) are passed through unchanged.
pub fn katakana_to_hiragana(input: &str) -> String {
    input.chars().map(kata_to_hira_char).collect()
}

fn kata_to_hira_char(c: char) -> char {
    match c {
        '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
        other => other,
    }
}

/// Whether `s` contains at least one hiragana character. Used to decide
/// whether a name/word key gets an entry in the derived hiragana index
/// (spec.md §3 key invariants: "entries only for original keys that include
/// at least one hiragana character after normalization").
pub fn contains_hiragana(s: &str) -> bool {
    s.chars().any(|c| ('\u{3041}'..='\u{3096}').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_katakana_block() {
        assert_eq!(katakana_to_hiragana("カタカナ"), "かたかな");
    }

    #[test]
    fn leaves_prolonged_mark_and_unmappable_glyphs_alone() {
        assert_eq!(katakana_to_hiragana("アー"), "あー");
        assert_eq!(katakana_to_hiragana("\u{30F7}"), "\u{30F7}");
    }

    #[test]
    fn leaves_non_katakana_alone() {
        assert_eq!(katakana_to_hiragana("ひらがな123abc"), "ひらがな123abc");
    }

    #[test]
    fn detects_hiragana_presence() {
        assert!(contains_hiragana("あ"));
        assert!(contains_hiragana("カあ"));
        assert!(!contains_hiragana("カタカナ"));
        assert!(!contains_hiragana("123abc"));
    }
}
