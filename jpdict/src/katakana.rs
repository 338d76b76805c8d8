//! The katakana-component fallback table (spec.md §4.5 bullet 4 of
//! `getKanji`'s component resolution): "if it is katakana (U+30A1..U+30FA),
//! emit `{c, na:[c], m:[localized \"katakana X\"]}`".

const FIRST: u32 = 0x30A1;
const LAST: u32 = 0x30FA;

/// Roman spelling for every katakana code point in `U+30A1..=U+30FA`, in
/// codepoint order.
const ROMAN: [&str; (LAST - FIRST + 1) as usize] = [
    "a", "a", "i", "i", "u", "u", "e", "e", "o", "o", "ka", "ga", "ki", "gi", "ku", "gu", "ke",
    "ge", "ko", "go", "sa", "za", "shi", "ji", "su", "zu", "se", "ze", "so", "zo", "ta", "da",
    "chi", "ji", "tsu", "tsu", "zu", "te", "de", "to", "do", "na", "ni", "nu", "ne", "no", "ha",
    "ba", "pa", "hi", "bi", "pi", "fu", "bu", "pu", "he", "be", "pe", "ho", "bo", "po", "ma", "mi",
    "mu", "me", "mo", "ya", "ya", "yu", "yu", "yo", "yo", "ra", "ri", "ru", "re", "ro", "wa", "wa",
    "wi", "we", "wo", "n", "vu", "ka", "ke", "va", "vi", "ve", "vo",
];

pub fn is_katakana(c: char) -> bool {
    (FIRST..=LAST).contains(&(c as u32))
}

fn roman(c: char) -> Option<&'static str> {
    let cp = c as u32;
    if !(FIRST..=LAST).contains(&cp) {
        return None;
    }
    Some(ROMAN[(cp - FIRST) as usize])
}

/// Languages with a baked-in label for katakana components (spec.md §4.5
/// bullet 4, §9 Open Question). `ja` gets `片仮名のX`; `en`/`es`/`pt`/`fr`
/// share the roman spelling (itself a loanword in each). Returns `(label,
/// recognized)`; `recognized = false` means the caller should log a warning
/// before falling through to the roman spelling (spec.md: "for unknown
/// languages... emit a warning and fall through to the roman spelling").
pub fn label(c: char, lang: &str) -> Option<(String, bool)> {
    let romanized = roman(c)?;
    let label = match lang {
        "ja" => format!("片仮名の{romanized}"),
        _ => format!("katakana {romanized}"),
    };
    let recognized = matches!(lang, "en" | "es" | "pt" | "fr" | "ja");
    Some((label, recognized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_the_full_declared_range() {
        assert_eq!(ROMAN.len(), 90);
        assert!(is_katakana('ア'));
        assert!(is_katakana('ヺ'));
        assert!(!is_katakana('a'));
        assert!(!is_katakana('あ'));
    }

    #[test]
    fn ja_uses_the_localized_prefix() {
        let (label, recognized) = label('カ', "ja").unwrap();
        assert_eq!(label, "片仮名のka");
        assert!(recognized);
    }

    #[test]
    fn latin_languages_share_the_roman_spelling() {
        for lang in ["en", "es", "pt", "fr"] {
            let (label, recognized) = label('カ', lang).unwrap();
            assert_eq!(label, "katakana ka");
            assert!(recognized);
        }
    }

    #[test]
    fn unknown_language_falls_through_but_is_flagged_unrecognized() {
        let (label, recognized) = label('カ', "de").unwrap();
        assert_eq!(label, "katakana ka");
        assert!(!recognized);
    }

    #[test]
    fn non_katakana_characters_have_no_entry() {
        assert!(label('引', "en").is_none());
    }
}
