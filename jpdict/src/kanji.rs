use std::collections::HashMap;

use jpdict_types::{
    ComponentResult, KanjiRecord, KanjiResult, RadicalBase, RadicalRecord, RadicalResult,
    RelatedKanji,
};
use tracing::warn;

use crate::katakana;

/// Radical number 074's codepoint collides with variant id `130-2` (spec.md
/// §4.5 "Derived `charToRadicalId`"); the variant is excluded from the map
/// and matched instead via the pop-variant rule in [`pop_matching_variant`].
const RADICAL_74_SPECIAL_VARIANT: &str = "130-2";
const RADICAL_74: u32 = 74;

/// Cached radicals table plus the derived `charToRadicalId` map (spec.md
/// §4.5 bullet 2: "built once until radicals are re-synced").
#[derive(Debug, Clone, Default)]
pub struct RadicalCache {
    by_id: HashMap<String, RadicalRecord>,
    char_to_radical_id: HashMap<char, String>,
}

impl RadicalCache {
    /// `radicals` need not be pre-sorted; this iterates them in id-order
    /// (spec.md §4.5 "Derived `charToRadicalId`: iterate radicals in
    /// id-order") so collisions resolve to whichever id sorts first, base
    /// radicals before any of their own variants.
    pub fn build(mut radicals: Vec<RadicalRecord>) -> Self {
        radicals.sort_by(|a, b| a.id.cmp(&b.id));

        let by_id: HashMap<String, RadicalRecord> = radicals
            .iter()
            .map(|r| (r.id.clone(), r.clone()))
            .collect();

        let mut char_to_radical_id = HashMap::new();
        for r in &radicals {
            if r.is_base() {
                register(&mut char_to_radical_id, &r.b, &r.id);
                if let Some(k) = &r.k {
                    register(&mut char_to_radical_id, k, &r.id);
                }
                continue;
            }
            if r.id == RADICAL_74_SPECIAL_VARIANT {
                continue;
            }
            let Some(base) = by_id.get(r.base_id()) else {
                continue;
            };
            if r.b != base.b {
                register(&mut char_to_radical_id, &r.b, &r.id);
            }
            if r.k.is_some() && r.k != base.k {
                register(&mut char_to_radical_id, r.k.as_ref().unwrap(), &r.id);
            }
        }

        Self {
            by_id,
            char_to_radical_id,
        }
    }

    pub fn get(&self, id: &str) -> Option<&RadicalRecord> {
        self.by_id.get(id)
    }

    pub fn radical_for_char(&self, c: char) -> Option<&RadicalRecord> {
        self.char_to_radical_id.get(&c).and_then(|id| self.get(id))
    }

    fn base_of(&self, radical: &RadicalRecord) -> Option<&RadicalRecord> {
        self.get(radical.base_id())
    }
}

fn register(map: &mut HashMap<char, String>, glyph: &str, id: &str) {
    if let Some(c) = glyph.chars().next() {
        map.entry(c).or_insert_with(|| id.to_string());
    }
}

/// Resolves `rad.x`/`rad.var[]` to the concrete radical block (spec.md
/// §4.5 bullet 3): prefer the variant whose radical number matches
/// `rad.x`, falling back to the zero-padded base id.
fn resolve_rad(record: &KanjiRecord, cache: &RadicalCache) -> Option<RadicalResult> {
    let variant = record
        .rad
        .var
        .iter()
        .find_map(|id| cache.get(id).filter(|v| v.rad == record.rad.x));

    match variant {
        Some(v) => {
            let base = cache.base_of(v).map(|b| RadicalBase {
                b: b.b.clone(),
                k: b.k.clone(),
            });
            Some(RadicalResult {
                x: record.rad.x,
                b: v.b.clone(),
                k: v.k.clone(),
                base,
            })
        }
        None => {
            let base_id = RadicalRecord::pad3(record.rad.x);
            let base = cache.get(&base_id)?;
            Some(RadicalResult {
                x: record.rad.x,
                b: base.b.clone(),
                k: base.k.clone(),
                base: None,
            })
        }
    }
}

/// Pops a variant id from `remaining` that stands for `radical_number`,
/// honoring the radical-74/`130-2` special case (spec.md §4.5 bullet 4).
fn pop_matching_variant(
    remaining: &mut Vec<String>,
    radical_number: u32,
    cache: &RadicalCache,
) -> Option<String> {
    if radical_number == RADICAL_74 {
        if let Some(idx) = remaining.iter().position(|v| v == RADICAL_74_SPECIAL_VARIANT) {
            return Some(remaining.remove(idx));
        }
    }
    let idx = remaining
        .iter()
        .position(|v| cache.get(v).map(|r| r.rad) == Some(radical_number))?;
    Some(remaining.remove(idx))
}

/// Resolves one character of a kanji's `comp` string (spec.md §4.5 bullet
/// 4): radical component, kanji component (kun readings, then on, `.`
/// markers stripped), katakana fallback, or a skipped-with-warning miss.
fn resolve_component(
    c: char,
    remaining_vars: &mut Vec<String>,
    cache: &RadicalCache,
    kanji_by_char: &HashMap<char, KanjiRecord>,
    lang: &str,
) -> Option<ComponentResult> {
    if let Some(default_radical) = cache.radical_for_char(c) {
        let picked_id = pop_matching_variant(remaining_vars, default_radical.rad, cache);
        let radical = picked_id
            .as_deref()
            .and_then(|id| cache.get(id))
            .unwrap_or(default_radical);
        let base = cache.base_of(radical).unwrap_or(radical);
        return Some(ComponentResult {
            c,
            na: radical.r.clone(),
            m: radical.m.clone(),
            m_lang: None,
            k: base.k.clone(),
        });
    }

    if let Some(kanji) = kanji_by_char.get(&c) {
        let readings = kanji.r.component_readings();
        return Some(ComponentResult {
            c,
            na: readings,
            m: kanji.m.clone(),
            m_lang: kanji.m_lang.clone(),
            k: None,
        });
    }

    if katakana::is_katakana(c) {
        let (label, recognized) = katakana::label(c, lang)?;
        if !recognized {
            warn!(lang, component = %c, "unrecognized language for katakana component, falling back to roman spelling");
        }
        return Some(ComponentResult {
            c,
            na: vec![c.to_string()],
            m: vec![label],
            m_lang: Some(lang.to_string()),
            k: None,
        });
    }

    warn!(component = %c, "component has no radical, kanji, or katakana match, skipping");
    None
}

/// Resolves one kanji record into its full [`KanjiResult`] (spec.md §4.5
/// bullets 3-5). `kanji_by_char` supplies sibling kanji already fetched in
/// this lookup, for component resolution against kanji readings;
/// `related` supplies the already-fetched `cf` records, in the order
/// requested, with absent ids already dropped.
pub fn resolve(
    record: &KanjiRecord,
    cache: &RadicalCache,
    kanji_by_char: &HashMap<char, KanjiRecord>,
    related: Vec<KanjiRecord>,
    lang: &str,
) -> Option<KanjiResult> {
    let rad = resolve_rad(record, cache).or_else(|| {
        warn!(c = record.c, "kanji record has no resolvable radical, skipping");
        None
    })?;

    let mut remaining_vars = record.rad.var.clone();
    let comp: Vec<ComponentResult> = record
        .comp
        .chars()
        .filter_map(|c| resolve_component(c, &mut remaining_vars, cache, kanji_by_char, lang))
        .collect();

    let cf = related
        .into_iter()
        .map(|r| RelatedKanji {
            c: r.c,
            r: r.r.clone(),
            m: r.m.clone(),
            m_lang: r.m_lang.clone(),
            misc: r.misc(),
        })
        .collect();

    Some(KanjiResult {
        c: record.c,
        r: record.r.clone(),
        m: record.m.clone(),
        m_lang: record.m_lang.clone(),
        rad,
        comp,
        refs: record.refs.clone(),
        misc: record.misc(),
        cf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpdict_types::RadicalRef;

    fn base_radical(id: &str, rad: u32, b: &str, k: Option<&str>) -> RadicalRecord {
        RadicalRecord {
            id: id.to_string(),
            rad,
            b: b.to_string(),
            k: k.map(str::to_string),
            r: vec!["radical-reading".into()],
            m: vec!["radical-meaning".into()],
            pos: None,
        }
    }

    fn kanji(c: u32, rad_x: u32, var: Vec<&str>, comp: &str) -> KanjiRecord {
        KanjiRecord {
            c,
            r: Default::default(),
            m: vec![],
            m_lang: None,
            rad: RadicalRef {
                x: rad_x,
                var: var.into_iter().map(str::to_string).collect(),
            },
            comp: comp.to_string(),
            refs: Default::default(),
            strokes: None,
            grade: None,
            freq: None,
            jlpt: None,
            cf: vec![],
        }
    }

    #[test]
    fn resolves_base_radical_when_no_variant_matches() {
        let cache = RadicalCache::build(vec![base_radical("057", 57, "弓", None)]);
        let k = kanji(24341, 57, vec![], "");
        let rad = resolve_rad(&k, &cache).unwrap();
        assert_eq!(rad.b, "弓");
        assert!(rad.base.is_none());
    }

    #[test]
    fn resolves_variant_and_populates_base() {
        let cache = RadicalCache::build(vec![
            base_radical("009", 9, "人", None),
            base_radical("9-2", 9, "⺅", None),
        ]);
        let k = kanji(20161, 9, vec!["9-2"], "");
        let rad = resolve_rad(&k, &cache).unwrap();
        assert_eq!(rad.b, "⺅");
        assert_eq!(rad.base.unwrap().b, "人");
    }

    #[test]
    fn component_resolution_prefers_radical_over_kanji_and_katakana() {
        let cache = RadicalCache::build(vec![base_radical("057", 57, "弓", Some("弓"))]);
        let mut kanji_by_char = HashMap::new();
        kanji_by_char.insert('弓', kanji(24339, 57, vec![], ""));
        let mut vars = vec![];
        let comp = resolve_component('弓', &mut vars, &cache, &kanji_by_char, "en").unwrap();
        assert_eq!(comp.k.as_deref(), Some("弓"));
        assert_eq!(comp.na, vec!["radical-reading".to_string()]);
    }

    #[test]
    fn katakana_component_uses_localized_label() {
        let cache = RadicalCache::default();
        let kanji_by_char = HashMap::new();
        let mut vars = vec![];
        let comp = resolve_component('カ', &mut vars, &cache, &kanji_by_char, "ja").unwrap();
        assert_eq!(comp.m, vec!["片仮名のka".to_string()]);
        assert!(comp.k.is_none());
    }

    #[test]
    fn unmatched_component_is_skipped() {
        let cache = RadicalCache::default();
        let kanji_by_char = HashMap::new();
        let mut vars = vec![];
        assert!(resolve_component('Z', &mut vars, &cache, &kanji_by_char, "en").is_none());
    }

    #[test]
    fn radical_74_special_case_matches_130_2() {
        let cache = RadicalCache::build(vec![
            base_radical("074", 74, "爪", None),
            base_radical("130", 130, "月", None),
            base_radical("130-2", 130, "⺼", None),
        ]);
        assert!(cache.get(RADICAL_74_SPECIAL_VARIANT).is_some());
        assert!(cache.radical_for_char('⺼').is_none());

        let mut vars = vec!["130-2".to_string()];
        let picked = pop_matching_variant(&mut vars, RADICAL_74, &cache);
        assert_eq!(picked.as_deref(), Some("130-2"));
        assert!(vars.is_empty());
    }
}
