use jpdict_types::{MatchRank, NameQueryResult, RankedName, WordRecord};

/// The naive ranking policy applied to names and (optionally) words:
/// exact matches before kana-equivalent ones, insertion order preserved
/// within a rank (spec.md §4.5 `getNames`). The tokenization/gloss-scoring
/// heuristics a richer word ranker might use are out of scope (SPEC_FULL.md
/// §7) — this trait is the seam a consumer can plug a real one into.
pub trait WordRanker {
    fn rank(&self, matches: Vec<RankedWord>) -> Vec<RankedWord>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedWord {
    pub rank: MatchRank,
    pub record: WordRecord,
}

/// Default [`WordRanker`]: stable sort by rank only, mirroring the names
/// series' policy exactly (exact before kana-equivalent, insertion order
/// otherwise preserved).
#[derive(Debug, Default, Clone, Copy)]
pub struct InsertionOrderRanker;

impl WordRanker for InsertionOrderRanker {
    fn rank(&self, mut matches: Vec<RankedWord>) -> Vec<RankedWord> {
        matches.sort_by_key(|m| match m.rank {
            MatchRank::Exact => 0,
            MatchRank::KanaEquivalent => 1,
        });
        matches
    }
}

/// `getNames` is implemented entirely by [`jpdict_store::Store::get_names`]
/// (spec.md §4.1, §4.5 agree the ranked-union algorithm lives with the
/// index scans); the Facade forwards verbatim.
pub fn forward(result: NameQueryResult) -> NameQueryResult {
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: u32) -> WordRecord {
        WordRecord {
            id,
            k: vec![],
            r: vec![],
            sense: vec![],
        }
    }

    #[test]
    fn default_ranker_puts_exact_matches_first() {
        let ranker = InsertionOrderRanker;
        let ranked = ranker.rank(vec![
            RankedWord {
                rank: MatchRank::KanaEquivalent,
                record: word(2),
            },
            RankedWord {
                rank: MatchRank::Exact,
                record: word(1),
            },
        ]);
        assert_eq!(ranked[0].record.id, 1);
        assert_eq!(ranked[1].record.id, 2);
    }
}
