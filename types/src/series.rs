use serde::{Deserialize, Serialize};

/// One of the independently-versioned dictionary partitions.
///
/// `kanji`, `radicals` and `names` are always present; `words` is schema-gated
/// and may be absent from an older store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Series {
    Kanji,
    Radicals,
    Names,
    Words,
}

impl Series {
    /// Every series, in a stable, dependency-respecting order (radicals before
    /// kanji, since kanji lookups cross-reference radicals).
    pub const ALL: [Series; 4] = [Series::Radicals, Series::Kanji, Series::Names, Series::Words];

    /// Stable small integer key used for the Version table (kanji=1, radicals=2,
    /// names=3, words=4, per spec.md §6.3).
    pub const fn table_id(self) -> u8 {
        match self {
            Series::Kanji => 1,
            Series::Radicals => 2,
            Series::Names => 3,
            Series::Words => 4,
        }
    }

    pub fn from_table_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Series::Kanji),
            2 => Some(Series::Radicals),
            3 => Some(Series::Names),
            4 => Some(Series::Words),
            _ => None,
        }
    }

    /// Lowercase name as it appears in manifest keys and data file URLs.
    pub const fn name(self) -> &'static str {
        match self {
            Series::Kanji => "kanji",
            Series::Radicals => "radicals",
            Series::Names => "names",
            Series::Words => "words",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "kanji" => Some(Series::Kanji),
            "radicals" => Some(Series::Radicals),
            "names" => Some(Series::Names),
            "words" => Some(Series::Words),
            _ => None,
        }
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A request to update one or more series together (kanji always drags in
/// radicals, see `Database::update`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSet {
    pub series: Vec<Series>,
}

impl SeriesSet {
    pub fn contains(&self, series: Series) -> bool {
        self.series.contains(&series)
    }

    pub fn default_set() -> Self {
        Self {
            series: vec![Series::Kanji, Series::Radicals],
        }
    }

    /// Kanji lookups cross-reference radicals, so requesting kanji implies radicals.
    pub fn normalized(mut self) -> Self {
        if self.series.contains(&Series::Kanji) && !self.series.contains(&Series::Radicals) {
            self.series.push(Series::Radicals);
        }
        self
    }
}
