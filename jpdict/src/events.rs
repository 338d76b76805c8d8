use jpdict_types::Series;

/// Change-listener topics (spec.md §4.5, §6.4: "subscription to state
/// changes" with topics `stateupdated` and `deleted").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    StateUpdated { series: Series },
    Deleted,
}
