/// Progress reported during a [`crate::Store`] bulk update, per spec.md §4.1
/// "progress reporting": `processed` includes the drop count (if any) plus
/// the number of records put so far; `total` is the final expected count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: u64,
    pub total: u64,
}

pub type ProgressFn<'a> = Box<dyn FnMut(Progress) + Send + 'a>;
