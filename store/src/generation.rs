use crate::error::StoreError;
use jpdict_types::Series;

/// Key under the `meta` tree holding the current generation number for a
/// series. Bumped on every full-table replace ([`crate::DropSpec::All`]);
/// patches ([`crate::DropSpec::Ids`]) operate on the current generation's
/// trees in place and do not touch this counter.
fn meta_key(series: Series) -> Vec<u8> {
    format!("gen:{}", series.name()).into_bytes()
}

pub fn current(meta: &sled::Tree, series: Series) -> Result<u64, StoreError> {
    match meta.get(meta_key(series))? {
        Some(v) => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&v);
            Ok(u64::from_be_bytes(buf))
        }
        None => Ok(0),
    }
}

pub fn bump_in_txn(
    meta: &sled::transaction::TransactionalTree,
    series: Series,
    next: u64,
) -> sled::transaction::ConflictableTransactionResult<(), StoreError> {
    meta.insert(meta_key(series), &next.to_be_bytes())?;
    Ok(())
}

/// Tree name for a series' primary data at a given generation. Old
/// generations are never dropped (see DESIGN.md); they become unreachable
/// disk garbage reclaimed only by [`crate::Store::destroy`].
pub fn data_tree_name(series: Series, generation: u64) -> String {
    format!("data:{}:{}", series.name(), generation)
}

pub fn index_tree_name(series: Series, generation: u64) -> String {
    format!("index:{}:{}", series.name(), generation)
}
