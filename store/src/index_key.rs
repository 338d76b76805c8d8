//! Composite secondary-index key encoding.
//!
//! Each entry in an index tree is a sentinel (empty-valued) key of the shape
//! `[tag:1][value_len:4 BE][value bytes][primary key bytes]`. The length
//! prefix makes an exact-value prefix scan unambiguous even though primary
//! keys are variable length (radical ids) or fixed-width integers (kanji,
//! name, word ids).

pub fn encode(tag: u8, value: &str, primary: &[u8]) -> Vec<u8> {
    let value_bytes = value.as_bytes();
    let mut key = Vec::with_capacity(1 + 4 + value_bytes.len() + primary.len());
    key.push(tag);
    key.extend_from_slice(&(value_bytes.len() as u32).to_be_bytes());
    key.extend_from_slice(value_bytes);
    key.extend_from_slice(primary);
    key
}

pub fn prefix(tag: u8, value: &str) -> Vec<u8> {
    let value_bytes = value.as_bytes();
    let mut key = Vec::with_capacity(1 + 4 + value_bytes.len());
    key.push(tag);
    key.extend_from_slice(&(value_bytes.len() as u32).to_be_bytes());
    key.extend_from_slice(value_bytes);
    key
}

/// Recover the primary-key suffix from a full index key, given the same tag
/// and value used to encode it.
pub fn primary_suffix<'a>(full_key: &'a [u8], tag: u8, value: &str) -> Option<&'a [u8]> {
    let p = prefix(tag, value);
    full_key.strip_prefix(p.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_a_true_prefix_of_the_full_key() {
        let full = encode(3, "あ", b"\x00\x00\x00\x01");
        let pfx = prefix(3, "あ");
        assert!(full.starts_with(&pfx));
        assert_eq!(primary_suffix(&full, 3, "あ"), Some(&b"\x00\x00\x00\x01"[..]));
    }

    #[test]
    fn different_values_do_not_share_a_prefix_ambiguously() {
        let a = prefix(1, "あ");
        let b = prefix(1, "あい");
        assert!(!b.starts_with(&a) || a.len() == b.len());
        assert_ne!(a, b);
    }
}
