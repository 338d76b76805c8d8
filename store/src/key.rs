//! Primary-key byte encodings. Kanji/name/word ids are `u32`; radical ids are
//! free-form strings (`"73"`, `"73-2"`, `"130-2"`).

pub fn u32_key(id: u32) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

pub fn str_key(id: &str) -> Vec<u8> {
    id.as_bytes().to_vec()
}
