use crate::error::ParseError;

/// Incremental splitter over `\n`, `\r`, and `\r\n` line endings, fed raw
/// byte chunks as they arrive off the wire (spec.md §4.2 bullet 6: "never
/// buffer whole file").
///
/// Delimiter bytes (`0x0A`, `0x0D`) never occur as a lead or continuation
/// byte of a multi-byte UTF-8 sequence, so scanning the raw bytes for them is
/// safe even though the payload (Japanese text) is full of multi-byte
/// characters.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buf: Vec<u8>,
    /// Set when a chunk ended in a bare `\r` that might be the first half of
    /// a `\r\n` pair split across a chunk boundary.
    skip_leading_lf: bool,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every complete line discovered so far.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>, ParseError> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0usize;

        if self.skip_leading_lf {
            self.skip_leading_lf = false;
            if self.buf.first() == Some(&b'\n') {
                start = 1;
            }
        }

        let mut i = start;
        while i < self.buf.len() {
            match self.buf[i] {
                b'\n' => {
                    lines.push(Self::decode(&self.buf[start..i])?);
                    start = i + 1;
                    i += 1;
                }
                b'\r' => {
                    lines.push(Self::decode(&self.buf[start..i])?);
                    if self.buf.get(i + 1) == Some(&b'\n') {
                        start = i + 2;
                        i += 2;
                    } else if i + 1 == self.buf.len() {
                        // could be a `\r\n` split across the chunk boundary
                        self.skip_leading_lf = true;
                        start = i + 1;
                        i += 1;
                    } else {
                        start = i + 1;
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }

        self.buf.drain(..start);
        Ok(lines)
    }

    /// Flush whatever remains in the buffer as a final, delimiter-less line
    /// (called at end-of-stream; a well-formed file still ends with a
    /// delimiter, so this normally returns `None`).
    pub fn finish(&mut self) -> Result<Option<String>, ParseError> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        let s = Self::decode(&self.buf)?;
        self.buf.clear();
        Ok(Some(s))
    }

    fn decode(bytes: &[u8]) -> Result<String, ParseError> {
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ParseError::InvalidUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_lf() {
        let mut s = LineSplitter::new();
        let lines = s.feed(b"a\nb\nc").unwrap();
        assert_eq!(lines, vec!["a", "b"]);
        assert_eq!(s.finish().unwrap(), Some("c".to_string()));
    }

    #[test]
    fn splits_on_cr() {
        let mut s = LineSplitter::new();
        let lines = s.feed(b"a\rb\rc\r").unwrap();
        assert_eq!(lines, vec!["a", "b", "c"]);
        assert_eq!(s.finish().unwrap(), None);
    }

    #[test]
    fn splits_on_crlf() {
        let mut s = LineSplitter::new();
        let lines = s.feed(b"a\r\nb\r\n").unwrap();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn crlf_split_across_chunks() {
        let mut s = LineSplitter::new();
        let mut lines = s.feed(b"a\r").unwrap();
        assert!(lines.is_empty());
        lines.extend(s.feed(b"\nb\r\n").unwrap());
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn bare_cr_not_followed_by_lf_across_chunks() {
        let mut s = LineSplitter::new();
        let lines = s.feed(b"a\r").unwrap();
        assert!(lines.is_empty());
        let lines2 = s.feed(b"b\n").unwrap();
        assert_eq!(lines2, vec!["a", "b"]);
    }

    #[test]
    fn preserves_multibyte_utf8_across_chunk_boundary() {
        let mut s = LineSplitter::new();
        let full = "引\n弓\n".as_bytes().to_vec();
        let (first, second) = full.split_at(2);
        let mut lines = s.feed(first).unwrap();
        lines.extend(s.feed(second).unwrap());
        assert_eq!(lines, vec!["引", "弓"]);
    }

    #[test]
    fn empty_feed_yields_nothing() {
        let mut s = LineSplitter::new();
        assert!(s.feed(b"").unwrap().is_empty());
        assert_eq!(s.finish().unwrap(), None);
    }
}
