use thiserror::Error;

/// Protocol-level failures while decoding a single LJSON line or header
/// (spec.md §7 "Protocol" taxonomy). None of these are retriable: the
/// upstream file is malformed and a retry would reproduce the same bytes.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid JSON on line {line}: {source}")]
    InvalidJson {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line} is not a recognized entry or deletion record for series {series}")]
    InvalidRecord { line: u64, series: &'static str },

    #[error("a deletion record appeared in a full snapshot file (line {line})")]
    DeletionInSnapshot { line: u64 },

    #[error("file is empty")]
    EmptyFile,

    #[error("first line of data file is not a header")]
    HeaderMissing,

    #[error("a second header appeared after line {after_line}")]
    DuplicateHeader { after_line: u64 },

    #[error(
        "header version {header:?} does not match the URL-embedded version {url:?}"
    )]
    VersionMismatch {
        header: (u32, u32, u32),
        url: (u32, u32, u32),
    },
}
