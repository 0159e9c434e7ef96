// Error types shared by every fallible operation in the crate.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{path}: not valid utf-8")]
    InvalidUtf8 { path: String },

    #[error("malformed archive: {0}")]
    MalformedArchive(String),

    #[error("{path}: empty alphabet (file has no code points to encode)")]
    EmptyAlphabet { path: String },

    #[error("huffman code for U+{code_point:04X} exceeds the {max}-bit limit")]
    CodeTooLong { code_point: u32, max: u8 },

    #[error("internal invariant violated: {0}")]
    Fatal(String),
}
