use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("header truncated while reading {0}")]
    HeaderTruncated(&'static str),

    #[error("invalid original size: {0}")]
    InvalidSize(i32),

    #[error("duplicate symbol 0x{0:02x} in frequency table")]
    DuplicateSymbol(u8),

    #[error("header declares {0} payload bytes but no symbols")]
    ZeroSymbolsWithPayload(u32),

    #[error("frequency table sums to {declared}, expected {expected}")]
    InconsistentTable { declared: u64, expected: u32 },

    #[error("malformed tree: {0}")]
    MalformedTree(&'static str),

    #[error("payload ended after {written} of {expected} bytes")]
    UnexpectedEndOfBits { written: u32, expected: u32 },

    #[error("bit descends below a leaf")]
    InvalidTreeWalk,

    #[error("decode stopped mid-descent")]
    TrailingDecodeState,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("decode cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, DecodeError>;
