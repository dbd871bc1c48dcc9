//! # huff_decoder
//!
//! Streaming decoder for `.huff` files written by a canonical Huffman
//! compressor.
//!
//! A file is a big-endian size preamble, a frequency table in the order the
//! encoder enqueued its leaves, and an MSB-first bit payload. The decoder
//! rebuilds the encoder's tree from the table and walks it one bit at a time
//! until exactly the declared number of bytes has been written.
//!
//! ## Quick Start
//!
//! ```rust
//! use huff_decoder::decode_to_vec;
//!
//! // size 3, symbols A:2 and B:1, payload bits 0 0 1
//! let data = [0, 0, 0, 3, 2, b'A', 0, 2, b'B', 0, 1, 0b0010_0000];
//! assert_eq!(decode_to_vec(&data)?, b"AAB");
//! # Ok::<(), huff_decoder::DecodeError>(())
//! ```
//!
//! Streams, progress and cancellation go through [`decode`]:
//!
//! ```rust
//! use huff_decoder::{decode, CancelToken, DecodeOptions};
//!
//! let data: &[u8] = &[0, 0, 0, 2, 1, b'z', 0, 2];
//! let token = CancelToken::new();
//! let log = |message: &str| eprintln!("{message}");
//! let options = DecodeOptions::default().with_progress(&log).with_cancel(&token);
//!
//! let mut out = Vec::new();
//! decode(&mut &data[..], &mut out, &options)?;
//! assert_eq!(out, b"zz");
//! # Ok::<(), huff_decoder::DecodeError>(())
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod hufftree;
pub mod metadata;

// Internal modules - not part of public API
mod bit_reader;
mod min_heap;
#[cfg(test)]
mod test_utils;

// Re-export main types for convenience
pub use config::{BranchOrder, DecodeConfig, SymbolCountConvention};
pub use decoder::{decode, decode_to_vec, CancelToken, DecodeOptions, Progress};
pub use error::{DecodeError, Result};
pub use hufftree::HuffmanTree;
