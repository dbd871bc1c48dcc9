use std::fmt;
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::bit_reader::BitReader;
use crate::config::DecodeConfig;
use crate::error::{DecodeError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::metadata::read_header;

/// Observer told about phase transitions of a decode.
pub trait Progress {
    fn notify(&self, message: &str);
}

impl<F: Fn(&str)> Progress for F {
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// Shared flag a decode polls between emitted symbols.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Default)]
pub struct DecodeOptions<'a> {
    pub progress: Option<&'a dyn Progress>,
    pub cancel: Option<&'a CancelToken>,
    pub config: DecodeConfig,
}

impl<'a> DecodeOptions<'a> {
    pub fn new(config: DecodeConfig) -> Self {
        DecodeOptions {
            config,
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancel(mut self, cancel: &'a CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn notify(&self, message: &str) {
        if let Some(progress) = self.progress {
            if panic::catch_unwind(AssertUnwindSafe(|| progress.notify(message))).is_err() {
                warn!(message, "progress observer panicked");
            }
        }
    }

    fn check_cancel(&self) -> Result<()> {
        match self.cancel {
            Some(token) if token.is_cancelled() => Err(DecodeError::Cancelled),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for DecodeOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeOptions")
            .field("progress", &self.progress.is_some())
            .field("cancel", &self.cancel)
            .field("config", &self.config)
            .finish()
    }
}

/// Decodes one `.huff` stream from `source` into `sink`.
///
/// Exactly `originalSize` bytes are written. `source` is left positioned
/// after the last payload byte a bit was taken from.
pub fn decode<R: Read, W: Write>(
    source: &mut R,
    sink: &mut W,
    options: &DecodeOptions<'_>,
) -> Result<()> {
    options.check_cancel()?;

    let header = read_header(source, &options.config)?;
    let original_size = header.original_size;
    options.notify(&format!(
        "header parsed: {} bytes, {} symbols",
        original_size,
        header.frequencies.len()
    ));

    if header.frequencies.is_empty() {
        options.notify("decode complete: 0 bytes");
        return Ok(());
    }

    let tree = HuffmanTree::from_frequencies(&header.frequencies, options.config.branch_order)?;
    options.notify(&format!(
        "tree built: {} leaves, depth {}",
        tree.leaf_count(),
        tree.depth()
    ));

    let mut out = Output::new(sink, options.config.output_buffer);
    let mut bits = BitReader::new(source);
    let written = walk(&tree, &mut bits, &mut out, original_size, options)?;
    out.finish()?;

    debug!(written, padding = bits.pending_bits(), "decode finished");
    options.notify(&format!("decode complete: {} bytes", written));
    Ok(())
}

/// Decodes an in-memory `.huff` image with default options.
pub fn decode_to_vec(data: &[u8]) -> Result<Vec<u8>> {
    let mut source = data;
    let mut out = Vec::new();
    let options = DecodeOptions::new(DecodeConfig::default().with_output_buffer(0));
    decode(&mut source, &mut out, &options)?;
    Ok(out)
}

/// Position of the tree walk between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk<'t> {
    AtRoot,
    Descending(&'t HuffNode),
    EmitPending(u8),
    Done,
}

impl<'t> Walk<'t> {
    /// Moves from `node` along `bit`.
    fn step(node: &'t HuffNode, bit: bool) -> Result<Self> {
        match node.child(bit) {
            Some(HuffNode::Leaf { byte, .. }) => Ok(Walk::EmitPending(*byte)),
            Some(next) => Ok(Walk::Descending(next)),
            None => Err(DecodeError::InvalidTreeWalk),
        }
    }

    fn finish(self) -> Result<()> {
        match self {
            Walk::AtRoot | Walk::EmitPending(_) | Walk::Done => Ok(()),
            Walk::Descending(_) => Err(DecodeError::TrailingDecodeState),
        }
    }
}

fn walk<R: Read, W: Write>(
    tree: &HuffmanTree,
    bits: &mut BitReader<'_, R>,
    out: &mut Output<'_, W>,
    original_size: u32,
    options: &DecodeOptions<'_>,
) -> Result<u32> {
    let root = tree.walk_root();
    let mut written = 0u32;
    let mut state = Walk::AtRoot;

    let mut next_bit = |written: u32| -> Result<bool> {
        bits.read_bit()?.ok_or(DecodeError::UnexpectedEndOfBits {
            written,
            expected: original_size,
        })
    };

    while written < original_size {
        state = match state {
            Walk::AtRoot => match root {
                HuffNode::Leaf { byte, .. } => Walk::EmitPending(*byte),
                HuffNode::Internal { .. } => Walk::step(root, next_bit(written)?)?,
            },
            Walk::Descending(node) => Walk::step(node, next_bit(written)?)?,
            Walk::EmitPending(byte) => {
                out.push(byte)?;
                written += 1;
                options.check_cancel()?;
                if written == original_size {
                    Walk::Done
                } else {
                    Walk::AtRoot
                }
            }
            Walk::Done => break,
        };
    }

    state.finish()?;
    Ok(written)
}

/// Staging buffer in front of the sink.
struct Output<'w, W: Write> {
    sink: &'w mut W,
    buf: Vec<u8>,
    capacity: usize,
}

impl<'w, W: Write> Output<'w, W> {
    fn new(sink: &'w mut W, capacity: usize) -> Self {
        Output {
            sink,
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, byte: u8) -> Result<()> {
        if self.capacity == 0 {
            self.sink.write_all(&[byte])?;
            return Ok(());
        }
        self.buf.push(byte);
        if self.buf.len() >= self.capacity {
            self.drain()?;
        }
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            self.sink.write_all(&self.buf)?;
            self.buf.clear();
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.drain()?;
        self.sink.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for Output<'_, W> {
    fn drop(&mut self) {
        // bytes decoded before an error still reach the sink
        let _ = self.drain();
    }
}
