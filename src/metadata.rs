use std::io::{self, Read};

use tracing::debug;

use crate::config::DecodeConfig;
use crate::error::{DecodeError, Result};

/// Largest original size whose frequencies are stored as 16-bit values.
pub const SHORT_FREQ_LIMIT: u32 = 0xFFFF;

/// Symbol frequencies in the order they appeared in the header.
///
/// That order is the tie-break sequence of the tree builder, so it is kept
/// as-is rather than sorted or hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(u8, u32)>,
    seen: [bool; 256],
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            entries: Vec::new(),
            seen: [false; 256],
        }
    }

    pub fn insert(&mut self, symbol: u8, freq: u32) -> Result<()> {
        if self.seen[symbol as usize] {
            return Err(DecodeError::DuplicateSymbol(symbol));
        }
        self.seen[symbol as usize] = true;
        self.entries.push((symbol, freq));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.seen[symbol as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, freq)| freq as u64).sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(u8, u32)> for FrequencyTable {
    /// Later duplicates are dropped; use [`FrequencyTable::insert`] to reject them.
    fn from_iter<I: IntoIterator<Item = (u8, u32)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (symbol, freq) in iter {
            let _ = table.insert(symbol, freq);
        }
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub original_size: u32,
    pub frequencies: FrequencyTable,
}

impl Header {
    /// Frequencies are 16 bits wide for small files, 32 otherwise.
    pub fn use_short(&self) -> bool {
        uses_short_frequencies(self.original_size)
    }
}

pub fn uses_short_frequencies(original_size: u32) -> bool {
    original_size <= SHORT_FREQ_LIMIT
}

fn read_field<const N: usize, R: Read>(reader: &mut R, field: &'static str) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => DecodeError::HeaderTruncated(field),
        _ => DecodeError::Io(e),
    })?;
    Ok(bytes)
}

/// Reads the size preamble and frequency table, leaving `reader` positioned
/// at the first payload byte.
pub fn read_header<R: Read>(reader: &mut R, config: &DecodeConfig) -> Result<Header> {
    let original_size = i32::from_be_bytes(read_field(reader, "original size")?);
    let original_size =
        u32::try_from(original_size).map_err(|_| DecodeError::InvalidSize(original_size))?;

    let [raw_count] = read_field::<1, _>(reader, "symbol count")?;
    let symbol_count = config.symbol_count.symbol_count(raw_count, original_size);
    if symbol_count == 0 && original_size > 0 {
        return Err(DecodeError::ZeroSymbolsWithPayload(original_size));
    }

    let use_short = uses_short_frequencies(original_size);
    let mut frequencies = FrequencyTable::new();
    for _ in 0..symbol_count {
        let [symbol] = read_field::<1, _>(reader, "symbol")?;
        let freq = if use_short {
            u16::from_be_bytes(read_field(reader, "frequency")?) as u32
        } else {
            u32::from_be_bytes(read_field(reader, "frequency")?)
        };
        frequencies.insert(symbol, freq)?;
    }

    if config.verify_frequency_sum && frequencies.total() != original_size as u64 {
        return Err(DecodeError::InconsistentTable {
            declared: frequencies.total(),
            expected: original_size,
        });
    }

    debug!(original_size, symbol_count, use_short, "header parsed");

    Ok(Header {
        original_size,
        frequencies,
    })
}
