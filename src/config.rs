/// How a `symbolCount` header byte of `0` is read.
///
/// A single unsigned byte cannot hold 256, so some encoders write `0` for a
/// table that uses every byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolCountConvention {
    /// `0` means an empty table. Only valid for an empty payload.
    #[default]
    Strict,
    /// `0` means 256 symbols whenever the payload is non-empty.
    ZeroMeans256,
}

impl SymbolCountConvention {
    pub fn symbol_count(self, raw: u8, original_size: u32) -> usize {
        match (self, raw) {
            (SymbolCountConvention::ZeroMeans256, 0) if original_size > 0 => 256,
            (_, n) => n as usize,
        }
    }
}

/// Which branch of a merged node receives the node extracted first, i.e. the
/// lighter of the pair. Must agree with the encoder that wrote the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchOrder {
    /// Lighter node on the `1` branch, heavier on the `0` branch.
    #[default]
    LighterOnOne,
    /// Lighter node on the `0` branch.
    LighterOnZero,
}

impl BranchOrder {
    /// Bit that selects the first-extracted child.
    pub fn lighter_bit(self) -> bool {
        matches!(self, BranchOrder::LighterOnOne)
    }
}

pub const DEFAULT_OUTPUT_BUFFER: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeConfig {
    pub symbol_count: SymbolCountConvention,
    pub branch_order: BranchOrder,
    /// Reject tables whose frequencies do not sum to the original size.
    pub verify_frequency_sum: bool,
    /// Bytes staged before each write to the sink. `0` writes through.
    pub output_buffer: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        DecodeConfig {
            symbol_count: SymbolCountConvention::default(),
            branch_order: BranchOrder::default(),
            verify_frequency_sum: false,
            output_buffer: DEFAULT_OUTPUT_BUFFER,
        }
    }
}

impl DecodeConfig {
    pub fn with_symbol_count(mut self, convention: SymbolCountConvention) -> Self {
        self.symbol_count = convention;
        self
    }

    pub fn with_branch_order(mut self, order: BranchOrder) -> Self {
        self.branch_order = order;
        self
    }

    pub fn with_verify_frequency_sum(mut self, verify: bool) -> Self {
        self.verify_frequency_sum = verify;
        self
    }

    pub fn with_output_buffer(mut self, bytes: usize) -> Self {
        self.output_buffer = bytes;
        self
    }
}
