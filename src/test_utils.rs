//! Reference encoder used to produce `.huff` images for decoder tests.

use crate::config::BranchOrder;
use crate::hufftree::HuffmanTree;
use crate::metadata::{uses_short_frequencies, FrequencyTable};

#[derive(Default, Debug)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8;
        let bit_offset = self.bit_count % 8;

        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }
        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }
        self.bit_count += 1;
    }

    pub fn push_code(&mut self, code: &[bool]) {
        for &bit in code {
            self.push_bit(bit);
        }
    }
}

/// Byte counts in order of first occurrence.
pub fn frequencies_of(data: &[u8]) -> FrequencyTable {
    let mut counts = [0u32; 256];
    let mut order = Vec::new();
    for &byte in data {
        if counts[byte as usize] == 0 {
            order.push(byte);
        }
        counts[byte as usize] += 1;
    }
    order.into_iter().map(|b| (b, counts[b as usize])).collect()
}

/// Header bytes; a 256-entry table is written with a count byte of `0`.
pub fn write_header(original_size: u32, table: &FrequencyTable) -> Vec<u8> {
    let mut bytes = original_size.to_be_bytes().to_vec();
    bytes.push(table.len() as u8);
    for (symbol, freq) in table.iter() {
        bytes.push(symbol);
        if uses_short_frequencies(original_size) {
            bytes.extend_from_slice(&(freq as u16).to_be_bytes());
        } else {
            bytes.extend_from_slice(&freq.to_be_bytes());
        }
    }
    bytes
}

pub fn encode(data: &[u8], order: BranchOrder) -> Vec<u8> {
    let table = frequencies_of(data);
    let mut out = write_header(data.len() as u32, &table);
    if table.is_empty() {
        return out;
    }

    let codes = HuffmanTree::from_frequencies(&table, order)
        .expect("non-empty table")
        .code_table();
    let mut bits = BitVec::new();
    for byte in data {
        bits.push_code(&codes[byte]);
    }
    out.extend_from_slice(bits.as_bytes());
    out
}

#[test]
fn bit_vec_packs_msb_first() {
    let mut bits = BitVec::new();
    bits.push_code(&[true, false, true]);
    assert_eq!(bits.as_bytes(), &[0b1010_0000]);
    assert_eq!(bits.bit_count(), 3);
}

#[test]
fn header_layout() {
    let table = frequencies_of(b"ABA");
    assert_eq!(write_header(3, &table), vec![0, 0, 0, 3, 2, b'A', 0, 2, b'B', 0, 1]);
}
