use std::io::{self, Read};

/// MSB-first bit source over a borrowed reader.
///
/// Bytes are fetched one at a time, only when a bit is asked for, so the
/// underlying reader is never advanced past the last byte a bit came from.
/// Dropping the `BitReader` leaves the reader open; bits left in the current
/// byte are discarded.
pub struct BitReader<'a, R> {
    source: &'a mut R,
    buffer: u8,
    index: u8,
}

impl<'a, R: Read> BitReader<'a, R> {
    pub fn new(source: &'a mut R) -> Self {
        BitReader {
            source,
            buffer: 0,
            index: 8,
        }
    }

    /// Next bit, or `Ok(None)` once the source is exhausted on a byte boundary.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        if self.index == 8 {
            match self.fetch()? {
                Some(byte) => {
                    self.buffer = byte;
                    self.index = 0;
                }
                None => return Ok(None),
            }
        }
        let bit = (self.buffer >> (7 - self.index)) & 1;
        self.index += 1;
        Ok(Some(bit == 1))
    }

    fn fetch(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Bits still buffered from the last fetched byte.
    pub fn pending_bits(&self) -> u8 {
        8 - self.index
    }
}
