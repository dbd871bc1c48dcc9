use std::io::{self, Cursor, Read};

use assert_matches::assert_matches;

use huff_decoder::{
    decode, decode_to_vec, DecodeConfig, DecodeError, DecodeOptions, SymbolCountConvention,
};

fn header(original_size: u32, entries: &[(u8, u32)]) -> Vec<u8> {
    let mut bytes = original_size.to_be_bytes().to_vec();
    bytes.push(entries.len() as u8);
    for &(symbol, freq) in entries {
        bytes.push(symbol);
        if original_size <= 0xFFFF {
            bytes.extend_from_slice(&(freq as u16).to_be_bytes());
        } else {
            bytes.extend_from_slice(&freq.to_be_bytes());
        }
    }
    bytes
}

#[test]
fn single_symbol_uses_dummy() {
    let data = [0x00, 0x00, 0x00, 0x05, 0x01, b'A', 0x00, 0x05, 0b0000_0000];
    assert_eq!(decode_to_vec(&data).unwrap(), b"AAAAA");
}

#[test]
fn two_symbols_in_header_order() {
    let mut data = header(3, &[(b'A', 2), (b'B', 1)]);
    data.push(0b0010_0000);
    assert_eq!(decode_to_vec(&data).unwrap(), b"AAB");
}

#[test]
fn empty_file() {
    assert_eq!(decode_to_vec(&[0, 0, 0, 0, 0]).unwrap(), Vec::<u8>::new());
}

#[test]
fn trailing_padding_discarded() {
    let mut data = header(10, &[(b'X', 10)]);
    data.push(0x00);
    assert_eq!(decode_to_vec(&data).unwrap(), vec![b'X'; 10]);
}

#[test]
fn wide_frequencies() {
    // equal weights: 'a' is extracted first and takes the 1 branch
    let mut data = header(70_000, &[(b'a', 35_000), (b'b', 35_000)]);
    assert_eq!(data.len(), 4 + 1 + 2 * 5);
    data.extend(std::iter::repeat(0x00).take(35_000 / 8));
    data.extend(std::iter::repeat(0xFF).take(35_000 / 8));

    let out = decode_to_vec(&data).unwrap();
    assert_eq!(out.len(), 70_000);
    assert!(out[..35_000].iter().all(|&b| b == b'b'));
    assert!(out[35_000..].iter().all(|&b| b == b'a'));
}

#[test]
fn three_symbol_tree() {
    // a:1 b:1 c:2 -> c=1, a=01, b=00
    let mut data = header(4, &[(b'a', 1), (b'b', 1), (b'c', 2)]);
    // c a b c -> 1 01 00 1
    data.push(0b1010_0100);
    assert_eq!(decode_to_vec(&data).unwrap(), b"cabc");
}

#[test]
fn truncated_table() {
    let mut data = header(6, &[(b'a', 3), (b'b', 3)]);
    data[4] = 3;
    assert_matches!(decode_to_vec(&data), Err(DecodeError::HeaderTruncated(_)));
}

#[test]
fn truncated_preamble() {
    assert_matches!(decode_to_vec(&[0, 0]), Err(DecodeError::HeaderTruncated(_)));
}

#[test]
fn negative_size() {
    assert_matches!(
        decode_to_vec(&[0x80, 0, 0, 0, 0]),
        Err(DecodeError::InvalidSize(i32::MIN))
    );
}

#[test]
fn duplicate_symbol() {
    let data = header(2, &[(b'd', 1), (b'd', 1)]);
    assert_matches!(decode_to_vec(&data), Err(DecodeError::DuplicateSymbol(b'd')));
}

#[test]
fn zero_symbols_with_payload() {
    assert_matches!(
        decode_to_vec(&[0, 0, 0, 1, 0]),
        Err(DecodeError::ZeroSymbolsWithPayload(1))
    );
}

#[test]
fn zero_count_byte_as_256() {
    let entries: Vec<(u8, u32)> = (0..=255u8).map(|b| (b, 1)).collect();
    let mut data = header(256, &entries);
    assert_eq!(data[4], 0);
    // all weights equal, so every code is 8 bits long
    data.extend([0u8; 256]);

    assert_matches!(decode_to_vec(&data), Err(DecodeError::ZeroSymbolsWithPayload(256)));

    let config = DecodeConfig::default().with_symbol_count(SymbolCountConvention::ZeroMeans256);
    let mut out = Vec::new();
    decode(&mut Cursor::new(&data), &mut out, &DecodeOptions::new(config)).unwrap();
    assert_eq!(out.len(), 256);
    assert!(out.iter().all(|&b| b == out[0]));
}

#[test]
fn inconsistent_table() {
    let mut data = header(2, &[(b'a', 5), (b'b', 5)]);
    data.push(0);
    assert!(decode_to_vec(&data).is_ok());

    let config = DecodeConfig::default().with_verify_frequency_sum(true);
    let result = decode(&mut Cursor::new(&data), &mut Vec::new(), &DecodeOptions::new(config));
    assert_matches!(
        result,
        Err(DecodeError::InconsistentTable {
            declared: 10,
            expected: 2
        })
    );
}

#[test]
fn payload_too_short() {
    let data = header(4, &[(b'a', 2), (b'b', 2)]);
    assert_matches!(
        decode_to_vec(&data),
        Err(DecodeError::UnexpectedEndOfBits {
            written: 0,
            expected: 4
        })
    );
}

struct BrokenSource;

impl Read for BrokenSource {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    }
}

#[test]
fn source_failure() {
    let result = decode(&mut BrokenSource, &mut Vec::new(), &DecodeOptions::default());
    assert_matches!(result, Err(DecodeError::Io(e)) if e.kind() == io::ErrorKind::PermissionDenied);
}

#[test]
fn cancelled() {
    let token = huff_decoder::CancelToken::new();
    token.cancel();
    let options = DecodeOptions::default().with_cancel(&token);
    let result = decode(&mut Cursor::new([0u8, 0, 0, 0, 0]), &mut Vec::new(), &options);
    assert_matches!(result, Err(DecodeError::Cancelled));
}

#[test]
fn error_messages() {
    assert_eq!(
        DecodeError::DuplicateSymbol(0x41).to_string(),
        "duplicate symbol 0x41 in frequency table"
    );
    assert_eq!(
        DecodeError::UnexpectedEndOfBits {
            written: 1,
            expected: 3
        }
        .to_string(),
        "payload ended after 1 of 3 bytes"
    );
}
