//! Packed string codec
//!
//! Strings in Comprehend data files are streams of 5-bit codes packed
//! least-significant-bit first, eight codes to every five bytes, and ended
//! by a NUL byte. Code 0 ends the string, 0x1e upper-cases the next
//! character and 0x1f takes the next character from the symbol charset.

use bitvec::prelude::*;
use log::trace;

use crate::error::GameError;
use crate::util::FileBuffer;

/// The lowercase charset. Index 0 is never produced because code 0 ends a string.
pub const CHARSET: &[u8] = b"..abcdefghijklmnopqrstuvwxyz .";
/// The symbol charset selected by the 0x1f escape
pub const SPECIAL_CHARSET: &[u8] = b"[]\n!\"#$%&'(),-/0123456789:;?<>";

const CODE_END: u8 = 0x00;
const CODE_CAPITAL: u8 = 0x1e;
const CODE_SPECIAL: u8 = 0x1f;
const CODE_BITS: usize = 5;

/// Runtime placeholder produced by an upper-cased space
pub const REPLACE_CHAR: char = '@';

fn decode_elem(c: u8, capital: bool, special: bool) -> char {
    if special {
        if (c as usize) < SPECIAL_CHARSET.len() {
            return SPECIAL_CHARSET[c as usize] as char;
        }
    } else if (c as usize) < CHARSET.len() {
        let ch = CHARSET[c as usize];
        if capital {
            // A capital space is replaced at print time
            if ch == b' ' {
                return REPLACE_CHAR;
            }
            return (ch - 0x20) as char;
        }
        return ch as char;
    }

    '*'
}

/// Decode the packed bytes of one string (without its NUL terminator)
pub fn decode_string(encoded: &[u8]) -> String {
    // Strings are decoded in 5 byte chunks, pad so the last chunk is whole
    let mut padded = encoded.to_vec();
    padded.resize(encoded.len().div_ceil(5) * 5, 0);
    let bits = padded.view_bits::<Lsb0>();

    let mut result = String::new();
    let mut capital_next = false;
    let mut special_next = false;

    for code_bits in bits.chunks_exact(CODE_BITS) {
        let elem = code_bits.load_le::<u8>();
        trace!("packed code {:#04x}", elem);
        match elem {
            CODE_END => break,
            CODE_CAPITAL => capital_next = true,
            CODE_SPECIAL => special_next = true,
            _ => {
                result.push(decode_elem(elem, capital_next, special_next));
                capital_next = false;
                special_next = false;
            }
        }
    }

    result
}

/// Read one NUL terminated packed string from the buffer
pub fn read_string(fb: &mut FileBuffer) -> Result<String, GameError> {
    let (len, eof) = fb.strlen();
    let encoded = fb.read_bytes(len)?;
    if !eof {
        fb.skip(1)?;
    }
    Ok(decode_string(encoded))
}

fn encode_char(ch: char, codes: &mut Vec<u8>) -> Result<(), GameError> {
    if ch == REPLACE_CHAR {
        codes.push(CODE_CAPITAL);
        codes.push(charset_code(CHARSET, b' ').unwrap_or(0));
        return Ok(());
    }
    if !ch.is_ascii() {
        return Err(GameError::BadString(format!("cannot encode {:?}", ch)));
    }

    let b = ch as u8;
    if let Some(code) = charset_code(CHARSET, b) {
        codes.push(code);
    } else if ch.is_ascii_uppercase() {
        codes.push(CODE_CAPITAL);
        codes.push(charset_code(CHARSET, b.to_ascii_lowercase()).unwrap_or(0));
    } else if let Some(code) = charset_code(SPECIAL_CHARSET, b) {
        codes.push(CODE_SPECIAL);
        codes.push(code);
    } else {
        return Err(GameError::BadString(format!("cannot encode {:?}", ch)));
    }
    Ok(())
}

/// Canonical code for `b` in a charset. Code 1 of the lowercase charset is
/// a placeholder slot that repeats code 29, so the last position wins.
fn charset_code(charset: &[u8], b: u8) -> Option<u8> {
    charset
        .iter()
        .enumerate()
        .skip(1)
        .take((CODE_CAPITAL - 1) as usize)
        .filter(|(_, c)| **c == b)
        .last()
        .map(|(i, _)| i as u8)
}

/// Encode text into packed bytes, the inverse of [`decode_string`].
/// The NUL terminator is not included.
pub fn encode_string(text: &str) -> Result<Vec<u8>, GameError> {
    let mut codes = Vec::new();
    for ch in text.chars() {
        encode_char(ch, &mut codes)?;
    }

    let mut packed = vec![0u8; (codes.len() * CODE_BITS).div_ceil(8)];
    {
        let bits = packed.view_bits_mut::<Lsb0>();
        for (i, code) in codes.iter().enumerate() {
            bits[i * CODE_BITS..(i + 1) * CODE_BITS].store_le::<u8>(*code);
        }
    }

    while packed.last() == Some(&0) {
        packed.pop();
    }
    if packed.contains(&0) {
        return Err(GameError::BadString(format!(
            "{:?} packs to an embedded NUL byte",
            text
        )));
    }

    Ok(packed)
}
