//! RFC 4648 Base32 codec
//!
//! Secrets are transported and displayed in Base32, so decoding is lenient:
//! case-insensitive, tolerant of internal whitespace and of missing `=`
//! padding. Incomplete trailing bit groups are treated as padding, not data.

use crate::error::{OtpError, Result};

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Encode raw bytes as uppercase Base32.
///
/// When `padding` is set, `=` characters are appended until the output
/// length is a multiple of 8; an output already on an 8-character boundary
/// gets none.
pub fn encode(binary: &[u8], padding: bool) -> String {
    if binary.is_empty() {
        return String::new();
    }

    let mut output = String::with_capacity(binary.len().div_ceil(5) * 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for &byte in binary {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            output.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }

    // Final group, right-padded with zero bits
    if bits > 0 {
        output.push(ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }

    if padding {
        let remainder = output.len() % 8;
        if remainder != 0 {
            for _ in remainder..8 {
                output.push('=');
            }
        }
    }

    output
}

/// Decode Base32 text to bytes.
///
/// Accepts upper and lower case, internal whitespace and trailing `=`
/// padding. A character outside the alphabet is an
/// [`OtpError::InvalidEncoding`] naming the offending character. A trailing
/// group shorter than 8 bits is discarded.
pub fn decode(base32: &str) -> Result<Vec<u8>> {
    let clean: String = base32
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let clean = clean.trim_end_matches('=');

    if clean.is_empty() {
        return Ok(Vec::new());
    }

    let mut output = Vec::with_capacity(clean.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for ch in clean.chars() {
        let index = ALPHABET
            .iter()
            .position(|&symbol| symbol as char == ch)
            .ok_or(OtpError::InvalidEncoding { character: ch })?;
        buffer = (buffer << 5) | index as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            output.push(((buffer >> bits) & 0xff) as u8);
        }
    }

    Ok(output)
}
