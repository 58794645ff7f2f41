//! Shared HOTP/TOTP primitives
//!
//! Counter packing, HMAC computation, dynamic truncation (RFC 4226 §5.3),
//! code formatting, token normalization and secret handling. HOTP and TOTP
//! are both thin layers over these routines; they differ only in where the
//! moving factor comes from.

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::algorithm::Algorithm;
use crate::base32;
use crate::error::{OtpError, Result};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Minimum accepted code length.
pub const MIN_DIGITS: u32 = 6;
/// Maximum accepted code length.
pub const MAX_DIGITS: u32 = 10;

/// An OTP flavor: generate and validate codes from a shared secret and a
/// moving factor (an explicit counter for HOTP, a time step index for TOTP).
pub trait Authenticator {
    /// Type identifier used as the host of an `otpauth://` URI.
    const OTP_TYPE: &'static str;

    fn generate_token(
        secret: &str,
        moving_factor: u64,
        digits: u32,
        algorithm: Algorithm,
    ) -> Result<String>;

    fn validate(
        secret: &str,
        token: &str,
        moving_factor: u64,
        digits: u32,
        algorithm: Algorithm,
        window: u32,
    ) -> Result<bool>;
}

/// Pack a 64-bit counter as 8 big-endian bytes (RFC 4226 §5.2).
pub fn pack_counter_be(counter: u64) -> [u8; 8] {
    counter.to_be_bytes()
}

/// Compute the raw HMAC digest of `message` under `key`.
pub fn hmac_digest(algorithm: Algorithm, key: &[u8], message: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so construction cannot fail
    match algorithm {
        Algorithm::Sha1 => finalize_mac(
            HmacSha1::new_from_slice(key).expect("HMAC can take a key of any size"),
            message,
        ),
        Algorithm::Sha256 => finalize_mac(
            HmacSha256::new_from_slice(key).expect("HMAC can take a key of any size"),
            message,
        ),
        Algorithm::Sha512 => finalize_mac(
            HmacSha512::new_from_slice(key).expect("HMAC can take a key of any size"),
            message,
        ),
    }
}

fn finalize_mac<M: Mac>(mut mac: M, message: &[u8]) -> Vec<u8> {
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Dynamic truncation (RFC 4226 §5.3).
///
/// The low nibble of the digest's last byte selects an offset; the four
/// bytes starting there are read as a big-endian word, the sign bit is
/// cleared and the result reduced modulo `10^digits`. The reduction runs in
/// 64-bit arithmetic since `10^10` exceeds `u32::MAX`.
pub fn dynamic_truncate(digest: &[u8], digits: u32) -> u64 {
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let word = u32::from_be_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]) & 0x7fff_ffff;
    u64::from(word) % 10u64.pow(digits)
}

/// Left-zero-pad a truncated code to exactly `digits` characters.
pub fn format_code(code: u64, digits: u32) -> String {
    format!("{code:0width$}", width = digits as usize)
}

/// The full RFC 4226 pipeline: pack, HMAC, truncate, format.
pub(crate) fn generate_code(key: &[u8], counter: u64, digits: u32, algorithm: Algorithm) -> String {
    let digest = hmac_digest(algorithm, key, &pack_counter_be(counter));
    format_code(dynamic_truncate(&digest, digits), digits)
}

pub(crate) fn check_digits(digits: u32) -> Result<()> {
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        return Err(OtpError::InvalidParameter {
            reason: format!("digits must be between {MIN_DIGITS} and {MAX_DIGITS}, got {digits}"),
        });
    }
    Ok(())
}

/// Normalize a submitted token: strip whitespace, require digits only,
/// left-zero-pad to `digits` when shorter.
pub fn normalize_token(token: &str, digits: u32) -> Result<String> {
    let stripped: String = token.chars().filter(|c| !c.is_whitespace()).collect();

    if stripped.is_empty() || !stripped.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OtpError::InvalidParameter {
            reason: "token must contain digits only".to_string(),
        });
    }

    if stripped.len() < digits as usize {
        Ok(format!("{stripped:0>width$}", width = digits as usize))
    } else {
        Ok(stripped)
    }
}

/// Constant-time token comparison. Timing must not reveal partial matches.
pub(crate) fn tokens_match(candidate: &str, normalized: &str) -> bool {
    constant_time_eq(candidate.as_bytes(), normalized.as_bytes())
}

/// Decode a shared secret for use as key material.
///
/// Falls back to the raw input bytes when the text is not Base32 or decodes
/// to nothing. This is a compatibility policy, not an error path: RFC test
/// secrets and human-typed secrets are accepted as-is.
pub fn decode_secret(secret: &str) -> Vec<u8> {
    match base32::decode(secret) {
        Ok(key) if !key.is_empty() => key,
        _ => secret.as_bytes().to_vec(),
    }
}

/// Generate a random Base32-encoded secret for storage and display.
pub fn generate_secret(length: usize, padding: bool) -> String {
    let mut bytes = vec![0u8; length];
    rand::thread_rng().fill_bytes(&mut bytes);
    base32::encode(&bytes, padding)
}
