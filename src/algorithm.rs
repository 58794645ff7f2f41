//! Hash algorithm selection
//!
//! RFC 4226 requires HMAC-SHA-1; RFC 6238 extends support to HMAC-SHA-256
//! and HMAC-SHA-512. SHA-1 stays the default for authenticator-app
//! compatibility.

use std::fmt;
use std::str::FromStr;

use crate::error::OtpError;

/// Hash algorithm selecting the HMAC function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    /// HMAC digest length in bytes.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha1 => write!(f, "SHA1"),
            Self::Sha256 => write!(f, "SHA256"),
            Self::Sha512 => write!(f, "SHA512"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = OtpError;

    /// Case-insensitive; accepts both `SHA1` and `SHA-1` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            other => Err(OtpError::InvalidParameter {
                reason: format!("unsupported algorithm: {other}"),
            }),
        }
    }
}
