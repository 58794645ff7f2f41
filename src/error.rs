//! Error types for the otpkit library
//!
//! All errors are deterministic and surfaced at the point of detection;
//! nothing is retried internally.

use thiserror::Error;

/// OTP generation, validation and URI handling errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    /// Base32 decoding met a character outside the RFC 4648 alphabet
    #[error("invalid Base32 character: {character}")]
    InvalidEncoding { character: char },

    /// Out-of-range digits or period, or a malformed validation token
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    /// An `otpauth://` URI failed a structural check
    #[error("invalid URI: {reason}")]
    InvalidFormat { reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, OtpError>;
