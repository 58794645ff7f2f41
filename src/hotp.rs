//! HOTP: counter-based one-time passwords (RFC 4226)

use tracing::{debug, trace};

use crate::algorithm::Algorithm;
use crate::error::Result;
use crate::otp::{self, Authenticator};
use crate::uri::OtpUri;

/// Counter-based OTP generator (RFC 4226).
#[derive(Debug, Clone, Copy)]
pub struct Hotp;

impl Authenticator for Hotp {
    const OTP_TYPE: &'static str = "hotp";

    fn generate_token(
        secret: &str,
        counter: u64,
        digits: u32,
        algorithm: Algorithm,
    ) -> Result<String> {
        generate(secret, counter, digits, algorithm)
    }

    fn validate(
        secret: &str,
        token: &str,
        counter: u64,
        digits: u32,
        algorithm: Algorithm,
        window: u32,
    ) -> Result<bool> {
        validate(secret, token, counter, digits, algorithm, window)
    }
}

/// Generate the HOTP code for an explicit counter value.
///
/// The secret is decoded as Base32, falling back to its raw bytes when
/// decoding fails or yields an empty key.
///
/// # Errors
///
/// [`OtpError::InvalidParameter`](crate::OtpError::InvalidParameter) when
/// `digits` is outside `[6, 10]`.
pub fn generate(secret: &str, counter: u64, digits: u32, algorithm: Algorithm) -> Result<String> {
    otp::check_digits(digits)?;
    let key = otp::decode_secret(secret);
    Ok(otp::generate_code(&key, counter, digits, algorithm))
}

/// Validate a submitted token against counters `counter..=counter + window`.
///
/// The search is forward-only since HOTP counters only move forward.
/// Candidate comparison is constant-time.
///
/// # Errors
///
/// [`OtpError::InvalidParameter`](crate::OtpError::InvalidParameter) when
/// the token contains non-digit characters after whitespace stripping, or
/// when `digits` is out of range.
pub fn validate(
    secret: &str,
    token: &str,
    counter: u64,
    digits: u32,
    algorithm: Algorithm,
    window: u32,
) -> Result<bool> {
    let normalized = otp::normalize_token(token, digits)?;

    for step in 0..=u64::from(window) {
        let candidate = generate(secret, counter.saturating_add(step), digits, algorithm)?;
        if otp::tokens_match(&candidate, &normalized) {
            trace!(step, "HOTP token matched within window");
            return Ok(true);
        }
    }

    debug!(counter, window, "HOTP token did not match any counter in window");
    Ok(false)
}

/// Build an `otpauth://hotp/...` provisioning URI for this secret.
pub fn build_auth_uri(
    secret: &str,
    account: &str,
    issuer: Option<&str>,
    counter: u64,
    digits: u32,
    algorithm: Algorithm,
) -> OtpUri {
    OtpUri::build_for::<Hotp>(account, issuer).push_all([
        ("secret", secret.to_string()),
        ("counter", counter.to_string()),
        ("digits", digits.to_string()),
        ("algorithm", algorithm.to_string()),
    ])
}
