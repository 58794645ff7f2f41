//! TOTP: time-based one-time passwords (RFC 6238)
//!
//! TOTP is HOTP with the counter derived from wall-clock time:
//! `T = floor(unix_time / period)`. Functions without an `_at` suffix read
//! the time from [`SystemClock`]; the `_at` variants take an explicit
//! timestamp for deterministic use.

use tracing::{debug, trace};

use crate::algorithm::Algorithm;
use crate::clock::{Clock, SystemClock};
use crate::error::{OtpError, Result};
use crate::otp::{self, Authenticator};
use crate::uri::OtpUri;

/// RFC 6238 default time step in seconds.
pub const DEFAULT_PERIOD: u64 = 30;

/// Time-based OTP generator (RFC 6238).
#[derive(Debug, Clone, Copy)]
pub struct Totp;

impl Authenticator for Totp {
    const OTP_TYPE: &'static str = "totp";

    fn generate_token(
        secret: &str,
        period: u64,
        digits: u32,
        algorithm: Algorithm,
    ) -> Result<String> {
        generate(secret, period, digits, algorithm)
    }

    fn validate(
        secret: &str,
        token: &str,
        period: u64,
        digits: u32,
        algorithm: Algorithm,
        window: u32,
    ) -> Result<bool> {
        validate(secret, token, period, digits, algorithm, window)
    }
}

/// Generate the TOTP code for the current system time.
///
/// # Errors
///
/// [`OtpError::InvalidParameter`](crate::OtpError::InvalidParameter) when
/// `period` is zero or `digits` is outside `[6, 10]`.
pub fn generate(secret: &str, period: u64, digits: u32, algorithm: Algorithm) -> Result<String> {
    generate_at(secret, period, digits, algorithm, SystemClock.now())
}

/// Generate the TOTP code for an explicit Unix timestamp.
pub fn generate_at(
    secret: &str,
    period: u64,
    digits: u32,
    algorithm: Algorithm,
    time: u64,
) -> Result<String> {
    check_period(period)?;
    otp::check_digits(digits)?;
    let key = otp::decode_secret(secret);
    Ok(otp::generate_code(&key, time / period, digits, algorithm))
}

/// Validate a submitted token against the current system time.
pub fn validate(
    secret: &str,
    token: &str,
    period: u64,
    digits: u32,
    algorithm: Algorithm,
    window: u32,
) -> Result<bool> {
    validate_at(secret, token, period, digits, algorithm, window, SystemClock.now())
}

/// Validate a submitted token against an explicit reference time.
///
/// The search covers time offsets `-window..=+window` steps of `period`
/// around `time`. Unlike HOTP the window is bidirectional, tolerating both
/// early and late clocks. Candidate comparison is constant-time.
///
/// # Errors
///
/// [`OtpError::InvalidParameter`](crate::OtpError::InvalidParameter) when
/// the token contains non-digit characters after whitespace stripping, or
/// when `period` or `digits` is out of range.
pub fn validate_at(
    secret: &str,
    token: &str,
    period: u64,
    digits: u32,
    algorithm: Algorithm,
    window: u32,
    time: u64,
) -> Result<bool> {
    check_period(period)?;
    let normalized = otp::normalize_token(token, digits)?;
    let step = i64::try_from(period).unwrap_or(i64::MAX);

    for i in -i64::from(window)..=i64::from(window) {
        // Candidate time steps before the epoch are skipped
        let Some(shifted) = time.checked_add_signed(i.saturating_mul(step)) else {
            continue;
        };
        let candidate = generate_at(secret, period, digits, algorithm, shifted)?;
        if otp::tokens_match(&candidate, &normalized) {
            trace!(offset = i, "TOTP token matched within window");
            return Ok(true);
        }
    }

    debug!(window, "TOTP token did not match any time step in window");
    Ok(false)
}

/// Seconds until the code for the current system time rolls over.
pub fn ttl(period: u64) -> Result<u64> {
    ttl_at(period, SystemClock.now())
}

/// Seconds until the code at `time` rolls over.
pub fn ttl_at(period: u64, time: u64) -> Result<u64> {
    check_period(period)?;
    Ok(period - time % period)
}

/// Build an `otpauth://totp/...` provisioning URI for this secret.
pub fn build_auth_uri(
    secret: &str,
    account: &str,
    issuer: Option<&str>,
    period: u64,
    digits: u32,
    algorithm: Algorithm,
) -> OtpUri {
    OtpUri::build_for::<Totp>(account, issuer).push_all([
        ("secret", secret.to_string()),
        ("period", period.to_string()),
        ("digits", digits.to_string()),
        ("algorithm", algorithm.to_string()),
    ])
}

fn check_period(period: u64) -> Result<()> {
    if period == 0 {
        return Err(OtpError::InvalidParameter {
            reason: "period must be greater than zero".to_string(),
        });
    }
    Ok(())
}
