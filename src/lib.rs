//! One-time passwords per RFC 4226 (HOTP) and RFC 6238 (TOTP)
//!
//! This crate provides counter- and time-based OTP generation and
//! validation, an RFC 4648 Base32 codec for shared secrets, and a
//! parser/serializer for the `otpauth://` URI format used by authenticator
//! apps. Everything is pure computation; the only external collaborator is
//! the wall-clock [`Clock`], and every time-dependent function has an `_at`
//! variant taking an explicit timestamp.
//!
//! # Examples
//!
//! ```
//! use otpkit::{totp, Algorithm};
//!
//! // RFC 6238 SHA-1 test vector
//! let code = totp::generate_at("12345678901234567890", 30, 8, Algorithm::Sha1, 59).unwrap();
//! assert_eq!(code, "94287082");
//!
//! let ok = totp::validate_at("12345678901234567890", &code, 30, 8, Algorithm::Sha1, 1, 59).unwrap();
//! assert!(ok);
//! ```
//!
//! Provisioning URIs round-trip through [`OtpUri`]:
//!
//! ```
//! use otpkit::OtpUri;
//!
//! let uri: OtpUri = "otpauth://totp/Example:alice@host.com?secret=JBSWY3DPEHPK3PXP&issuer=Example"
//!     .parse()
//!     .unwrap();
//! assert_eq!(uri.account(), "alice@host.com");
//! assert_eq!(uri.secret(), Some("JBSWY3DPEHPK3PXP"));
//! ```

pub mod algorithm;
pub mod base32;
pub mod clock;
pub mod error;
pub mod hotp;
pub mod otp;
pub mod totp;
pub mod uri;

pub use algorithm::Algorithm;
pub use clock::{Clock, SystemClock};
pub use error::{OtpError, Result};
pub use hotp::Hotp;
pub use otp::Authenticator;
pub use totp::Totp;
pub use uri::OtpUri;
