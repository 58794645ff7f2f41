//! `otpauth://` provisioning URIs
//!
//! A bidirectional codec between structured OTP parameters and the URI
//! string format consumed by authenticator apps:
//!
//! ```text
//! otpauth://{hotp|totp}/{[issuer:]account}?secret=...&algorithm=...&digits=...
//! ```
//!
//! The query is an ordered string-to-string mapping with well-known keys
//! (`secret`, `digits`, `algorithm`, `period`, `counter`, `issuer`) plus
//! room for arbitrary extra parameters. Insertion order is preserved so
//! serialization is stable. The `issuer` field and the `issuer` query entry
//! are kept consistent whenever either is mutated.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use tracing::debug;
use url::Url;

use crate::algorithm::Algorithm;
use crate::error::{OtpError, Result};
use crate::otp::Authenticator;

/// Scheme expected by authenticator apps.
pub const DEFAULT_SCHEME: &str = "otpauth";

const DEFAULT_ALGORITHM: &str = "SHA1";
const DEFAULT_DIGITS: u32 = 6;

/// Structured form of an `otpauth://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpUri {
    otp_type: String,
    issuer: Option<String>,
    account: String,
    scheme: String,
    query: Vec<(String, String)>,
}

impl OtpUri {
    fn new(
        otp_type: String,
        issuer: Option<String>,
        account: String,
        query: Vec<(String, String)>,
        scheme: String,
    ) -> Self {
        let mut uri = Self {
            otp_type,
            issuer: None,
            account,
            scheme,
            query,
        };
        uri.sync_issuer(issuer);
        uri
    }

    /// Build a URI from a bare type string, e.g. `"totp"`.
    pub fn build(otp_type: &str, account: &str, issuer: Option<&str>) -> Self {
        Self::new(
            otp_type.to_ascii_lowercase(),
            issuer.map(str::to_string),
            account.to_string(),
            Vec::new(),
            DEFAULT_SCHEME.to_string(),
        )
    }

    /// Build a URI typed after an OTP generator rather than a string
    /// literal, e.g. `OtpUri::build_for::<Totp>(...)`.
    pub fn build_for<A: Authenticator>(account: &str, issuer: Option<&str>) -> Self {
        Self::build(A::OTP_TYPE, account, issuer)
    }

    /// Parse an `otpauth://` URI string.
    ///
    /// # Errors
    ///
    /// [`OtpError::InvalidFormat`] when the scheme, host, path or query
    /// component is missing, the scheme differs from `expected_scheme`
    /// (case-insensitive), the account is empty, or no `secret` query
    /// parameter is present.
    pub fn from_string(uri: &str, expected_scheme: &str) -> Result<Self> {
        let parsed = Url::parse(uri).map_err(|_| invalid_format("not a parseable URI"))?;

        let scheme = parsed.scheme();
        if !scheme.eq_ignore_ascii_case(expected_scheme) {
            debug!(scheme, expected_scheme, "rejected URI with mismatched scheme");
            return Err(invalid_format("invalid `scheme` field"));
        }

        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| invalid_format("lacks the `host` field"))?;
        let raw_query = parsed
            .query()
            .ok_or_else(|| invalid_format("lacks the `query` field"))?;
        if raw_query.is_empty() {
            return Err(invalid_format("lacks the `query` field"));
        }

        let path = percent_decode(parsed.path());
        let path = path.trim_matches('/');
        let (issuer, account) = match path.split_once(':') {
            None => (None, path.to_string()),
            Some((issuer, account)) => (Some(issuer.to_string()), account.to_string()),
        };
        if account.is_empty() {
            return Err(invalid_format("lacks the `path` field"));
        }

        // Query keys are matched case-insensitively; last value wins
        let mut query: Vec<(String, String)> = Vec::new();
        for (key, value) in parsed.query_pairs() {
            upsert(&mut query, &key.to_lowercase(), value.into_owned());
        }
        if !query.iter().any(|(key, _)| key == "secret") {
            return Err(invalid_format("invalid `secret` field"));
        }

        Ok(Self::new(
            host.to_string(),
            issuer,
            account,
            query,
            scheme.to_string(),
        ))
    }

    /// OTP type, `"hotp"` or `"totp"`.
    pub fn otp_type(&self) -> &str {
        &self.otp_type
    }

    /// Issuer, percent-decoded.
    pub fn issuer(&self) -> Option<String> {
        self.issuer.as_deref().map(percent_decode)
    }

    /// Account, percent-decoded.
    pub fn account(&self) -> String {
        percent_decode(&self.account)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The query mapping in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Label part of the URI: `issuer:account` when an issuer is set, both
    /// percent-encoded individually, otherwise just the encoded account.
    pub fn label(&self) -> String {
        let account = self.account();
        let account = urlencoding::encode(&account);
        match self.issuer() {
            Some(issuer) => format!("{}:{}", urlencoding::encode(&issuer), account),
            None => account.into_owned(),
        }
    }

    /// Look up a query parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a query parameter is present.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The `algorithm` parameter, defaulting to `SHA1`.
    pub fn algorithm(&self) -> &str {
        self.get("algorithm").unwrap_or(DEFAULT_ALGORITHM)
    }

    /// The `digits` parameter, defaulting to 6.
    pub fn digits(&self) -> u32 {
        self.get("digits")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DIGITS)
    }

    /// The `secret` parameter, when present.
    pub fn secret(&self) -> Option<&str> {
        self.get("secret")
    }

    /// Merge one entry into the query. A re-pushed key keeps its position
    /// and takes the new value; other entries are retained.
    #[must_use]
    pub fn push(mut self, key: &str, value: impl Into<String>) -> Self {
        self.push_entry(key, value.into());
        self
    }

    /// Merge several entries into the query, in order.
    #[must_use]
    pub fn push_all<'a, I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        for (key, value) in entries {
            self.push_entry(key, value);
        }
        self
    }

    #[must_use]
    pub fn with_type(mut self, otp_type: &str) -> Self {
        self.otp_type = otp_type.to_ascii_lowercase();
        self
    }

    /// Replace the issuer, keeping the `issuer` query entry in sync.
    /// Passing `None` removes both.
    #[must_use]
    pub fn with_issuer(mut self, issuer: Option<&str>) -> Self {
        self.sync_issuer(issuer.map(str::to_string));
        self
    }

    #[must_use]
    pub fn with_account(mut self, account: &str) -> Self {
        self.account = account.to_string();
        self
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Replace the whole query mapping. The issuer field follows the new
    /// mapping's `issuer` entry.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.issuer = query
            .iter()
            .find(|(k, _)| k == "issuer")
            .map(|(_, v)| v.clone());
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_secret(self, secret: &str) -> Self {
        self.push("secret", secret)
    }

    #[must_use]
    pub fn with_digits(self, digits: u32) -> Self {
        self.push("digits", digits.to_string())
    }

    #[must_use]
    pub fn with_algorithm(self, algorithm: Algorithm) -> Self {
        self.push("algorithm", algorithm.to_string())
    }

    fn push_entry(&mut self, key: &str, value: String) {
        if key == "issuer" {
            self.issuer = Some(value.clone());
        }
        upsert(&mut self.query, key, value);
    }

    fn sync_issuer(&mut self, issuer: Option<String>) {
        match issuer {
            Some(value) => {
                upsert(&mut self.query, "issuer", value.clone());
                self.issuer = Some(value);
            }
            None => {
                self.query.retain(|(key, _)| key != "issuer");
                self.issuer = None;
            }
        }
    }
}

impl fmt::Display for OtpUri {
    /// Serialize as `{scheme}://{type}/{label}?{query}` with RFC 3986
    /// percent-encoding. Entries with empty values are skipped; key order
    /// follows insertion order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query = self
            .query
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| {
                format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
            })
            .collect::<Vec<_>>()
            .join("&");
        write!(
            f,
            "{}://{}/{}?{}",
            self.scheme,
            self.otp_type,
            self.label(),
            query
        )
    }
}

impl FromStr for OtpUri {
    type Err = OtpError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s, DEFAULT_SCHEME)
    }
}

fn upsert(query: &mut Vec<(String, String)>, key: &str, value: String) {
    if let Some(entry) = query.iter_mut().find(|(k, _)| k == key) {
        entry.1 = value;
    } else {
        query.push((key.to_string(), value));
    }
}

fn percent_decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| value.to_string())
}

fn invalid_format(reason: &str) -> OtpError {
    OtpError::InvalidFormat {
        reason: reason.to_string(),
    }
}
