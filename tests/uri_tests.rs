//! Parsing and serialization of `otpauth://` provisioning URIs

use otpkit::error::OtpError;
use otpkit::uri::DEFAULT_SCHEME;
use otpkit::{Hotp, OtpUri, Totp};

const EXAMPLE: &str =
    "otpauth://totp/Example:alice@host.com?secret=JBSWY3DPEHPK3PXP&issuer=Example&digits=6";

#[test]
fn test_parse_example_uri() {
    let uri: OtpUri = EXAMPLE.parse().unwrap();

    assert_eq!(uri.otp_type(), "totp");
    assert_eq!(uri.issuer(), Some("Example".to_string()));
    assert_eq!(uri.account(), "alice@host.com");
    assert_eq!(uri.scheme(), "otpauth");
    assert_eq!(uri.secret(), Some("JBSWY3DPEHPK3PXP"));
    assert_eq!(uri.digits(), 6);
    assert_eq!(uri.algorithm(), "SHA1");
}

#[test]
fn test_round_trip() {
    let uri: OtpUri = EXAMPLE.parse().unwrap();
    let reparsed: OtpUri = uri.to_string().parse().unwrap();

    assert_eq!(reparsed.otp_type(), uri.otp_type());
    assert_eq!(reparsed.issuer(), uri.issuer());
    assert_eq!(reparsed.account(), uri.account());
    assert_eq!(reparsed.secret(), uri.secret());
    assert_eq!(reparsed.digits(), uri.digits());

    // Equivalent up to query key ordering
    let mut left: Vec<_> = uri.query().to_vec();
    let mut right: Vec<_> = reparsed.query().to_vec();
    left.sort();
    right.sort();
    assert_eq!(left, right);
}

#[test]
fn test_parse_without_label_issuer() {
    let uri: OtpUri = "otpauth://totp/alice@host.com?secret=JBSWY3DPEHPK3PXP"
        .parse()
        .unwrap();
    assert_eq!(uri.issuer(), None);
    assert_eq!(uri.account(), "alice@host.com");
}

#[test]
fn test_parse_percent_encoded_label() {
    let uri: OtpUri = "otpauth://totp/Big%20Corp:alice%40host.com?secret=ABC"
        .parse()
        .unwrap();
    assert_eq!(uri.issuer(), Some("Big Corp".to_string()));
    assert_eq!(uri.account(), "alice@host.com");
    assert_eq!(uri.label(), "Big%20Corp:alice%40host.com");
}

#[test]
fn test_parse_is_case_insensitive_where_it_should_be() {
    let uri: OtpUri = "OTPAUTH://totp/alice?SECRET=JBSWY3DPEHPK3PXP&Digits=8"
        .parse()
        .unwrap();
    assert_eq!(uri.secret(), Some("JBSWY3DPEHPK3PXP"));
    assert_eq!(uri.digits(), 8);
}

#[test]
fn test_parse_missing_secret() {
    let err = "otpauth://totp/alice?digits=6"
        .parse::<OtpUri>()
        .unwrap_err();
    assert!(matches!(err, OtpError::InvalidFormat { .. }));
}

#[test]
fn test_parse_scheme_mismatch() {
    let err = "totpauth://totp/alice?secret=ABC"
        .parse::<OtpUri>()
        .unwrap_err();
    assert!(matches!(err, OtpError::InvalidFormat { .. }));

    // Explicit expected scheme
    assert!(OtpUri::from_string("otpauth://totp/alice?secret=ABC", "example").is_err());
    assert!(OtpUri::from_string("otpauth://totp/alice?secret=ABC", DEFAULT_SCHEME).is_ok());
}

#[test]
fn test_parse_structural_failures() {
    let cases = [
        "not a uri at all",
        "otpauth://totp/alice",       // no query
        "otpauth://totp?secret=ABC",  // no path
        "otpauth:///alice?secret=A",  // no host
    ];

    for uri in cases {
        assert!(
            matches!(uri.parse::<OtpUri>(), Err(OtpError::InvalidFormat { .. })),
            "expected failure for {uri}"
        );
    }
}

#[test]
fn test_parse_extra_parameters_are_retained() {
    let uri: OtpUri = "otpauth://totp/alice?secret=ABC&image=https%3A%2F%2Fhost%2Flogo.png"
        .parse()
        .unwrap();
    assert!(uri.has("image"));
    assert_eq!(uri.get("image"), Some("https://host/logo.png"));
}

#[test]
fn test_build_for_generator_type() {
    assert_eq!(OtpUri::build_for::<Totp>("alice", None).otp_type(), "totp");
    assert_eq!(OtpUri::build_for::<Hotp>("alice", None).otp_type(), "hotp");
}

#[test]
fn test_build_and_serialize() {
    let uri = OtpUri::build("totp", "alice", Some("Example"))
        .with_secret("JBSWY3DPEHPK3PXP")
        .with_digits(6);

    assert_eq!(
        uri.to_string(),
        "otpauth://totp/Example:alice?issuer=Example&secret=JBSWY3DPEHPK3PXP&digits=6"
    );
}

#[test]
fn test_setters_return_updated_instances() {
    let uri = OtpUri::build("totp", "alice", None)
        .with_secret("ABC")
        .with_account("bob")
        .with_type("hotp")
        .with_scheme("otpauth");

    assert_eq!(uri.account(), "bob");
    assert_eq!(uri.otp_type(), "hotp");
    assert_eq!(uri.secret(), Some("ABC"));
}

#[test]
fn test_serialized_uri_reparses_with_mutations() {
    let uri: OtpUri = EXAMPLE.parse().unwrap();
    let mutated = uri.with_issuer(Some("Other")).with_account("carol@host.com");

    let reparsed: OtpUri = mutated.to_string().parse().unwrap();
    assert_eq!(reparsed.issuer(), Some("Other".to_string()));
    assert_eq!(reparsed.account(), "carol@host.com");
    assert_eq!(reparsed.secret(), Some("JBSWY3DPEHPK3PXP"));
}
