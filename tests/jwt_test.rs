// Token codec properties: tampering, forgery and expiry

use marketplace_backend::{JwtConfig, JwtError, JwtService, TokenSubject};
use uuid::Uuid;

const SECRET: &[u8] = b"integration-test-secret-with-32-plus-chars";

fn service() -> JwtService {
    JwtService::new(JwtConfig::from_secret(SECRET, 3600, 1))
}

fn subject(is_admin: bool) -> TokenSubject {
    TokenSubject {
        id: Uuid::new_v4(),
        email: "a@b.com".to_string(),
        last_name: "X".to_string(),
        first_name: "Y".to_string(),
        is_admin,
        is_employee: false,
    }
}

fn parts(token: &str) -> Vec<&str> {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3);
    parts
}

#[test]
fn test_swapped_payload_fails_signature_check() {
    let jwt = service();
    let user_token = jwt.issue_at(subject(false), 1_000).unwrap();
    let admin_token = jwt.issue_at(subject(true), 1_000).unwrap();

    // Admin claims under the plain user's signature
    let user = parts(&user_token);
    let admin = parts(&admin_token);
    let forged = format!("{}.{}.{}", admin[0], admin[1], user[2]);

    assert!(matches!(
        jwt.verify_at(&forged, 1_001),
        Err(JwtError::BadSignature)
    ));
}

#[test]
fn test_signature_from_other_key_fails() {
    let jwt = service();
    let other = JwtService::new(JwtConfig::from_secret(
        b"a-completely-different-secret-of-32-chars",
        3600,
        1,
    ));

    let token = other.issue_at(subject(true), 1_000).unwrap();
    assert!(matches!(
        jwt.verify_at(&token, 1_001),
        Err(JwtError::BadSignature)
    ));
}

#[test]
fn test_extending_expiry_requires_resigning() {
    let jwt = service();
    let short = JwtService::new(JwtConfig::from_secret(SECRET, 10, 1));

    // Same key, same subject, later expiry: the payload of one cannot ride
    // on the signature of the other
    let who = subject(false);
    let short_token = short.issue_at(who.clone(), 1_000).unwrap();
    let long_token = jwt.issue_at(who, 1_000).unwrap();

    let s = parts(&short_token);
    let l = parts(&long_token);
    let forged = format!("{}.{}.{}", l[0], l[1], s[2]);

    assert!(matches!(
        jwt.verify_at(&forged, 1_020),
        Err(JwtError::BadSignature)
    ));
}

#[test]
fn test_expiry_is_exclusive() {
    let jwt = service();
    let token = jwt.issue_at(subject(false), 1_000).unwrap();

    assert!(jwt.verify_at(&token, 4_599).is_ok());
    assert!(matches!(jwt.verify_at(&token, 4_600), Err(JwtError::Expired)));
    assert!(matches!(jwt.verify_at(&token, 9_999), Err(JwtError::Expired)));
}

#[test]
fn test_structurally_broken_tokens_are_malformed() {
    let jwt = service();

    for token in ["", "abc", "a.b", "a.b.c", "....."] {
        let err = jwt.verify_at(token, 1_000).unwrap_err();
        assert!(err.is_verification_failure(), "{:?}", token);
        assert!(
            matches!(err, JwtError::Malformed),
            "{:?} gave {:?}",
            token,
            err
        );
    }
}

#[test]
fn test_verify_with_wall_clock() {
    let jwt = service();
    let who = subject(true);

    let token = jwt.issue(who.clone()).unwrap();
    let claims = jwt.verify(&token).unwrap();

    assert_eq!(claims.id, who.id);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_no_single_bit_flip_verifies() {
    let jwt = service();
    let token = jwt.issue_at(subject(false), 1_000).unwrap();
    let payload_start = token.find('.').unwrap() + 1;

    let mut tried = 0;
    for index in payload_start..token.len() {
        for bit in 0..8 {
            let mut bytes = token.clone().into_bytes();
            bytes[index] ^= 1 << bit;

            // Only text can travel in a header
            let Ok(tampered) = String::from_utf8(bytes) else { continue };
            tried += 1;

            match jwt.verify_at(&tampered, 1_001) {
                Ok(_) => panic!("flip of bit {} at byte {} verified", bit, index),
                Err(err) => assert!(
                    matches!(err, JwtError::BadSignature | JwtError::Malformed),
                    "byte {} bit {} gave {:?}",
                    index,
                    bit,
                    err
                ),
            }
        }
    }

    assert!(tried > 0);
}
