use chrono::Duration;
use common::error::Error;
use token_service::{TokenConfig, TokenService};

fn service_with_secret(secret: &str) -> TokenService {
    TokenService::new(&TokenConfig::new(secret.to_string(), Duration::days(14)))
}

#[test]
fn test_issue_and_validate_round_trip() {
    let service = service_with_secret("test-secret");

    let token = service.issue(7).unwrap();
    let account_id = service.validate(&token).unwrap();

    assert_eq!(account_id, 7);
}

#[test]
fn test_expired_token_is_rejected_as_expired() {
    let service = service_with_secret("test-secret");

    // Already past its expiration instant when validated
    let token = service.issue_with_lifetime(7, Duration::seconds(-60)).unwrap();

    match service.validate(&token) {
        Err(Error::TokenExpired(_)) => (),
        other => panic!("Expected TokenExpired, got {:?}", other),
    }
}

#[test]
fn test_token_signed_with_different_secret_is_invalid() {
    let issuer = service_with_secret("secret-a");
    let verifier = service_with_secret("secret-b");

    let token = issuer.issue(7).unwrap();

    match verifier.validate(&token) {
        Err(Error::InvalidToken(_)) => (),
        other => panic!("Expected InvalidToken, got {:?}", other),
    }
}

#[test]
fn test_malformed_token_is_invalid() {
    let service = service_with_secret("test-secret");

    for garbage in ["", "not-a-jwt", "aaaa.bbbb.cccc"] {
        match service.validate(garbage) {
            Err(Error::InvalidToken(_)) => (),
            other => panic!("Expected InvalidToken for {:?}, got {:?}", garbage, other),
        }
    }
}

#[test]
fn test_unexpected_algorithm_is_rejected() {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: i64,
        iat: i64,
        exp: i64,
    }

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: 7,
        iat: now,
        exp: now + 3600,
    };

    // Same secret, different HMAC variant; validation pins HS256
    let token = encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();

    let service = service_with_secret("test-secret");
    match service.validate(&token) {
        Err(Error::InvalidToken(_)) => (),
        other => panic!("Expected InvalidToken, got {:?}", other),
    }
}

#[test]
fn test_tokens_are_reusable_across_requests() {
    let service = service_with_secret("test-secret");
    let token = service.issue(42).unwrap();

    // Tokens are not single-use; each request is judged independently
    for _ in 0..3 {
        assert_eq!(service.validate(&token).unwrap(), 42);
    }
}
