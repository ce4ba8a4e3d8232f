#![allow(dead_code)]

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tubely_api::auth::JwtClaims;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-chars";
pub const TEST_JWT_ISSUER: &str = "tubely-access";

pub fn issue_token(user_id: Uuid) -> String {
    issue_token_with(user_id, TEST_JWT_ISSUER, 3600)
}

pub fn issue_token_with(user_id: Uuid, issuer: &str, expires_in_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id,
        iss: issuer.to_string(),
        exp: now + expires_in_secs,
        iat: now,
        nbf: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}
