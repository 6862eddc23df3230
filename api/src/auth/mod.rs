pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};
pub use extractors::ClientIp;

use chrono::{DateTime, Duration, Utc};
use db::models::auth_token::generate_token_id;
use db::models::user::Role;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use util::config;

/// Generates an HS256 JWT for the given user and returns it with its expiry.
pub fn generate_jwt(
    user_id: i64,
    role: Role,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let expiry = Utc::now() + Duration::minutes(config::jwt_duration_minutes() as i64);

    let claims = Claims {
        sub: user_id,
        exp: expiry.timestamp() as usize,
        role,
        jti: generate_token_id(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry))
}

/// Verifies signature and expiry of a bearer token.
pub fn decode_jwt(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn issued_tokens_decode_and_differ() {
        let (a, expiry) = generate_jwt(7, Role::Teacher).unwrap();
        let (b, _) = generate_jwt(7, Role::Teacher).unwrap();
        assert_ne!(a, b);
        assert!(expiry > Utc::now());

        let claims = decode_jwt(&a).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Teacher);
    }

    #[test]
    #[serial]
    fn tampered_tokens_are_rejected() {
        let (token, _) = generate_jwt(1, Role::Admin).unwrap();
        let tampered = format!("{token}x");
        assert!(decode_jwt(&tampered).is_err());
        assert!(decode_jwt("not-a-jwt").is_err());
    }
}
