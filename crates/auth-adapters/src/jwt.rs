//! HS256 session tokens via `jsonwebtoken`.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use domains::error::{DomainError, DomainResult};
use domains::models::SessionClaims;
use domains::ports::TokenService;

/// Issues and verifies the self-contained session tokens. The expiry claim
/// is stamped by the identity merger; this adapter only signs and checks.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::default(),
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, claims: &SessionClaims) -> DomainResult<String> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|err| DomainError::Internal(format!("token signing failed: {err}")))
    }

    fn verify(&self, token: &str) -> DomainResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "token verification failed");
                DomainError::Unauthorized("invalid token".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(exp_offset: Duration) -> SessionClaims {
        let now = Utc::now();
        SessionClaims {
            sub: "u1".into(),
            name: "Jaina".into(),
            nickname: Some("proudmoore".into()),
            email: Some("jaina@example.com".into()),
            admin: false,
            iat: now.timestamp(),
            exp: (now + exp_offset).timestamp(),
        }
    }

    #[test]
    fn issue_then_verify_round_trip() {
        let svc = JwtTokenService::new(b"test-secret");
        let claims = claims(Duration::days(7));
        let token = svc.issue(&claims).unwrap();
        assert_eq!(svc.verify(&token).unwrap(), claims);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let svc = JwtTokenService::new(b"test-secret");
        let token = svc.issue(&claims(Duration::hours(-2))).unwrap();
        assert!(matches!(svc.verify(&token), Err(DomainError::Unauthorized(_))));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let svc = JwtTokenService::new(b"test-secret");
        let other = JwtTokenService::new(b"other-secret");
        let token = other.issue(&claims(Duration::days(7))).unwrap();
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = JwtTokenService::new(b"test-secret");
        let mut token = svc.issue(&claims(Duration::days(7))).unwrap();
        token.push('x');
        assert!(svc.verify(&token).is_err());
    }
}
