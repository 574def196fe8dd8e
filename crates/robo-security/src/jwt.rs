//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use robo_core::{ActingUser, MemberRole};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid claims: {0}")]
    InvalidClaims(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Member id of the caller
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn acting_user(&self) -> Result<ActingUser, JwtError> {
        let user_id = Uuid::parse_str(&self.sub)
            .map_err(|_| JwtError::InvalidClaims(format!("sub is not a UUID: {}", self.sub)))?;
        let role = MemberRole::from_str(&self.role)
            .ok_or_else(|| JwtError::InvalidClaims(format!("unknown role: {}", self.role)))?;

        Ok(ActingUser::new(user_id, role))
    }
}

pub struct JwtService {
    secret: String,
    access_token_expiry: i64,
}

impl JwtService {
    pub fn new(secret: String, access_expiry: i64) -> Self {
        Self {
            secret,
            access_token_expiry: access_expiry,
        }
    }

    /// Issue an HS256 access token. Production tokens come from the identity
    /// provider; this is used by tooling and tests sharing the same secret.
    pub fn generate_access_token(&self, user_id: &Uuid, role: MemberRole) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };
        self.encode_claims(&claims)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => {
                debug!("Rejected token: {}", e);
                JwtError::ValidationError(e.to_string())
            }
        })
    }

    /// Validate a token and resolve the caller it names.
    pub fn authenticate(&self, token: &str) -> Result<ActingUser, JwtError> {
        self.validate_token(token)?.acting_user()
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::CreationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret-with-enough-length".to_string(), 900)
    }

    #[test]
    fn test_issue_and_authenticate() {
        let jwt = service();
        let user_id = Uuid::new_v4();
        let token = jwt.generate_access_token(&user_id, MemberRole::Mentor).unwrap();

        let actor = jwt.authenticate(&token).unwrap();
        assert_eq!(actor.user_id, user_id);
        assert_eq!(actor.role, MemberRole::Mentor);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().generate_access_token(&Uuid::new_v4(), MemberRole::Admin).unwrap();
        let other = JwtService::new("another-secret-entirely".to_string(), 900);
        assert!(matches!(other.validate_token(&token), Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token() {
        let jwt = service();
        let now = Utc::now();
        let token = jwt
            .encode_claims(&Claims {
                sub: Uuid::new_v4().to_string(),
                role: "caang".to_string(),
                iat: (now - Duration::hours(3)).timestamp(),
                exp: (now - Duration::hours(2)).timestamp(),
            })
            .unwrap();
        assert_eq!(jwt.validate_token(&token).unwrap_err(), JwtError::TokenExpired);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let jwt = service();
        let now = Utc::now();
        let token = jwt
            .encode_claims(&Claims {
                sub: Uuid::new_v4().to_string(),
                role: "treasurer".to_string(),
                iat: now.timestamp(),
                exp: (now + Duration::minutes(5)).timestamp(),
            })
            .unwrap();
        assert!(matches!(jwt.authenticate(&token), Err(JwtError::InvalidClaims(_))));
    }
}
