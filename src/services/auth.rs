use crate::models::SessionContext;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while authenticating a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token carries no user identity")]
    MissingIdentity,
}

/// Claims read from identity-provider tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iss: Option<String>,
}

/// Verifies HS256 bearer tokens and turns them into a [`SessionContext`]
pub struct Authenticator {
    key: DecodingKey,
    validation: Validation,
}

impl Authenticator {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a raw token. The email claim is the user identity, falling
    /// back to the subject.
    pub fn verify(&self, token: &str) -> Result<SessionContext, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        let claims = data.claims;

        let user_id = claims
            .email
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(claims.sub);

        if user_id.trim().is_empty() {
            return Err(AuthError::MissingIdentity);
        }

        Ok(SessionContext::new(user_id.trim().to_lowercase()))
    }

    /// Verify the value of an `Authorization` header
    pub fn verify_header(&self, header: Option<&str>) -> Result<SessionContext, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(sub: &str, email: Option<&str>, iss: Option<&str>, exp_offset: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            email: email.map(str::to_string),
            exp: (chrono::Utc::now().timestamp() + exp_offset) as usize,
            iss: iss.map(str::to_string),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    #[test]
    fn test_verify_prefers_email_claim() {
        let auth = Authenticator::new(SECRET, None);
        let session = auth.verify(&token("uid-1", Some("Cook@Example.com"), None, 3600)).unwrap();
        assert_eq!(session.user_id, "cook@example.com");
    }

    #[test]
    fn test_verify_falls_back_to_subject() {
        let auth = Authenticator::new(SECRET, None);
        let session = auth.verify(&token("cook@example.com", None, None, 3600)).unwrap();
        assert_eq!(session.user_id, "cook@example.com");
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = Authenticator::new(SECRET, None);
        let result = auth.verify(&token("cook@example.com", None, None, -3600));
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let auth = Authenticator::new("other-secret", None);
        assert!(auth.verify(&token("cook@example.com", None, None, 3600)).is_err());
    }

    #[test]
    fn test_issuer_enforced() {
        let auth = Authenticator::new(SECRET, Some("tangerines-auth"));
        assert!(auth.verify(&token("a@example.com", None, Some("someone-else"), 3600)).is_err());
        assert!(auth.verify(&token("a@example.com", None, Some("tangerines-auth"), 3600)).is_ok());
    }

    #[test]
    fn test_header_parsing() {
        let auth = Authenticator::new(SECRET, None);
        assert!(matches!(auth.verify_header(None), Err(AuthError::MissingToken)));
        assert!(matches!(auth.verify_header(Some("Basic abc")), Err(AuthError::MissingToken)));

        let header = format!("Bearer {}", token("a@example.com", None, None, 3600));
        assert!(auth.verify_header(Some(&header)).is_ok());
    }
}
