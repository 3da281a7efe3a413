use std::time::Duration;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{
    decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Older clients put the caller id here instead of `sub`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<serde_json::Value>,
    pub exp: u64,
}

/// The authenticated caller, handed to handlers as an explicit argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

/// Signs and verifies HMAC JWTs against the shared secret.
#[derive(Clone)]
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenAuthority {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, AppError> {
        let claims = Claims {
            sub: Some(subject.to_string()),
            user_id: None,
            exp: get_current_timestamp() + ttl.as_secs(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            AppError::Unauthorized("Failed to issue token")
        })
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::Unauthorized("Invalid or expired token")
        })?;

        let subject = match (data.claims.sub, data.claims.user_id) {
            (Some(sub), _) if !sub.is_empty() => sub,
            (_, Some(serde_json::Value::String(id))) if !id.is_empty() => id,
            (_, Some(serde_json::Value::Number(id))) => id.to_string(),
            _ => return Err(AppError::Unauthorized("User ID not found in token")),
        };

        Ok(Identity { subject })
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized("Authorization header required"))?;

    match value.to_str().ok().and_then(|v| v.split_once(' ')) {
        Some(("Bearer", token)) if !token.is_empty() && !token.contains(' ') => Ok(token),
        _ => Err(AppError::Unauthorized(
            "Invalid authorization format. Use: Bearer <token>",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn issued_tokens_verify() {
        let authority = TokenAuthority::new("flood-secret");
        let token = authority
            .issue("coordinator-7", Duration::from_secs(600))
            .unwrap();

        let identity = authority.verify(&token).unwrap();
        assert_eq!(identity.subject, "coordinator-7");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = TokenAuthority::new("one")
            .issue("someone", Duration::from_secs(600))
            .unwrap();

        let err = TokenAuthority::new("two").verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized("Invalid or expired token")));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let authority = TokenAuthority::new("flood-secret");
        let claims = Claims {
            sub: Some("late".into()),
            user_id: None,
            exp: get_current_timestamp() - 3_600,
        };
        let token = encode(&Header::default(), &claims, &authority.encoding).unwrap();

        assert!(authority.verify(&token).is_err());
    }

    #[test]
    fn legacy_user_id_claim_is_accepted() {
        let authority = TokenAuthority::new("flood-secret");
        let claims = Claims {
            sub: None,
            user_id: Some(serde_json::json!(42)),
            exp: get_current_timestamp() + 600,
        };
        let token = encode(&Header::new(Algorithm::HS512), &claims, &authority.encoding).unwrap();

        assert_eq!(authority.verify(&token).unwrap().subject, "42");
    }

    #[test]
    fn tokens_without_subject_are_rejected() {
        let authority = TokenAuthority::new("flood-secret");
        let claims = Claims {
            sub: None,
            user_id: None,
            exp: get_current_timestamp() + 600,
        };
        let token = encode(&Header::default(), &claims, &authority.encoding).unwrap();

        let err = authority.verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized("User ID not found in token")));
    }

    #[test]
    fn bearer_header_shapes() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert!(bearer_token(&HeaderMap::new()).is_err());
        assert!(bearer_token(&headers("Basic abc")).is_err());
        assert!(bearer_token(&headers("Bearer")).is_err());
        assert!(bearer_token(&headers("Bearer a b")).is_err());
    }
}
