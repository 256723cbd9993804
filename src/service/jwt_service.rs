use crate::config::app_config::AppConfig;
use crate::error::error_model::{AppError, ErrorType};
use chrono::{DateTime, Utc};
use derive_more::Display;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use nanoid::nanoid;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    #[display("access")]
    Access,
    #[display("refresh")]
    Refresh,
    #[display("password_reset")]
    PasswordReset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub email: String,
    #[serde(default)]
    pub role: String,
    pub token_type: TokenType,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Display, derive_more::Error, PartialEq, Eq)]
pub enum TokenError {
    #[display("token has expired")]
    Expired,
    #[display("token is invalid")]
    Invalid,
    #[display("token could not be signed: {message}")]
    Signing { message: String },
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => {
                AppError::new(ErrorType::Authentication, "Token has expired").with_code("TOKEN_EXPIRED")
            }
            TokenError::Invalid => {
                AppError::new(ErrorType::Authentication, "Invalid token").with_code("TOKEN_INVALID")
            }
            TokenError::Signing { message } => {
                AppError::new(ErrorType::Internal, "Error generating token").with_details(message)
            }
        }
    }
}

/// Identity embedded into issued tokens.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    reset_ttl_secs: i64,
}

impl JwtService {
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
        reset_ttl_secs: i64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            access_ttl_secs,
            refresh_ttl_secs,
            reset_ttl_secs,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.jwt_secret.expose_secret().as_bytes(),
            config.jwt_issuer.clone(),
            config.access_token_ttl_secs,
            config.refresh_token_ttl_secs,
            config.reset_token_ttl_secs,
        )
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    pub fn generate_access_token(&self, subject: &TokenSubject) -> Result<IssuedToken, TokenError> {
        self.issue(subject, TokenType::Access, self.access_ttl_secs)
    }

    pub fn generate_refresh_token(&self, subject: &TokenSubject) -> Result<IssuedToken, TokenError> {
        self.issue(subject, TokenType::Refresh, self.refresh_ttl_secs)
    }

    /// Single purpose token for the reset-password flow. It carries no role.
    pub fn generate_password_reset_token(
        &self,
        user_id: i64,
        email: &str,
    ) -> Result<IssuedToken, TokenError> {
        let subject = TokenSubject {
            user_id,
            email: email.to_string(),
            role: String::new(),
        };
        self.issue(&subject, TokenType::PasswordReset, self.reset_ttl_secs)
    }

    fn issue(
        &self,
        subject: &TokenSubject,
        token_type: TokenType,
        ttl_secs: i64,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.user_id.to_string(),
            user_id: subject.user_id,
            email: subject.email.clone(),
            role: subject.role.clone(),
            token_type,
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now + ttl_secs,
            jti: nanoid!(),
        };
        let token = self.sign(&claims)?;
        Ok(IssuedToken {
            token,
            jti: claims.jti.clone(),
            expires_in: ttl_secs,
            expires_at: claims.expires_at(),
        })
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            TokenError::Signing {
                message: e.to_string(),
            }
        })
    }

    /// Verifies signature, issuer, expiry and the expected token type.
    pub fn validate_token(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("JWT validation failed: {:?}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if token_data.claims.token_type != expected {
            debug!(
                "Token type mismatch. expected {}, got {}",
                expected, token_data.claims.token_type
            );
            return Err(TokenError::Invalid);
        }
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(b"unit-test-secret", "internship-api", 900, 3600, 600)
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            user_id: 42,
            email: "somchai@example.com".to_string(),
            role: "student".to_string(),
        }
    }

    #[test]
    fn access_token_round_trip_carries_identity() {
        let jwt = service();
        let issued = jwt.generate_access_token(&subject()).unwrap();
        let claims = jwt.validate_token(&issued.token, TokenType::Access).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "student");
        assert_eq!(claims.email, "somchai@example.com");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn each_token_gets_a_fresh_id() {
        let jwt = service();
        let a = jwt.generate_access_token(&subject()).unwrap();
        let b = jwt.generate_access_token(&subject()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn token_type_is_enforced() {
        let jwt = service();
        let refresh = jwt.generate_refresh_token(&subject()).unwrap();
        assert_eq!(
            jwt.validate_token(&refresh.token, TokenType::Access).unwrap_err(),
            TokenError::Invalid
        );
        let reset = jwt
            .generate_password_reset_token(42, "somchai@example.com")
            .unwrap();
        let claims = jwt
            .validate_token(&reset.token, TokenType::PasswordReset)
            .unwrap();
        assert_eq!(claims.role, "");
        assert!(jwt.validate_token(&reset.token, TokenType::Refresh).is_err());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let jwt = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "42".to_string(),
            user_id: 42,
            email: "somchai@example.com".to_string(),
            role: "student".to_string(),
            token_type: TokenType::Access,
            iss: "internship-api".to_string(),
            iat: now - 7200,
            nbf: now - 7200,
            exp: now - 3600,
            jti: "expired".to_string(),
        };
        let token = jwt.sign(&claims).unwrap();
        assert_eq!(
            jwt.validate_token(&token, TokenType::Access).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn foreign_signature_or_issuer_is_invalid() {
        let other = JwtService::new(b"another-secret", "internship-api", 900, 3600, 600);
        let token = other.generate_access_token(&subject()).unwrap().token;
        assert_eq!(
            service().validate_token(&token, TokenType::Access).unwrap_err(),
            TokenError::Invalid
        );

        let other_issuer = JwtService::new(b"unit-test-secret", "someone-else", 900, 3600, 600);
        let token = other_issuer.generate_access_token(&subject()).unwrap().token;
        assert_eq!(
            service().validate_token(&token, TokenType::Access).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(
            service()
                .validate_token("not.a.jwt", TokenType::Access)
                .unwrap_err(),
            TokenError::Invalid
        );
    }
}
