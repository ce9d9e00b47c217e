use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::Result, DecodingKey, EncodingKey, Header, Validation};

use crate::models::TokenClaim;

/// Issues and checks HS256 tokens carrying a subject, issue time and expiry
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn generate_token(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let claims = TokenClaim {
            sub: subject.to_owned(),
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp().max(0) as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Subject of a token whose signature and expiry check out
    pub fn extract_subject(&self, token: &str) -> Result<String> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<TokenClaim>(token, &self.decoding_key, &validation)?;
        Ok(data.claims.sub)
    }

    pub fn validate_token(&self, token: &str, subject: &str) -> bool {
        matches!(self.extract_subject(token), Ok(sub) if sub == subject)
    }
}
