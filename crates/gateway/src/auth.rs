//! Bearer token issuing and validation.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rally_config::AuthConfig;
use rally_engagement::Actor;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{GatewayError, GatewayResult};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub name: String, // Display name
    pub exp: usize,
    pub iat: usize,
    pub nbf: usize,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor::new(self.sub.clone(), self.name.clone())
    }
}

/// JWT token manager
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    token_duration: Duration,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, issuer: String, audience: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            token_duration: Duration::from_secs(24 * 60 * 60),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.issuer.clone(), config.audience.clone())
            .with_duration(Duration::from_secs(config.token_ttl_seconds))
    }

    /// Set custom token duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.token_duration = duration;
        self
    }

    /// Generate a new JWT token for `user_id`
    pub fn generate_token(&self, user_id: &str, display_name: &str) -> GatewayResult<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| GatewayError::InternalError("System time error".to_string()))?;
        let exp = now + self.token_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            name: display_name.to_string(),
            exp: exp.as_secs() as usize,
            iat: now.as_secs() as usize,
            nbf: now.as_secs() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| GatewayError::InternalError(format!("Failed to encode token: {err}")))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> GatewayResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|err| GatewayError::AuthenticationFailed(format!("Invalid token: {err}")))?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(GatewayError::AuthenticationFailed(
                "Token has no subject".to_string(),
            ));
        }

        Ok(token_data.claims)
    }
}
