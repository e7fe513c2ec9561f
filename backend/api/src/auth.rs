/// Bearer-token validation and real-time custom-token minting
///
/// The API does not issue its own session tokens: the identity provider
/// signs them with RS256 and we validate against its public key. RS256
/// only — symmetric algorithms are rejected to rule out algorithm
/// confusion. The validation key is loaded once at startup and immutable
/// thereafter.
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Audience required by the hosted real-time provider for custom tokens
const REALTIME_TOKEN_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

/// Custom-token lifetime; the provider caps this at one hour
const REALTIME_TOKEN_EXPIRY_MINUTES: i64 = 60;

/// Claims of an identity-provider session token. Only `sub` is trusted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (external user identity)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

static VALIDATION_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Install the identity provider's RS256 public key.
///
/// Must be called during startup before any token validation. Can only
/// be called once.
pub fn initialize_validation_key(public_key_pem: &str) -> Result<()> {
    let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Invalid RSA public key: {}", e))?;

    VALIDATION_KEY
        .set(key)
        .map_err(|_| anyhow!("JWT validation key already initialized"))
}

/// Validate a bearer token and return its claims.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let key = VALIDATION_KEY
        .get()
        .ok_or_else(|| anyhow!("JWT validation key not initialized"))?;

    let validation = Validation::new(Algorithm::RS256);

    decode::<Claims>(token, key, &validation).map_err(|e| anyhow!("Token validation failed: {}", e))
}

/// Claims of a real-time provider custom token
#[derive(Debug, Serialize, Deserialize)]
struct RealtimeClaims {
    iss: String,
    sub: String,
    aud: String,
    iat: i64,
    exp: i64,
    /// End-user identity carried into the real-time session
    uid: String,
}

/// Mints custom tokens that bridge the primary identity to the hosted
/// real-time service. Built at startup from service-account credentials;
/// absent credentials leave direct messaging without real-time delivery.
pub struct RealtimeTokenMinter {
    service_account_email: String,
    encoding_key: EncodingKey,
}

impl RealtimeTokenMinter {
    pub fn new(service_account_email: String, private_key_pem: &str) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| anyhow!("Invalid RSA private key: {}", e))?;

        Ok(Self {
            service_account_email,
            encoding_key,
        })
    }

    /// Mint a custom token asserting `subject` as the real-time identity.
    pub fn mint(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let claims = RealtimeClaims {
            iss: self.service_account_email.clone(),
            sub: self.service_account_email.clone(),
            aud: REALTIME_TOKEN_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(REALTIME_TOKEN_EXPIRY_MINUTES)).timestamp(),
            uid: subject.to_string(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow!("Failed to sign custom token: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_fails_without_key() {
        // The key cell is process-global; this only holds as long as no
        // other test initializes it, so keep initialization out of tests.
        let result = validate_token("not-a-token");
        assert!(result.is_err());
    }

    #[test]
    fn minter_rejects_garbage_key() {
        let result = RealtimeTokenMinter::new("svc@example.com".to_string(), "not a pem");
        assert!(result.is_err());
    }
}
