use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{config::JwtConfig, state::AppState};

/// Claims carried by an access token. The subject is the username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig { secret, ttl_seconds } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_seconds),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, username: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: username.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(subject = %username, "jwt signed");
        Ok(token)
    }

    /// Checks signature and expiry. Expiry is exact: no leeway. The error
    /// does not distinguish malformed, tampered and expired tokens.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{test_config, JwtConfig};
    use crate::state::AppState;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::for_tests(test_config()))
    }

    fn make_keys_with_secret(secret: &str) -> JwtKeys {
        let mut config = test_config();
        config.jwt = JwtConfig {
            secret: secret.into(),
            ttl_seconds: 300,
        };
        JwtKeys::from_ref(&AppState::for_tests(config))
    }

    #[tokio::test]
    async fn sign_and_verify_returns_subject() {
        let keys = make_keys();
        let token = keys.sign("alice").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn token_has_three_segments() {
        let keys = make_keys();
        let token = keys.sign("alice").expect("sign");
        assert_eq!(token.split('.').count(), 3);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: "alice".into(),
            iat: (now - 600) as usize,
            exp: (now - 10) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn tampered_signature_is_rejected() {
        let keys = make_keys();
        let mut token = keys.sign("alice").expect("sign");
        let last = token.pop().expect("token is non-empty");
        token.push(if last == 'A' { 'B' } else { 'A' });
        assert!(keys.verify(&token).is_err());
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let keys = make_keys();
        assert!(keys.verify("not-a-token").is_err());
        assert!(keys.verify("").is_err());
        assert!(keys.verify("a.b.c").is_err());
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let signer = make_keys_with_secret("secret-one");
        let verifier = make_keys_with_secret("secret-two");
        let token = signer.sign("alice").expect("sign");
        assert!(verifier.verify(&token).is_err());
        assert!(signer.verify(&token).is_ok());
    }
}
