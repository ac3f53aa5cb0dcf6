use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;

pub struct TestConfig {
    pub jwt_secret: String,
    pub bind_address: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            bind_address: self.bind_address.clone(),
            jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub role: String,
}

impl TestUser {
    pub fn new(id: Uuid, role: &str) -> Self {
        Self {
            id: id.to_string(),
            role: role.to_string(),
        }
    }

    pub fn patient(id: Uuid) -> Self {
        Self::new(id, "patient")
    }

    pub fn doctor(id: Uuid) -> Self {
        Self::new(id, "doctor")
    }

    pub fn admin(id: Uuid) -> Self {
        Self::new(id, "admin")
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id.clone(),
            role: Some(self.role.clone()),
            authenticated_at: Some(Utc::now()),
        }
    }

    /// Mint a signed bearer token for this user, valid for one hour.
    pub fn mint_token(&self, jwt_secret: &str) -> String {
        let header = json!({ "alg": "HS256", "typ": "JWT" });
        let claims = json!({
            "sub": self.id,
            "role": self.role,
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });

        let header_b64 = URL_SAFE_NO_PAD.encode(header.to_string());
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims.to_string());
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let mut mac = Hmac::<Sha256>::new_from_slice(jwt_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", signing_input, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::validate_token;

    #[test]
    fn minted_token_round_trips_through_validation() {
        let config = TestConfig::default();
        let user = TestUser::patient(Uuid::new_v4());

        let token = user.mint_token(&config.jwt_secret);
        let principal = validate_token(&token, &config.jwt_secret).unwrap();

        assert_eq!(principal.id, user.id);
        assert_eq!(principal.role.as_deref(), Some("patient"));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let config = TestConfig::default();
        let token = TestUser::admin(Uuid::new_v4()).mint_token(&config.jwt_secret);

        let mut tampered = token.clone();
        tampered.push('x');
        assert!(validate_token(&tampered, &config.jwt_secret).is_err());
        assert!(validate_token(&token, "some-other-secret").is_err());
    }
}
