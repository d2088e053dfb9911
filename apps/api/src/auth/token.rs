//! HMAC-SHA256 signed access tokens.
//!
//! Token layout: `base64url(claims) "." base64url(hmac(claims_b64))` where
//! claims are `<user_id>.<issued_at>[.<expires_at>]` in unix seconds. Tokens
//! without an expiry part never expire.

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::errors::AppError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct TokenIssuer {
    secret: Arc<[u8]>,
    ttl: Option<Duration>,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_hours: Option<i64>) -> anyhow::Result<Self> {
        let ttl = ttl_hours
            .map(|hours| {
                Duration::try_hours(hours)
                    .ok_or_else(|| anyhow::anyhow!("token TTL of {hours} hours is out of range"))
            })
            .transpose()?;
        Ok(Self {
            secret: Arc::from(secret.as_bytes()),
            ttl,
        })
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let mut claims = format!("{user_id}.{}", now.timestamp());
        if let Some(ttl) = self.ttl {
            let expires = now.checked_add_signed(ttl).ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("token expiry overflows the calendar"))
            })?;
            claims.push_str(&format!(".{}", expires.timestamp()));
        }
        let claims_b64 = URL_SAFE_NO_PAD.encode(claims);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(&claims_b64)?);
        Ok(format!("{claims_b64}.{signature}"))
    }

    /// Returns the user id the token was issued for.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let invalid = || AppError::Unauthorized("Invalid token".to_string());

        let (claims_b64, signature_b64) = token.split_once('.').ok_or_else(invalid)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| invalid())?;

        let mut mac = self.mac()?;
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let claims = URL_SAFE_NO_PAD.decode(claims_b64).map_err(|_| invalid())?;
        let claims = String::from_utf8(claims).map_err(|_| invalid())?;
        let mut parts = claims.split('.');
        let (Some(user_id), Some(_issued_at), expires, None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        if let Some(expires) = expires {
            let expires: i64 = expires.parse().map_err(|_| invalid())?;
            if Utc::now().timestamp() >= expires {
                return Err(AppError::Unauthorized("Token expired".to_string()));
            }
        }

        Uuid::parse_str(user_id).map_err(|_| invalid())
    }

    fn mac(&self) -> Result<HmacSha256, AppError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC key rejected: {e}")))
    }

    fn sign(&self, data: &str) -> Result<Vec<u8>, AppError> {
        let mut mac = self.mac()?;
        mac.update(data.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
