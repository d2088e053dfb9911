//! Salted PBKDF2-HMAC-SHA256 password hashes, stored as PHC strings
//! (`$pbkdf2-sha256$i=<rounds>,l=32$<salt>$<hash>`).
//!
//! Hashing is CPU-bound; handlers go through the `*_off_executor` helpers.

use pbkdf2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Params, Pbkdf2,
};

use crate::errors::AppError;

const DEFAULT_ROUNDS: u32 = 100_000;
const HASH_LEN: usize = 32;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_with_rounds(password, DEFAULT_ROUNDS)
}

pub fn hash_with_rounds(password: &str, rounds: u32) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let params = Params {
        rounds,
        output_length: HASH_LEN,
    };
    let hash = Pbkdf2
        .hash_password_customized(
            password.as_bytes(),
            Some(Algorithm::Pbkdf2Sha256.ident()),
            None,
            params,
            &salt,
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC hash in constant time.
/// Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// Runs `task` on the blocking pool so key derivation never stalls the executor.
async fn off_executor<T, F>(task: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in password hashing: {e}"))
    })
}

pub async fn hash_password_off_executor(password: String) -> Result<String, AppError> {
    off_executor(move || hash_password(&password)).await?
}

pub async fn verify_password_off_executor(password: String, stored: String) -> Result<bool, AppError> {
    off_executor(move || verify_password(&password, &stored)).await
}
