//! bcrypt password hashing and verification.

use std::sync::Arc;

use pos_core::error::{AppError, ErrorKind};
use pos_core::result::AppResult;

/// Plaintext hashed once at construction and verified against when a
/// login names an unknown identity, so that path costs one bcrypt round
/// like a real mismatch.
const DUMMY_PASSWORD: &str = "pos-timing-equalisation";

/// Handles password hashing and verification using bcrypt.
///
/// The async methods move the work onto the blocking pool.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// bcrypt work factor.
    cost: u32,
    /// Hash of [`DUMMY_PASSWORD`] at `cost`.
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Creates a hasher with the given bcrypt cost.
    pub fn new(cost: u32) -> AppResult<Self> {
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid bcrypt cost {cost}"),
                e,
            )
        })?;

        Ok(Self {
            cost,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// Hashes a plaintext password with a random salt.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Password hashing failed", e))
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// A mismatch is `InvalidCredentials`; an unparseable hash is an
    /// internal error.
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<()> {
        match bcrypt::verify(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::invalid_credentials()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Internal,
                "Stored password hash is unreadable",
                e,
            )),
        }
    }

    /// Spend one verification worth of work and discard the result.
    pub fn verify_dummy(&self, password: &str) {
        let _ = bcrypt::verify(password, &self.dummy_hash);
    }

    /// [`hash_password`](Self::hash_password) on the blocking pool.
    pub async fn hash(&self, password: String) -> AppResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password)).await?
    }

    /// [`verify_password`](Self::verify_password) on the blocking pool.
    pub async fn verify(&self, password: String, hash: String) -> AppResult<()> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash)).await?
    }

    /// [`verify_dummy`](Self::verify_dummy) on the blocking pool.
    pub async fn burn(&self, password: String) {
        let hasher = self.clone();
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
    }
}
