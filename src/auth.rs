//! Identity service: registration, login, and the single active session.
//!
//! The user table is global (not scoped); the session is a single record
//! holding the sanitized active user. Passwords are stored only as salted
//! Argon2 hashes and are never placed in the session. Login failures are
//! reported with one generic error, regardless of which part of the
//! credentials mismatched.

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::backend::StorageBackend;
use crate::error::{Error, Result};
use crate::model::{new_record_id, User};
use crate::store::{compose_key, KEY_NAMESPACE};

fn users_key() -> String {
    compose_key(&[KEY_NAMESPACE, "users"])
}

fn session_key() -> String {
    compose_key(&[KEY_NAMESPACE, "session"])
}

/// Hash a password with a freshly generated salt.
///
/// # Errors
/// Returns `Error::CryptoError` if the hashing machinery fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::CryptoError(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// # Errors
/// Returns `Error::CryptoError` if the stored hash does not parse.
pub fn verify_password(hash: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| Error::CryptoError(format!("Failed to parse password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Registration, login and session management over a storage backend.
///
/// Exactly one session exists per storage scope at a time; establishing a
/// new one replaces the old.
#[derive(Clone)]
pub struct AuthService<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> AuthService<B> {
    /// Create an auth service over the given backend.
    pub fn new(backend: B) -> Self {
        AuthService { backend }
    }

    /// The full registered-user table.
    pub async fn users(&self) -> Result<Vec<User>> {
        match self.backend.get(&users_key()).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| Error::DeserializationError(format!("users: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    async fn save_users(&self, users: &[User]) -> Result<()> {
        let bytes = serde_json::to_vec(users)
            .map_err(|e| Error::SerializationError(format!("users: {}", e)))?;
        self.backend.set(&users_key(), bytes).await
    }

    /// Register a new account and establish it as the active session.
    ///
    /// Returns the sanitized user on success.
    ///
    /// # Errors
    /// - `Error::DuplicateEmail` if any existing user has an exact-match
    ///   email; the table is left unchanged
    /// - `Error::CryptoError` if password hashing fails
    pub async fn register(&self, email: &str, password: &str, shop_name: &str) -> Result<User> {
        let mut users = self.users().await?;

        if users.iter().any(|u| u.email == email) {
            return Err(Error::DuplicateEmail);
        }

        let user = User {
            id: new_record_id(),
            email: email.to_string(),
            shop_name: shop_name.to_string(),
            password_hash: Some(hash_password(password)?),
        };

        users.push(user.clone());
        self.save_users(&users).await?;
        info!("Registered user {}", user.id);

        // Auto login after register
        let session = user.sanitized();
        self.set_session(&session).await?;
        Ok(session)
    }

    /// Authenticate and establish the active session.
    ///
    /// Returns the sanitized user on success.
    ///
    /// # Errors
    /// Returns `Error::InvalidCredentials` for any mismatch, without
    /// disclosing which part failed.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let users = self.users().await?;

        let matched = users.iter().find(|u| {
            u.email == email
                && u.password_hash
                    .as_deref()
                    .map(|hash| verify_password(hash, password).unwrap_or(false))
                    .unwrap_or(false)
        });

        match matched {
            Some(user) => {
                let session = user.sanitized();
                self.set_session(&session).await?;
                info!("User {} logged in", session.id);
                Ok(session)
            }
            None => Err(Error::InvalidCredentials),
        }
    }

    /// Clear the active session.
    pub async fn logout(&self) -> Result<()> {
        self.backend.delete(&session_key()).await?;
        info!("Session cleared");
        Ok(())
    }

    /// The active session's user, if a session exists.
    ///
    /// Used at process start to restore a prior login.
    pub async fn current_user(&self) -> Result<Option<User>> {
        match self.backend.get(&session_key()).await? {
            Some(bytes) => {
                let user = serde_json::from_slice(&bytes)
                    .map_err(|e| Error::DeserializationError(format!("session: {}", e)))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn set_session(&self, user: &User) -> Result<()> {
        let bytes = serde_json::to_vec(user)
            .map_err(|e| Error::SerializationError(format!("session: {}", e)))?;
        self.backend.set(&session_key(), bytes).await
    }
}
