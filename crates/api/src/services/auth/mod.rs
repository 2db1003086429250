//! Authentication service.
//!
//! Handles registration and password login. Sessions themselves are managed
//! by the tower-sessions layer; this service only establishes who the
//! caller is.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use kiosk_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length.
const MAX_USERNAME_LENGTH: usize = 150;

/// A validated registration request.
#[derive(Debug)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// Creates the user row together with their password hash, empty
    /// profile, and empty cart.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidEmail` for
    /// malformed identity fields, `AuthError::WeakPassword` /
    /// `AuthError::PasswordMismatch` for bad passwords, and
    /// `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn register(&self, registration: Registration<'_>) -> Result<User, AuthError> {
        validate_username(registration.username)?;
        let email = Email::parse(registration.email)?;
        validate_password(registration.password)?;

        if registration.password != registration.password_confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let password_hash = hash_password(registration.password)?;

        let user = self
            .users
            .create_with_password(
                registration.username,
                &email,
                registration.first_name,
                registration.last_name,
                &password_hash,
            )
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is
    /// wrong. A missing user and a wrong password are indistinguishable.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Validate a username.
fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::InvalidUsername(
            "username cannot be empty".to_owned(),
        ));
    }

    if username.len() > MAX_USERNAME_LENGTH {
        return Err(AuthError::InvalidUsername(format!(
            "username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '@' | '+'))
    {
        return Err(AuthError::InvalidUsername(
            "username may only contain letters, digits and @/./+/-/_".to_owned(),
        ));
    }

    Ok(())
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_accepts_common_forms() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("alice.b-2@shop+1_x").is_ok());
    }

    #[test]
    fn test_validate_username_rejects_empty() {
        assert!(matches!(
            validate_username(""),
            Err(AuthError::InvalidUsername(_))
        ));
    }

    #[test]
    fn test_validate_username_rejects_spaces() {
        assert!(matches!(
            validate_username("alice smith"),
            Err(AuthError::InvalidUsername(_))
        ));
    }

    #[test]
    fn test_validate_username_rejects_too_long() {
        let long = "a".repeat(MAX_USERNAME_LENGTH + 1);
        assert!(validate_username(&long).is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("1234567"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
