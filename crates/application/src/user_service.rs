use std::sync::Arc;

use staffhub_core::AppResult;

use crate::user_ports::{PasswordHasher, UserAccount, UserRepository};

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials were valid.
    Authenticated(UserAccount),
    /// Credentials were invalid; the reason is deliberately not exposed.
    Failed,
}

/// Application service for session authentication.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a user service.
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>, password_hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// Authenticates a user with email and password.
    ///
    /// Returns [`AuthOutcome::Failed`] with no detail for any failure
    /// (unknown email or wrong password) to prevent account enumeration.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let normalized = email.trim().to_lowercase();
        let user = self.repository.find_by_email(&normalized).await?;

        let Some(user) = user else {
            // Hash anyway so unknown emails take as long as wrong passwords.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, &user.password_hash)?;

        if !password_valid {
            return Ok(AuthOutcome::Failed);
        }

        Ok(AuthOutcome::Authenticated(user))
    }
}
