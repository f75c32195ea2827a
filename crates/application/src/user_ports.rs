use async_trait::async_trait;
use staffhub_core::AppResult;
use staffhub_domain::UserId;

/// One login account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Stable user identifier.
    pub id: UserId,
    /// Normalized login email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Name of the role the account holds.
    pub role_name: String,
    /// Argon2 password hash.
    pub password_hash: String,
}

/// Repository port for login accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds an account by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>>;
}

/// Password hashing capability.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password for storage.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
