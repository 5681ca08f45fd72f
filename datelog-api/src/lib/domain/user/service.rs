use std::sync::Arc;

use auth::Authenticator;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// User domain service: registration and credential verification.
///
/// Argon2 hashing and verification are CPU-bound and slow on purpose, so both
/// are dispatched to the blocking pool; they never run on the async workers
/// that serve token verification for other requests.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    authenticator: Arc<Authenticator>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Register a new user, hashing the password for storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    pub async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
                .await
                .map_err(|e| UserError::Unknown(e.to_string()))??;

        let user = User {
            id: UserId::new(),
            email: command.email,
            display_name: command.display_name,
            password_hash,
            couple_id: None,
            created_at: chrono::Utc::now(),
        };

        self.repository.create(user).await
    }

    /// Verify login credentials, returning the user on success.
    ///
    /// An unknown email and a wrong password both collapse to
    /// `InvalidCredentials`; the caller must not be able to tell them apart.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such user or password mismatch
    /// * `Password` - Stored hash could not be checked
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || authenticator.verify_password(&password, &stored_hash))
                .await
                .map_err(|e| UserError::Unknown(e.to_string()))??;

        if !is_valid {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::outbound::repositories::InMemoryUserRepository;

    fn service() -> UserService<InMemoryUserRepository> {
        let authenticator = Arc::new(Authenticator::new(b"test_secret_key_at_least_32_bytes!"));
        UserService::new(Arc::new(InMemoryUserRepository::new()), authenticator)
    }

    fn register_command(email: &str) -> RegisterUserCommand {
        RegisterUserCommand::new(
            EmailAddress::new(email.to_string()).unwrap(),
            "Alice".to_string(),
            "password123".to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_and_verify_credentials() {
        let service = service();

        let user = service
            .register_user(register_command("alice@example.com"))
            .await
            .expect("Registration failed");

        // Plaintext never stored
        assert_ne!(user.password_hash, "password123");

        let verified = service
            .verify_credentials("alice@example.com", "password123")
            .await
            .expect("Verification failed");
        assert_eq!(verified.id, user.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = service();

        service
            .register_user(register_command("alice@example.com"))
            .await
            .expect("Registration failed");

        let result = service
            .register_user(register_command("alice@example.com"))
            .await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let service = service();

        service
            .register_user(register_command("alice@example.com"))
            .await
            .expect("Registration failed");

        let result = service
            .verify_credentials("alice@example.com", "wrong_password")
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid_credentials() {
        let service = service();

        let result = service
            .verify_credentials("nobody@example.com", "password123")
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }
}
