use storehub_auth::Identity;
use storehub_core::{AppError, hash_password_with_cost, verify_password};
use storehub_models::{Customer, LoginForm, NewClient, RegisterForm, User};
use tracing::{info, instrument, warn};

use crate::store::UserRepository;

pub const INVALID_CREDENTIALS: &str = "These credentials do not match our records.";
pub const INACTIVE_ACCOUNT: &str = "Your account is inactive. Please contact the administrator.";
pub const EMAIL_TAKEN: &str = "The email has already been taken.";
pub const REGISTERED: &str = "Registration successful. Welcome to StoreHub!";

/// Result of checking a login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(Identity),
    InvalidCredentials,
    Inactive,
}

pub struct AuthService;

impl AuthService {
    /// Verifies the credential pair and the account status.
    #[instrument(skip(users, form), fields(email = %form.email))]
    pub async fn attempt(
        users: &dyn UserRepository,
        form: &LoginForm,
    ) -> Result<LoginOutcome, AppError> {
        let Some(credentials) = users.find_credentials(form.email.trim()).await? else {
            warn!("Login failed: unknown email");
            return Ok(LoginOutcome::InvalidCredentials);
        };

        let password = form.password.clone();
        let hash = credentials.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
        if !matches {
            warn!(user_id = %credentials.id, "Login failed: wrong password");
            return Ok(LoginOutcome::InvalidCredentials);
        }

        if !credentials.active {
            warn!(user_id = %credentials.id, "Login refused: account inactive");
            return Ok(LoginOutcome::Inactive);
        }

        match users.load_identity(credentials.id).await? {
            Some(identity) => {
                info!(user_id = %identity.id, "User authenticated");
                Ok(LoginOutcome::Authenticated(identity))
            }
            None => Ok(LoginOutcome::InvalidCredentials),
        }
    }

    /// Creates a client identity and its customer record. A taken email
    /// comes back as a 409.
    #[instrument(skip(users, form), fields(email = %form.email))]
    pub async fn register(
        users: &dyn UserRepository,
        form: &RegisterForm,
        bcrypt_cost: u32,
    ) -> Result<(User, Customer), AppError> {
        let password = form.password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password_with_cost(&password, bcrypt_cost))
                .await??;

        let (user, customer) = users
            .create_client(NewClient {
                name: form.name.trim().to_string(),
                email: form.email.trim().to_lowercase(),
                password_hash,
                phone: form.phone().map(str::to_string),
            })
            .await?;

        info!(user_id = %user.id, customer_code = %customer.code, "Client registered");
        Ok((user, customer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use storehub_core::Role;

    async fn store_with(active: bool) -> InMemoryStore {
        let store = InMemoryStore::new();
        let hash = hash_password_with_cost("password123", 4).unwrap();
        store
            .insert_user("Ana", "ana@example.com", &hash, active, &[Role::Admin])
            .await;
        store
    }

    fn form(password: &str) -> LoginForm {
        LoginForm {
            email: "ANA@example.com".to_string(),
            password: password.to_string(),
            remember: false,
        }
    }

    #[tokio::test]
    async fn test_attempt_outcomes() {
        let store = store_with(true).await;

        assert!(matches!(
            AuthService::attempt(&store, &form("password123")).await.unwrap(),
            LoginOutcome::Authenticated(_)
        ));
        assert!(matches!(
            AuthService::attempt(&store, &form("wrong")).await.unwrap(),
            LoginOutcome::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_inactive_is_reported_only_after_password_check() {
        let store = store_with(false).await;

        assert!(matches!(
            AuthService::attempt(&store, &form("password123")).await.unwrap(),
            LoginOutcome::Inactive
        ));
        assert!(matches!(
            AuthService::attempt(&store, &form("wrong")).await.unwrap(),
            LoginOutcome::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_register_stores_lowercased_email() {
        let store = InMemoryStore::new();
        let form = RegisterForm {
            name: " Ana Client ".to_string(),
            email: " Ana@Example.COM ".to_string(),
            password: "password123".to_string(),
            password_confirmation: "password123".to_string(),
            phone: None,
            terms: true,
        };

        let (user, customer) = AuthService::register(&store, &form, 4).await.unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.name, "Ana Client");
        assert_eq!(customer.email, "ana@example.com");

        let again = AuthService::register(&store, &form, 4).await.unwrap_err();
        assert!(again.is_conflict());
    }
}
