use crate::dto::NewUserRequest;
use crate::entities::{User, UserRole};
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Registration and lookup of users.
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Register a customer account.
    ///
    /// The password is stored as received. The identity-document name has no
    /// column on the user record and is only logged.
    pub async fn register(&self, request: NewUserRequest) -> Result<User, DomainError> {
        debug!(
            username = %request.username,
            id_name = %request.id_name,
            "registering user"
        );

        let user = User::new(
            request.username,
            request.password,
            request.email,
            UserRole::Customer,
        );
        user.validate()?;

        if self
            .user_repository
            .find_by_username(&user.username)
            .await?
            .is_some()
        {
            return Err(DomainError::UsernameAlreadyExists(user.username));
        }

        if self
            .user_repository
            .find_by_email(&user.email)
            .await?
            .is_some()
        {
            return Err(DomainError::EmailAlreadyExists(user.email));
        }

        let saved = self.user_repository.save(&user).await?;
        info!(user_id = ?saved.id(), username = %saved.username, "user registered");

        Ok(saved)
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, id: i32) -> Result<User, DomainError> {
        match self.user_repository.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => Err(DomainError::UserNotFound(id)),
        }
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, DomainError> {
        self.user_repository.find_all().await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.user_repository.find_by_username(username).await
    }
}
