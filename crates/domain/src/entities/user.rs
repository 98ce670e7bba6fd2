use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Role tag stored alongside every user (`usertype` column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "customer" => Ok(UserRole::Customer),
            "admin" => Ok(UserRole::Admin),
            other => Err(DomainError::ValidationError(format!(
                "Unknown user role: {}",
                other
            ))),
        }
    }
}

/// Core User entity
///
/// The identity is assigned by the persistence layer and cannot be changed
/// afterwards, so it is only reachable through [`User::id`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: Option<i32>, // None for new users before persistence
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub role: UserRole,
}

impl User {
    pub fn new(username: String, password: String, email: String, role: UserRole) -> Self {
        Self {
            id: None,
            username,
            password,
            email,
            role,
        }
    }

    pub fn with_id(
        id: i32,
        username: String,
        password: String,
        email: String,
        role: UserRole,
    ) -> Self {
        Self {
            id: Some(id),
            username,
            password,
            email,
            role,
        }
    }

    /// Copy of this user carrying the identity the store just assigned.
    pub fn persisted(&self, id: i32) -> Self {
        Self::with_id(
            id,
            self.username.clone(),
            self.password.clone(),
            self.email.clone(),
            self.role,
        )
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish()
    }
}
