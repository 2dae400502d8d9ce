//! State-changing user operations.

use std::sync::Arc;

use serde::Deserialize;

use crate::users::domain::{generate_user_id, User};
use crate::users::repository::{RepositoryError, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Invalid(String),

    #[error("User not found")]
    NotFound,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

fn validate_email(email: &str) -> Result<String, CommandError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(CommandError::Invalid("A valid email is required".to_string()));
    }
    Ok(email.to_string())
}

fn validate_name(name: &str) -> Result<String, CommandError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::Invalid("Name is required".to_string()));
    }
    Ok(name.to_string())
}

pub struct CreateUserCommand {
    repository: Arc<dyn UserRepository>,
}

impl CreateUserCommand {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, request: CreateUserRequest) -> Result<User, CommandError> {
        let email = validate_email(&request.email)?;
        let name = validate_name(&request.name)?;

        let user = User::new(generate_user_id(), email, name);
        match self.repository.insert(user.clone()) {
            Ok(()) => Ok(user),
            Err(RepositoryError::EmailTaken) => Err(CommandError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct UpdateUserCommand {
    repository: Arc<dyn UserRepository>,
}

impl UpdateUserCommand {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: &str, request: UpdateUserRequest) -> Result<User, CommandError> {
        let mut user = self.repository.find_by_id(id)?.ok_or(CommandError::NotFound)?;

        if let Some(email) = request.email {
            let email = validate_email(&email)?;
            if email != user.email {
                user.update_email(email);
            }
        }
        if let Some(name) = request.name {
            user.update_name(validate_name(&name)?);
        }

        match self.repository.update(user.clone()) {
            Ok(()) => Ok(user),
            Err(RepositoryError::EmailTaken) => Err(CommandError::EmailTaken),
            Err(RepositoryError::NotFound) => Err(CommandError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct DeleteUserCommand {
    repository: Arc<dyn UserRepository>,
}

impl DeleteUserCommand {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: &str) -> Result<(), CommandError> {
        if self.repository.delete(id)? {
            Ok(())
        } else {
            Err(CommandError::NotFound)
        }
    }
}
