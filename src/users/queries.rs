//! Read-only user operations.

use std::sync::Arc;

use crate::users::domain::User;
use crate::users::repository::{RepositoryError, UserRepository};

pub struct GetAllUsersQuery {
    repository: Arc<dyn UserRepository>,
}

impl GetAllUsersQuery {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(&self) -> Result<Vec<User>, RepositoryError> {
        self.repository.find_all()
    }
}

pub struct GetUserQuery {
    repository: Arc<dyn UserRepository>,
}

impl GetUserQuery {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        self.repository.find_by_id(id)
    }
}
