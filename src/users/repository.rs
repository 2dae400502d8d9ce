//! User storage.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::users::domain::User;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("user store lock poisoned")]
    Poisoned,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("User not found")]
    NotFound,
}

/// Storage seam for users.
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails if the email is already registered.
    fn insert(&self, user: User) -> Result<(), RepositoryError>;

    /// Insert or replace by id.
    fn save(&self, user: User) -> Result<(), RepositoryError>;

    /// Replace an existing user. The id must still be present and no other
    /// user may hold the new email; both are checked under one write.
    fn update(&self, user: User) -> Result<(), RepositoryError>;

    fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError>;

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// All users in insertion order.
    fn find_all(&self) -> Result<Vec<User>, RepositoryError>;

    /// Returns whether a user was removed.
    fn delete(&self, id: &str) -> Result<bool, RepositoryError>;

    fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        Ok(self.find_by_email(email)?.is_some())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.find_all()?.len())
    }
}

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<User>>, RepositoryError> {
        self.users.read().map_err(|_| RepositoryError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<User>>, RepositoryError> {
        self.users.write().map_err(|_| RepositoryError::Poisoned)
    }

    pub fn clear(&self) -> Result<(), RepositoryError> {
        self.write()?.clear();
        Ok(())
    }
}

impl UserRepository for InMemoryUserRepository {
    fn insert(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.write()?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::EmailTaken);
        }
        users.push(user);
        Ok(())
    }

    fn save(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.write()?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
        Ok(())
    }

    fn update(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.write()?;
        if users.iter().any(|u| u.email == user.email && u.id != user.id) {
            return Err(RepositoryError::EmailTaken);
        }
        let existing = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = user;
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.read()?.iter().find(|u| u.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.read()?.iter().find(|u| u.email == email).cloned())
    }

    fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.read()?.clone())
    }

    fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut users = self.write()?;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() != before)
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.len())
    }
}
