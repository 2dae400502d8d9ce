//! User module.
//!
//! # Data Flow
//! ```text
//! handlers.rs (HTTP, logging via RequestContext)
//!     → commands.rs (create / update / delete)
//!     → queries.rs  (list / get)
//!     → repository.rs (UserRepository, in-memory store)
//! ```

pub mod commands;
pub mod domain;
pub mod handlers;
pub mod queries;
pub mod repository;

use std::sync::Arc;

pub use commands::{
    CommandError, CreateUserCommand, CreateUserRequest, DeleteUserCommand, UpdateUserCommand,
    UpdateUserRequest,
};
pub use domain::User;
pub use queries::{GetAllUsersQuery, GetUserQuery};
pub use repository::{InMemoryUserRepository, RepositoryError, UserRepository};

/// Commands and queries wired to one repository.
#[derive(Clone)]
pub struct UserModule {
    pub create: Arc<CreateUserCommand>,
    pub update: Arc<UpdateUserCommand>,
    pub delete: Arc<DeleteUserCommand>,
    pub get_all: Arc<GetAllUsersQuery>,
    pub get: Arc<GetUserQuery>,
}

impl UserModule {
    pub fn initialize(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            create: Arc::new(CreateUserCommand::new(repository.clone())),
            update: Arc::new(UpdateUserCommand::new(repository.clone())),
            delete: Arc::new(DeleteUserCommand::new(repository.clone())),
            get_all: Arc::new(GetAllUsersQuery::new(repository.clone())),
            get: Arc::new(GetUserQuery::new(repository)),
        }
    }
}
