//! User entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: String, email: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            name,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_email(&mut self, email: String) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn update_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}

/// Generate a user id: `user_<unix millis>_<6 base-36 chars>`.
pub fn generate_user_id() -> String {
    let suffix: String = (0..6)
        .map(|_| char::from_digit(fastrand::u32(0..36), 36).unwrap_or('0'))
        .collect();
    format!("user_{}_{}", Utc::now().timestamp_millis(), suffix)
}
