use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::WithId;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl HasId for User {
    type IdType = i32;
}

/// A user about to be registered. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A stored user together with its password hash. Never serialized.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: WithId<User>,
    pub password_hash: String,
}
