use async_trait::async_trait;
use chrono::{DateTime, Utc};
use locations::database::{Result, UserRepo};
use model::{
    user::{NewUser, User, UserCredentials},
    WithId,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::{with_id, DatabaseRow};
use crate::{
    queries::user::{exists, get_by_email, insert},
    PgDatabaseAutocommit,
};

/// Table: `users`
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_credentials(self) -> UserCredentials {
        let password_hash = self.password_hash.clone();
        UserCredentials {
            user: with_id(self),
            password_hash,
        }
    }
}

impl DatabaseRow for UserRow {
    type Model = User;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        User {
            username: self.username,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

// Repo

#[async_trait]
impl UserRepo for PgDatabaseAutocommit {
    async fn user_by_email(&mut self, email: &str) -> Result<Option<UserCredentials>> {
        get_by_email(&self.pool, email).await
    }

    async fn user_exists(&mut self, email: &str, username: &str) -> Result<bool> {
        exists(&self.pool, email, username).await
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<WithId<User>> {
        insert(&self.pool, user).await
    }
}
