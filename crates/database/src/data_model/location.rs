use async_trait::async_trait;
use chrono::{DateTime, Utc};
use locations::database::{LocationRepo, Result};
use model::{
    location::{Location, NewLocation},
    user::User,
    WithId,
};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;
use crate::{
    queries::location::{exists, get_by_user, insert},
    PgDatabaseAutocommit,
};

/// A location saved by a user.
/// Table: `locations`
#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl DatabaseRow for LocationRow {
    type Model = Location;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        Location {
            user_id: Id::new(self.user_id),
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: self.created_at,
        }
    }
}

// Repo

#[async_trait]
impl LocationRepo for PgDatabaseAutocommit {
    async fn locations_of(&mut self, owner: &Id<User>) -> Result<Vec<WithId<Location>>> {
        get_by_user(&self.pool, owner).await
    }

    async fn location_exists(
        &mut self,
        owner: &Id<User>,
        location: &NewLocation,
    ) -> Result<bool> {
        exists(&self.pool, owner, location).await
    }

    async fn insert_location(
        &mut self,
        owner: &Id<User>,
        location: NewLocation,
    ) -> Result<WithId<Location>> {
        insert(&self.pool, owner, location).await
    }
}
