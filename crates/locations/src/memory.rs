//! A `Database` kept entirely in memory, used by the tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard,
};

use async_trait::async_trait;
use chrono::Utc;
use model::{
    location::{Location, NewLocation},
    user::{NewUser, User, UserCredentials},
    WithId,
};
use utility::id::Id;

use crate::database::{
    Database, DatabaseAutocommit, DatabaseError, DatabaseOperations, LocationRepo, Result,
    UserRepo,
};

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    locations: Vec<WithId<Location>>,
    last_user_id: i32,
    last_location_id: i32,
    failing_location_names: Vec<String>,
}

#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<Mutex<Tables>>,
    failing_location_inserts: Arc<AtomicBool>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following location insert fail, to simulate an
    /// unavailable store.
    pub fn fail_location_inserts(&self, fail: bool) {
        self.failing_location_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes every following insert of a location with this name fail, while
    /// other locations are still stored.
    pub fn fail_location_inserts_named<S: Into<String>>(&self, name: S) -> Result<()> {
        self.tables()?.failing_location_names.push(name.into());
        Ok(())
    }

    /// Every stored location of every user, in insertion order.
    pub fn all_locations(&self) -> Result<Vec<WithId<Location>>> {
        Ok(self.tables()?.locations.clone())
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|why| DatabaseError::Other(why.to_string().into()))
    }
}

impl Database for InMemoryDatabase {
    type Autocommit = InMemoryDatabase;

    fn auto(&self) -> Self::Autocommit {
        self.clone()
    }
}

impl DatabaseAutocommit for InMemoryDatabase {}

impl DatabaseOperations for InMemoryDatabase {}

#[async_trait]
impl UserRepo for InMemoryDatabase {
    async fn user_by_email(&mut self, email: &str) -> Result<Option<UserCredentials>> {
        Ok(self
            .tables()?
            .users
            .iter()
            .find(|credentials| credentials.user.content.email == email)
            .cloned())
    }

    async fn user_exists(&mut self, email: &str, username: &str) -> Result<bool> {
        Ok(self.tables()?.users.iter().any(|credentials| {
            credentials.user.content.email == email
                || credentials.user.content.username == username
        }))
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<WithId<User>> {
        let mut tables = self.tables()?;
        let taken = tables.users.iter().any(|credentials| {
            credentials.user.content.email == user.email
                || credentials.user.content.username == user.username
        });
        if taken {
            return Err(DatabaseError::Conflict);
        }

        tables.last_user_id += 1;
        let stored = WithId::new(
            Id::new(tables.last_user_id),
            User {
                username: user.username,
                email: user.email,
                created_at: Utc::now(),
            },
        );
        tables.users.push(UserCredentials {
            user: stored.clone(),
            password_hash: user.password_hash,
        });
        Ok(stored)
    }
}

#[async_trait]
impl LocationRepo for InMemoryDatabase {
    async fn locations_of(&mut self, owner: &Id<User>) -> Result<Vec<WithId<Location>>> {
        let mut locations = self
            .tables()?
            .locations
            .iter()
            .filter(|location| location.content.user_id == *owner)
            .cloned()
            .collect::<Vec<_>>();
        locations.sort_by(|a, b| {
            b.content
                .created_at
                .cmp(&a.content.created_at)
                .then_with(|| b.id.raw().cmp(&a.id.raw()))
        });
        Ok(locations)
    }

    async fn location_exists(
        &mut self,
        owner: &Id<User>,
        location: &NewLocation,
    ) -> Result<bool> {
        Ok(self.tables()?.locations.iter().any(|stored| {
            stored.content.user_id == *owner && location.same_place_as(&stored.content)
        }))
    }

    async fn insert_location(
        &mut self,
        owner: &Id<User>,
        location: NewLocation,
    ) -> Result<WithId<Location>> {
        if self.failing_location_inserts.load(Ordering::SeqCst) {
            return Err(DatabaseError::Other("location store unavailable".into()));
        }

        let mut tables = self.tables()?;
        if tables.failing_location_names.contains(&location.name) {
            return Err(DatabaseError::Other(
                format!("could not store location {:?}", location.name).into(),
            ));
        }

        tables.last_location_id += 1;
        let stored = WithId::new(
            Id::new(tables.last_location_id),
            location.into_location(*owner, Utc::now()),
        );
        tables.locations.push(stored.clone());
        Ok(stored)
    }
}
