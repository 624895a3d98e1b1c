use std::{error, fmt, result};

use async_trait::async_trait;
use model::{
    location::{Location, NewLocation},
    user::{NewUser, User, UserCredentials},
    WithId,
};
use utility::id::Id;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    /// A uniqueness constraint rejected the write.
    Conflict,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "row not found"),
            Self::Conflict => write!(f, "row conflicts with an existing row"),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl error::Error for DatabaseError {}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait UserRepo {
    async fn user_by_email(&mut self, email: &str) -> Result<Option<UserCredentials>>;

    /// true if any user has either the given email or the given username.
    async fn user_exists(&mut self, email: &str, username: &str) -> Result<bool>;

    async fn insert_user(&mut self, user: NewUser) -> Result<WithId<User>>;
}

#[async_trait]
pub trait LocationRepo {
    /// All locations of one user, newest first.
    async fn locations_of(&mut self, owner: &Id<User>) -> Result<Vec<WithId<Location>>>;

    /// true if the user already stored a location with exactly this name and
    /// these coordinates.
    async fn location_exists(
        &mut self,
        owner: &Id<User>,
        location: &NewLocation,
    ) -> Result<bool>;

    /// Stores a single location. Every call is an independent, atomic write.
    async fn insert_location(
        &mut self,
        owner: &Id<User>,
        location: NewLocation,
    ) -> Result<WithId<Location>>;
}

pub trait DatabaseOperations: UserRepo + LocationRepo {}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// trait to implement a location database.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
pub trait Database: Clone + Send + Sync + Sized + 'static {
    type Autocommit: DatabaseAutocommit + Send;

    fn auto(&self) -> Self::Autocommit;
}
