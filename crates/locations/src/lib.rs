use std::{error::Error, fmt};

use import::ImportError;

pub mod auth;
pub mod client;
pub mod database;
pub mod import;
pub mod input;
pub mod memory;

#[derive(Debug)]
pub enum RequestError {
    NotFound,
    /// The request was understood but its content was rejected.
    InvalidInput(String),
    AlreadyExists(String),
    Unauthorized(String),
    Import(ImportError),
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }

    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn already_exists<S: Into<String>>(message: S) -> Self {
        Self::AlreadyExists(message.into())
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized(message.into())
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::InvalidInput(message)
            | Self::AlreadyExists(message)
            | Self::Unauthorized(message) => write!(f, "{}", message),
            Self::Import(why) => write!(f, "{}", why),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl Error for RequestError {}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::Conflict => {
                Self::already_exists("The item already exists.")
            }
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

impl From<ImportError> for RequestError {
    fn from(why: ImportError) -> Self {
        Self::Import(why)
    }
}

impl From<auth::AuthError> for RequestError {
    fn from(why: auth::AuthError) -> Self {
        Self::other(why)
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
