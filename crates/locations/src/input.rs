//! Request payloads as they arrive from clients, before validation.
//!
//! Every field is optional so that a missing field is reported with a
//! readable message instead of a deserialization error.

use model::location::NewLocation;
use serde::Deserialize;
use utility::geo;

use crate::{RequestError, RequestResult};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn validate(self) -> RequestResult<ValidRegistration> {
        let (Some(username), Some(email), Some(password)) = (
            non_empty(self.username),
            non_empty(self.email),
            non_empty(self.password),
        ) else {
            return Err(RequestError::invalid_input("All fields are required"));
        };

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(RequestError::invalid_input(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        Ok(ValidRegistration {
            username,
            email,
            password,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn validate(self) -> RequestResult<(String, String)> {
        match (non_empty(self.email), non_empty(self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(RequestError::invalid_input(
                "Email and password are required",
            )),
        }
    }
}

/// Web forms send coordinates as strings, scripts tend to send numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    Number(f64),
    Text(String),
}

impl CoordinateInput {
    fn parse(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value).filter(|value| value.is_finite()),
            Self::Text(text) => geo::parse_coordinate(text),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationInput {
    pub name: Option<String>,
    pub latitude: Option<CoordinateInput>,
    pub longitude: Option<CoordinateInput>,
}

impl LocationInput {
    pub fn validate(self) -> RequestResult<NewLocation> {
        let (Some(name), Some(latitude), Some(longitude)) =
            (non_empty(self.name), self.latitude, self.longitude)
        else {
            return Err(RequestError::invalid_input(
                "Name, latitude, and longitude are required",
            ));
        };

        let (Some(latitude), Some(longitude)) = (latitude.parse(), longitude.parse()) else {
            return Err(RequestError::invalid_input(
                "Invalid latitude or longitude format",
            ));
        };

        if !geo::is_valid_latitude(latitude) {
            return Err(RequestError::invalid_input(
                "Latitude must be between -90 and 90",
            ));
        }
        if !geo::is_valid_longitude(longitude) {
            return Err(RequestError::invalid_input(
                "Longitude must be between -180 and 180",
            ));
        }

        Ok(NewLocation::new(name, latitude, longitude))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
