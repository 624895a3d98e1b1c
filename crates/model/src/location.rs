use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{user::User, ExampleData};

/// A named point on the map, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub user_id: Id<User>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl HasId for Location {
    type IdType = i32;
}

impl ExampleData for Location {
    fn example_data() -> Self {
        Self {
            user_id: Id::new(1),
            name: "Suria KLCC".to_owned(),
            latitude: 3.157324409,
            longitude: 101.7121981,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// A validated location which has not been stored yet. The owner is not part
/// of it, it is always supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NewLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewLocation {
    pub fn new<S: Into<String>>(name: S, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Exact match on name and coordinates.
    pub fn same_place_as(&self, location: &Location) -> bool {
        self.name == location.name
            && self.latitude == location.latitude
            && self.longitude == location.longitude
    }

    pub fn into_location(self, user_id: Id<User>, created_at: DateTime<Utc>) -> Location {
        Location {
            user_id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at,
        }
    }
}
