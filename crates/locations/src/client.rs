use std::sync::Arc;

use futures::future;
use model::{
    location::{Location, NewLocation},
    user::{NewUser, User},
    WithId,
};
use utility::id::Id;

use crate::{
    auth::Authenticator,
    database::{Database, LocationRepo, UserRepo},
    import::{self, LineError},
    input::{Credentials, LocationInput, Registration},
    RequestError, RequestResult,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: WithId<User>,
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub locations: Vec<WithId<Location>>,
    /// Lines which were skipped. Empty if the whole file was imported.
    pub warnings: Vec<LineError>,
}

/// Entry point for every operation on users and their locations.
#[derive(Clone)]
pub struct Client<D>
where
    D: Database,
{
    pub database: D,
    authenticator: Arc<Authenticator>,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D, authenticator: Authenticator) -> Self {
        Self {
            database,
            authenticator: Arc::new(authenticator),
        }
    }

    // - Accounts -

    pub async fn register(&self, registration: Registration) -> RequestResult<WithId<User>> {
        let registration = registration.validate()?;
        let mut database = self.database.auto();

        if database
            .user_exists(&registration.email, &registration.username)
            .await?
        {
            return Err(user_exists());
        }

        let password_hash = self
            .authenticator
            .hash_password(registration.password)
            .await?;

        let user = database
            .insert_user(NewUser {
                username: registration.username,
                email: registration.email,
                password_hash,
            })
            .await
            .map_err(|why| match RequestError::from(why) {
                // lost a race against a concurrent registration
                RequestError::AlreadyExists(_) => user_exists(),
                other => other,
            })?;

        log::info!("registered user {} ({})", user.id, user.content.username);
        Ok(user)
    }

    pub async fn login(&self, credentials: Credentials) -> RequestResult<Session> {
        let (email, password) = credentials.validate()?;

        let Some(stored) = self.database.auto().user_by_email(&email).await? else {
            return Err(RequestError::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .authenticator
            .verify_password(password, stored.password_hash)
            .await?
        {
            return Err(RequestError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self
            .authenticator
            .issue_token(&stored.user.id, &stored.user.content.email)?;
        Ok(Session {
            token,
            user: stored.user,
        })
    }

    /// Resolves a session token to the user it was issued for.
    pub fn verify_token(&self, token: &str) -> RequestResult<Id<User>> {
        self.authenticator
            .verify_token(token)
            .map(|claims| claims.user_id())
            .map_err(|why| {
                log::debug!("rejected token: {}", why);
                RequestError::unauthorized("Invalid or expired token")
            })
    }

    // - Locations -

    pub async fn get_locations(&self, owner: &Id<User>) -> RequestResult<Vec<WithId<Location>>> {
        Ok(self.database.auto().locations_of(owner).await?)
    }

    /// Adds a single location. Unlike [`Client::upload_locations`], an exact
    /// duplicate of an existing location of the same user is rejected.
    pub async fn add_location(
        &self,
        owner: &Id<User>,
        input: LocationInput,
    ) -> RequestResult<WithId<Location>> {
        let location = input.validate()?;
        let mut database = self.database.auto();

        if database.location_exists(owner, &location).await? {
            return Err(RequestError::already_exists(
                "This location already exists in your list",
            ));
        }

        Ok(database.insert_location(owner, location).await?)
    }

    /// Imports every valid line of an uploaded archive.
    ///
    /// Nothing is stored if the archive itself is rejected. Otherwise all
    /// candidates are inserted concurrently, each on its own; there is no
    /// transaction around the batch. If one insert fails the request fails,
    /// but rows which were already written stay. Duplicates are not checked,
    /// neither inside the file nor against stored locations.
    pub async fn upload_locations(
        &self,
        owner: &Id<User>,
        archive: &[u8],
    ) -> RequestResult<ImportReport> {
        let payload = import::prepare(archive)?;
        let owner = *owner;

        let inserts = payload
            .candidates
            .into_iter()
            .map(|candidate| self.insert_candidate(owner, candidate.location));
        let locations = future::try_join_all(inserts).await?;

        log::info!(
            "imported {} locations for user {}, skipped {} lines",
            locations.len(),
            owner,
            payload.errors.len()
        );

        Ok(ImportReport {
            locations,
            warnings: payload.errors,
        })
    }

    async fn insert_candidate(
        &self,
        owner: Id<User>,
        location: NewLocation,
    ) -> RequestResult<WithId<Location>> {
        Ok(self
            .database
            .auto()
            .insert_location(&owner, location)
            .await?)
    }
}

fn user_exists() -> RequestError {
    RequestError::already_exists("User with this email or username already exists")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::AuthConfig,
        import::{zip_archive, ImportError, LineErrorKind},
        input::CoordinateInput,
        memory::InMemoryDatabase,
    };

    fn client() -> Client<InMemoryDatabase> {
        Client::new(
            InMemoryDatabase::new(),
            Authenticator::new(AuthConfig::new("test-secret").with_bcrypt_cost(4)),
        )
    }

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            username: Some(username.to_owned()),
            email: Some(email.to_owned()),
            password: Some("secret123".to_owned()),
        }
    }

    fn location_input(name: &str, latitude: f64, longitude: f64) -> LocationInput {
        LocationInput {
            name: Some(name.to_owned()),
            latitude: Some(CoordinateInput::Number(latitude)),
            longitude: Some(CoordinateInput::Number(longitude)),
        }
    }

    fn stored(client: &Client<InMemoryDatabase>) -> Vec<WithId<Location>> {
        client.database.all_locations().unwrap()
    }

    #[tokio::test]
    async fn register_then_login() {
        let client = client();
        let user = client
            .register(registration("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(user.content.username, "alice");

        let session = client
            .login(Credentials {
                email: Some("alice@example.com".to_owned()),
                password: Some("secret123".to_owned()),
            })
            .await
            .unwrap();
        assert_eq!(session.user.id, user.id);
        assert_eq!(client.verify_token(&session.token).unwrap(), user.id);
    }

    #[tokio::test]
    async fn register_rejects_taken_username_or_email() {
        let client = client();
        client
            .register(registration("alice", "alice@example.com"))
            .await
            .unwrap();

        for duplicate in [
            registration("alice", "other@example.com"),
            registration("bob", "alice@example.com"),
        ] {
            match client.register(duplicate).await {
                Err(RequestError::AlreadyExists(message)) => assert_eq!(
                    message,
                    "User with this email or username already exists"
                ),
                other => panic!("unexpected result: {:?}", other.map(|user| user.id)),
            }
        }
    }

    #[tokio::test]
    async fn login_does_not_reveal_which_part_was_wrong() {
        let client = client();
        client
            .register(registration("alice", "alice@example.com"))
            .await
            .unwrap();

        for (email, password) in [
            ("alice@example.com", "wrong-password"),
            ("nobody@example.com", "secret123"),
        ] {
            let result = client
                .login(Credentials {
                    email: Some(email.to_owned()),
                    password: Some(password.to_owned()),
                })
                .await;
            match result {
                Err(RequestError::Unauthorized(message)) => {
                    assert_eq!(message, INVALID_CREDENTIALS)
                }
                other => panic!("unexpected result: {:?}", other.map(|s| s.user.id)),
            }
        }
    }

    #[tokio::test]
    async fn add_location_rejects_exact_duplicates() {
        let client = client();
        let owner = Id::new(1);
        client
            .add_location(&owner, location_input("Home", 1.0, 2.0))
            .await
            .unwrap();

        let duplicate = client
            .add_location(&owner, location_input("Home", 1.0, 2.0))
            .await;
        assert!(matches!(duplicate, Err(RequestError::AlreadyExists(_))));

        // same place for another user, or another name, is fine
        client
            .add_location(&Id::new(2), location_input("Home", 1.0, 2.0))
            .await
            .unwrap();
        client
            .add_location(&owner, location_input("Work", 1.0, 2.0))
            .await
            .unwrap();
        assert_eq!(stored(&client).len(), 3);
    }

    #[tokio::test]
    async fn get_locations_returns_only_own_locations_newest_first() {
        let client = client();
        let owner = Id::new(1);
        for name in ["first", "second"] {
            client
                .add_location(&owner, location_input(name, 1.0, 2.0))
                .await
                .unwrap();
        }
        client
            .add_location(&Id::new(2), location_input("foreign", 1.0, 2.0))
            .await
            .unwrap();

        let names = client
            .get_locations(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|location| location.content.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn upload_stores_valid_lines_and_reports_the_rest() {
        let client = client();
        let owner = Id::new(7);
        let archive = zip_archive(&[(
            "locations.txt",
            "name,latitude,longitude\nSuria KLCC,3.157324409,101.7121981\nBad Row\n",
        )]);

        let report = client.upload_locations(&owner, &archive).await.unwrap();

        assert_eq!(report.locations.len(), 1);
        assert_eq!(report.locations[0].content.name, "Suria KLCC");
        assert_eq!(report.locations[0].content.user_id, owner);
        assert_eq!(
            report.warnings,
            vec![LineError {
                line: 3,
                kind: LineErrorKind::InvalidFormat
            }]
        );
        assert_eq!(stored(&client).len(), 1);
    }

    #[tokio::test]
    async fn upload_is_not_idempotent_and_skips_duplicate_checks() {
        let client = client();
        let owner = Id::new(1);
        client
            .add_location(&owner, location_input("A", 1.0, 2.0))
            .await
            .unwrap();
        let archive = zip_archive(&[("l.txt", "header\nA,1,2\nA,1,2\n")]);

        client.upload_locations(&owner, &archive).await.unwrap();
        client.upload_locations(&owner, &archive).await.unwrap();

        assert_eq!(stored(&client).len(), 5);
    }

    #[tokio::test]
    async fn rejected_uploads_store_nothing() {
        let client = client();
        let owner = Id::new(1);

        let two_files = zip_archive(&[("a.txt", "h\nA,1,2"), ("b.txt", "h\nB,1,2")]);
        assert!(matches!(
            client.upload_locations(&owner, &two_files).await,
            Err(RequestError::Import(ImportError::MultipleTextFiles))
        ));

        let out_of_range = zip_archive(&[("a.txt", "h\nX,95,100\n")]);
        match client.upload_locations(&owner, &out_of_range).await {
            Err(RequestError::Import(error @ ImportError::NoValidLocations(_))) => {
                assert_eq!(
                    error.details(),
                    Some(vec!["Line 2: Coordinates out of range".to_owned()])
                );
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.locations.len())),
        }

        let header_only = zip_archive(&[("a.txt", "name,lat,lng\n")]);
        assert!(matches!(
            client.upload_locations(&owner, &header_only).await,
            Err(RequestError::Import(ImportError::Empty))
        ));

        assert!(stored(&client).is_empty());
    }

    #[tokio::test]
    async fn upload_fails_when_the_store_fails() {
        let client = client();
        client.database.fail_location_inserts(true);
        let archive = zip_archive(&[("a.txt", "h\nA,1,2\nB,3,4\n")]);

        assert!(matches!(
            client.upload_locations(&Id::new(1), &archive).await,
            Err(RequestError::Other(_))
        ));
    }

    #[tokio::test]
    async fn failed_insert_keeps_rows_already_stored() {
        let client = client();
        client
            .database
            .fail_location_inserts_named("FAIL")
            .unwrap();
        let archive = zip_archive(&[("a.txt", "h\nA,1,2\nFAIL,3,4\n")]);

        assert!(matches!(
            client.upload_locations(&Id::new(1), &archive).await,
            Err(RequestError::Other(_))
        ));

        let names = stored(&client)
            .into_iter()
            .map(|location| location.content.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["A"]);
    }

    #[tokio::test]
    async fn upload_stores_long_names() {
        let client = client();
        let name = "a".repeat(300);
        let archive = zip_archive(&[("a.txt", &format!("h\n{},1,2\n", name))]);

        let report = client.upload_locations(&Id::new(1), &archive).await.unwrap();

        assert_eq!(report.locations[0].content.name, name);
        assert!(report.warnings.is_empty());
    }
}
