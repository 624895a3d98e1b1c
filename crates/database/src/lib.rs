use std::{env, error::Error};

use locations::database::{Database, DatabaseAutocommit, DatabaseOperations};

pub mod data_model;
pub mod queries;

/// Where to find PostgreSQL. Either a complete `DATABASE_URL` or the
/// separate `DATABASE_*` variables.
pub enum DatabaseConnectionInfo {
    Url(String),
    Parts {
        username: String,
        password: String,
        hostname: String,
        port: u16,
        database: String,
    },
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        if let Some(url) = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()) {
            return Some(Self::Url(url));
        }

        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self::Parts {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        match self {
            Self::Url(url) => url,
            Self::Parts {
                username,
                password,
                hostname,
                port,
                database,
            } => format!(
                "postgres://{}:{}@{}:{}/{}",
                username, password, hostname, port, database
            ),
        }
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

pub struct PgDatabaseAutocommit {
    pool: sqlx::PgPool,
}

impl DatabaseOperations for PgDatabaseAutocommit {}

impl DatabaseAutocommit for PgDatabaseAutocommit {}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> Result<Self, Box<dyn Error>> {
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;
        log::info!("connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("database migrations are up to date");

        Ok(Self { connection: pool })
    }
}

impl Database for PgDatabase {
    type Autocommit = PgDatabaseAutocommit;

    fn auto(&self) -> Self::Autocommit {
        PgDatabaseAutocommit {
            pool: self.connection.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn text_columns_have_no_length_limit() {
        // any non-empty name or username is valid, the store must not reject it
        let migrator = sqlx::migrate!("./migrations");
        for migration in migrator.iter() {
            assert!(
                !migration.sql.to_uppercase().contains("VARCHAR"),
                "{} limits a text column",
                migration.description
            );
        }
    }
}
