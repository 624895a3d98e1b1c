use std::error::Error;

use database::{DatabaseConnectionInfo, PgDatabase};
use locations::{
    auth::{AuthConfig, Authenticator},
    client::Client,
};
use web::{config::WebConfig, start_web_server, WebState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // configuration
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .ok_or("expected database connection info in env.")?;
    let auth_config = AuthConfig::from_env().ok_or("expected JWT_SECRET in env.")?;
    let web_config =
        WebConfig::from_env().ok_or("could not parse BIND_ADDRESS or PORT from env.")?;

    // database
    let database = PgDatabase::connect(database_connection_info).await?;

    // web server
    let client = Client::new(database, Authenticator::new(auth_config));
    start_web_server(WebState::new(client), web_config).await?;

    Ok(())
}
