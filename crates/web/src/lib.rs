pub use crate::common::RouteResult;

use std::{path::Path, time::Instant};

use axum::{
    extract::State,
    routing::{get, get_service},
    Json, Router,
};
use chrono::Utc;
use config::WebConfig;
use locations::{client::Client, database::Database};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

pub mod api;
pub mod common;
pub mod config;
pub mod middleware;

pub struct WebState<D>
where
    D: Database,
{
    pub client: Client<D>,
    pub started_at: Instant,
}

impl<D> WebState<D>
where
    D: Database,
{
    pub fn new(client: Client<D>) -> Self {
        Self {
            client,
            started_at: Instant::now(),
        }
    }
}

impl<D> Clone for WebState<D>
where
    D: Database,
{
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            started_at: self.started_at,
        }
    }
}

/// The complete application: health check, the json api and the static
/// frontend for everything else.
pub fn router<D: Database>(state: WebState<D>, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health::<D>))
        .nest_service("/api", api::routes(state.clone()))
        .fallback_service(static_content_router(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_web_server<D: Database>(
    state: WebState<D>,
    config: WebConfig,
) -> std::io::Result<()> {
    let routes = router(state, &config.static_dir);

    let listener = TcpListener::bind(config.address).await?;
    log::info!("listening on http://{}", config.address);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

fn static_content_router(static_dir: &Path) -> Router {
    Router::new().fallback_service(get_service(
        ServeDir::new(static_dir)
            .not_found_service(ServeFile::new(static_dir.join("error404.html"))),
    ))
}

async fn health<D: Database>(
    State(WebState { started_at, .. }): State<WebState<D>>,
) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now(),
        "uptime": started_at.elapsed().as_secs_f64(),
    }))
}
