use axum::{
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use ::locations::database::Database;
use serde_json::json;

pub mod auth;
pub mod locations;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        format!("/api{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/", get(index))
        .nest_service("/auth", auth::routes(state.clone()))
        .nest_service("/locations", locations::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Location App API is running!",
        "endpoints": {
            "auth": {
                "register": format!("POST {}", auth::resource!("/register")),
                "login": format!("POST {}", auth::resource!("/login")),
            },
            "locations": {
                "getAll": format!("GET {}", locations::resource!("")),
                "create": format!("POST {}", locations::resource!("")),
                "upload": format!("POST {}", locations::resource!("/upload")),
                "schema": format!("GET {}", locations::resource!("/schema")),
            }
        }
    }))
}
