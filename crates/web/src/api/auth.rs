use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{on, post},
    Json, Router,
};
use locations::{
    database::Database,
    input::{Credentials, Registration},
};
use model::{user::User, WithId};
use serde::Serialize;
use utility::id::Id;

use crate::{
    common::{route_not_found, RouteErrorResponse, METHOD_FILTER_ALL},
    RouteResult, WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/auth{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/register", post(register::<D>))
        .route("/login", post(login::<D>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize)]
struct RegisterResponse {
    message: &'static str,
    user: WithId<User>,
}

async fn register<D: Database>(
    State(WebState { client, .. }): State<WebState<D>>,
    body: Result<Json<Registration>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(registration) = body?;
    let user = client.register(registration).await.map_err(|why| {
        RouteErrorResponse::from(why)
            .with_server_error_message("Server error during registration")
    })?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            user,
        }),
    ))
}

/// The user as returned on login, without the registration date.
#[derive(Serialize)]
struct LoginUser {
    id: Id<User>,
    username: String,
    email: String,
}

#[derive(Serialize)]
struct LoginResponse {
    message: &'static str,
    token: String,
    user: LoginUser,
}

async fn login<D: Database>(
    State(WebState { client, .. }): State<WebState<D>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> RouteResult<Json<LoginResponse>> {
    let Json(credentials) = body?;
    let session = client.login(credentials).await.map_err(|why| {
        RouteErrorResponse::from(why).with_server_error_message("Server error during login")
    })?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        token: session.token,
        user: LoginUser {
            id: session.user.id,
            username: session.user.content.username,
            email: session.user.content.email,
        },
    }))
}
