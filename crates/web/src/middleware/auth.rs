use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use locations::database::Database;
use model::user::User;
use utility::id::Id;

use crate::{common::RouteErrorResponse, RouteResult, WebState};

/// The user a request was authenticated as. Inserted into the request
/// extensions by [`auth_middleware`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Id<User>);

/// Rejects requests without a valid `Authorization: Bearer` token.
pub async fn auth_middleware<D: Database>(
    State(WebState { client, .. }): State<WebState<D>>,
    authorization: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> RouteResult<Response> {
    let Some(TypedHeader(Authorization(bearer))) = authorization else {
        return Err(RouteErrorResponse::unauthorized("No token provided"));
    };

    let user = client.verify_token(bearer.token())?;
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
