use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        State,
    },
    http::StatusCode,
    routing::{get, on, post},
    Extension, Json, Router,
};
use locations::{database::Database, import::MAX_ARCHIVE_SIZE, input::LocationInput};
use model::{location::Location, WithId};
use serde::Serialize;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, METHOD_FILTER_ALL},
    middleware::auth::{auth_middleware, CurrentUser},
    RouteResult, WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/locations{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

/// Name of the multipart field carrying the archive.
const FILE_FIELD: &str = "file";

/// Room for the multipart framing around a maximum sized archive.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/", get(get_locations::<D>).post(add_location::<D>))
        .route(
            "/upload",
            post(upload_locations::<D>)
                .layer(DefaultBodyLimit::max(MAX_ARCHIVE_SIZE + MULTIPART_OVERHEAD)),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<D>,
        ))
        .route("/schema", get(schema::<WithId<Location>>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_locations<D: Database>(
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
) -> RouteResult<Json<Vec<WithId<Location>>>> {
    client.get_locations(&owner).await.map(Json).map_err(|why| {
        RouteErrorResponse::from(why).with_server_error_message("Server error fetching locations")
    })
}

async fn add_location<D: Database>(
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    body: Result<Json<LocationInput>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<WithId<Location>>)> {
    let Json(input) = body?;
    client
        .add_location(&owner, input)
        .await
        .map(|location| (StatusCode::CREATED, Json(location)))
        .map_err(|why| {
            RouteErrorResponse::from(why).with_server_error_message("Server error adding location")
        })
}

#[serde_with::skip_serializing_none]
#[derive(Serialize)]
struct UploadResponse {
    message: &'static str,
    count: usize,
    locations: Vec<WithId<Location>>,
    /// Only present if lines were skipped.
    warnings: Option<Vec<String>>,
}

async fn upload_locations<D: Database>(
    State(WebState { client, .. }): State<WebState<D>>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> RouteResult<(StatusCode, Json<UploadResponse>)> {
    let archive = read_file_field(multipart?)
        .await?
        .ok_or_else(|| RouteErrorResponse::bad_request("No file uploaded"))?;

    let report = client
        .upload_locations(&owner, &archive)
        .await
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_server_error_message("Server error processing file upload")
        })?;

    let warnings = Some(report.warnings)
        .filter(|warnings| !warnings.is_empty())
        .map(|warnings| warnings.iter().map(ToString::to_string).collect());

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Locations uploaded successfully",
            count: report.locations.len(),
            locations: report.locations,
            warnings,
        }),
    ))
}

/// Content of the first `file` field. Other fields are ignored.
async fn read_file_field(mut multipart: Multipart) -> RouteResult<Option<Vec<u8>>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return Ok(Some(field.bytes().await?.to_vec()));
        }
    }
    Ok(None)
}
