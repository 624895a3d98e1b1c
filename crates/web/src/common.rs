use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        OriginalUri, Query, Request,
    },
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use locations::RequestError;
use model::ExampleData;
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responeses -

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    pub error: String,

    /// Per line messages of a rejected upload.
    pub details: Option<Vec<String>>,

    pub http_method: Option<String>,

    pub requested_uri: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            error: status_code
                .canonical_reason()
                .unwrap_or("i dunno what happened here :/")
                .to_owned(),
            details: None,
            http_method: None,
            requested_uri: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_message(message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED).with_message(message)
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_message("Route not found")
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error = message.into();
        self
    }

    pub fn with_details(mut self, details: Option<Vec<String>>) -> Self {
        self.details = details;
        self
    }

    /// Replaces the message of internal server errors only. Client errors
    /// keep their more specific message.
    pub fn with_server_error_message(self, message: impl Into<String>) -> Self {
        if self.status_code.is_server_error() {
            self.with_message(message)
        } else {
            self
        }
    }
}

impl From<RequestError> for RouteErrorResponse {
    fn from(value: RequestError) -> Self {
        match value {
            RequestError::NotFound => {
                Self::new(StatusCode::NOT_FOUND).with_message("The requested item does not exist.")
            }
            RequestError::InvalidInput(message) | RequestError::AlreadyExists(message) => {
                Self::bad_request(message)
            }
            RequestError::Unauthorized(message) => Self::unauthorized(message),
            RequestError::Import(why) => {
                let details = why.details();
                Self::bad_request(why.to_string()).with_details(details)
            }
            RequestError::Other(other) => {
                log::error!("request failed: {}", other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_message("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for RouteErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status()).with_message(rejection.body_text())
    }
}

impl From<MultipartRejection> for RouteErrorResponse {
    fn from(rejection: MultipartRejection) -> Self {
        Self::new(rejection.status()).with_message(rejection.body_text())
    }
}

impl From<MultipartError> for RouteErrorResponse {
    fn from(why: MultipartError) -> Self {
        match why.status() {
            StatusCode::PAYLOAD_TOO_LARGE => {
                Self::bad_request(locations::import::ImportError::TooLarge.to_string())
            }
            status => Self::new(status).with_message(why.body_text()),
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}
