use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}: {source}")]
    Internal {
        message: String,
        #[source]
        source: libcat_dal::Error,
    },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, source: libcat_dal::Error) -> Self {
        ApiError::Internal {
            message: message.into(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>, error: Option<String>) -> Self {
        ErrorBody {
            message: message.into(),
            error,
        }
    }
}

impl From<ApiError> for ErrorBody {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidRequest(message) | ApiError::NotFound(message) => {
                ErrorBody::new(message, None)
            }
            ApiError::InvalidBody(detail) => ErrorBody::new("Invalid request body", Some(detail)),
            ApiError::Internal { message, source } => {
                ErrorBody::new(message, Some(source.to_string()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ApiError::Internal { message, source } = &self {
            tracing::error!("{message}: {source}");
        }
        (status, Json(ErrorBody::from(self))).into_response()
    }
}

pub trait ApiContext<T> {
    /// Missing record becomes 404 ("<Record> not found"), anything else 500 with `message`
    fn or_api_error(self, message: &str) -> ApiResult<T>;
    /// Any failure is 500 with `message`
    fn or_internal(self, message: &str) -> ApiResult<T>;
}

impl<T> ApiContext<T> for Result<T, libcat_dal::Error> {
    fn or_api_error(self, message: &str) -> ApiResult<T> {
        self.map_err(|e| match e {
            libcat_dal::Error::RecordNotFound(what) => {
                ApiError::NotFound(format!("{what} not found"))
            }
            other => ApiError::internal(message, other),
        })
    }

    fn or_internal(self, message: &str) -> ApiResult<T> {
        self.map_err(|e| ApiError::internal(message, e))
    }
}
