use axum::extract::{FromRequest, Request};
use axum::Json;
use garde::Validate;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// JSON request body that must be present and well formed.
///
/// Anything else (no body, wrong content type, malformed JSON, wrong shape)
/// is rejected with 400 and `Invalid request body` message.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                debug!("Rejected request body: {rejection}");
                Err(ApiError::InvalidBody(rejection.body_text()))
            }
        }
    }
}

/// Runs garde validation, any failure is reported as single `message`
pub fn require_valid<T>(payload: &T, message: &str) -> Result<(), ApiError>
where
    T: Validate<Context = ()>,
{
    payload.validate().map_err(|report| {
        debug!("Validation failed: {report}");
        ApiError::InvalidRequest(message.to_string())
    })
}
