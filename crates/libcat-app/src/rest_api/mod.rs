pub mod book;
pub mod member;

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use libcat_dal::{book::Book, member::Member};
use serde::{Deserialize, Serialize};

use crate::error::ErrorBody;

crate::repository_from_request!(libcat_dal::book::BookRepository);
crate::repository_from_request!(libcat_dal::member::MemberRepository);

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Outcome {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookOutcome {
    pub message: String,
    pub book: Book,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MemberOutcome {
    pub message: String,
    pub member: Member,
}

impl Outcome {
    pub fn new(message: &str) -> Self {
        Outcome {
            message: message.to_string(),
        }
    }
}

impl BookOutcome {
    pub fn new(message: &str, book: Book) -> Self {
        BookOutcome {
            message: message.to_string(),
            book,
        }
    }
}

impl MemberOutcome {
    pub fn new(message: &str, member: Member) -> Self {
        MemberOutcome {
            message: message.to_string(),
            member,
        }
    }
}

/// Fallback for unmatched routes
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found", None)))
}

/// Response for panic caught in a handler, use with `tower_http::catch_panic::CatchPanicLayer::custom`
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    tracing::error!("Request handler panicked: {detail}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("Internal server error", Some(detail))),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use http::Request;
    use tower::ServiceExt as _;
    use tower_http::catch_panic::CatchPanicLayer;

    async fn boom() -> &'static str {
        panic!("shelf collapsed")
    }

    async fn body_json(response: Response) -> ErrorBody {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_panic_becomes_500() {
        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response));

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.error.as_deref(), Some("shelf collapsed"));
        assert!(logs_contain("Request handler panicked"));
    }

    #[tokio::test]
    async fn test_fallback() {
        let app: Router = Router::new().fallback(not_found);
        let response = app
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await.message, "Not found");
    }
}
