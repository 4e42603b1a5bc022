use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{delete, get, post},
    Json,
};
use http::StatusCode;
use libcat_dal::{
    book::BookRepository,
    member::{CreateMember, MemberRepository},
};
use libcat_types::{
    general::{lenient_string, lenient_timestamp},
    STATUS_AVAILABLE, STATUS_ISSUED,
};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::debug;

use crate::{
    error::{ApiContext as _, ApiError, ApiResult},
    rest_api::{BookOutcome, Outcome},
    state::AppState,
    validate::JsonBody,
};

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(list_available, get_by_isbn, issue, return_book, delete_book))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub borrower: Option<String>,
    /// Accepted, not recorded
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub mobile: Option<String>,
    /// RFC 3339 timestamp, YYYY-MM-DD or epoch milliseconds, stored as member's return date
    #[serde(default, deserialize_with = "lenient_timestamp::deserialize")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub due_date: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReturnRequest {
    /// Identifies member record by its borrower
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub mobile: Option<String>,
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/available", tag = "Book", operation_id = "listAvailableBooks",
    responses((status = StatusCode::OK, description = "Books with Available status", body = Vec<libcat_dal::book::Book>),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Error", body = crate::error::ErrorBody))))]
pub async fn list_available(books: BookRepository) -> ApiResult<impl IntoResponse> {
    let records = books
        .list_available()
        .await
        .or_internal("Error fetching books")?;
    Ok((StatusCode::OK, Json(records)))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/{isbn}", tag = "Book", operation_id = "getBookByIsbn",
    params(("isbn" = String, Path, description = "ISBN of the book")),
    responses((status = StatusCode::OK, description = "Book", body = libcat_dal::book::Book),
        (status = StatusCode::NOT_FOUND, description = "Error", body = crate::error::ErrorBody),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Error", body = crate::error::ErrorBody))))]
pub async fn get_by_isbn(
    Path(isbn): Path<String>,
    books: BookRepository,
) -> ApiResult<impl IntoResponse> {
    let book = books
        .find_by_isbn(&isbn)
        .await
        .or_internal("Error fetching book")?
        .ok_or_else(|| ApiError::NotFound("Book not found".to_string()))?;
    Ok((StatusCode::OK, Json(book)))
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/issue/{id}", tag = "Book", operation_id = "issueBook",
    params(("id" = String, Path, description = "Book id")),
    request_body = IssueRequest,
    responses((status = StatusCode::OK, description = "Issued book", body = BookOutcome),
        (status = StatusCode::BAD_REQUEST, description = "Error", body = crate::error::ErrorBody),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Error", body = crate::error::ErrorBody))))]
pub async fn issue(
    Path(id): Path<String>,
    books: BookRepository,
    members: MemberRepository,
    JsonBody(request): JsonBody<IssueRequest>,
) -> ApiResult<impl IntoResponse> {
    const FAILURE: &str = "Error issuing book";
    let mut book = match books.find(&id).await.or_internal(FAILURE)? {
        Some(book) if book.is_available() => book,
        _ => {
            return Err(ApiError::InvalidRequest(
                "Book not available for issue".to_string(),
            ))
        }
    };
    debug!(
        "Issuing book {} to {:?} (mobile {:?})",
        book.id, request.borrower, request.mobile
    );

    // Status stays Available on issue, only borrower is recorded
    book.status = STATUS_AVAILABLE.to_string();
    book.borrower = request.borrower.clone();
    let book = books.save(&book).await.or_internal(FAILURE)?;

    // Separate write, book above stays updated if this fails
    members
        .create(CreateMember {
            book_id: Some(book.id),
            borrower: request.borrower,
            issue_date: None,
            return_date: request.due_date,
        })
        .await
        .or_internal(FAILURE)?;

    Ok((
        StatusCode::OK,
        Json(BookOutcome::new("Book issued successfully", book)),
    ))
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/return/{id}", tag = "Book", operation_id = "returnBook",
    params(("id" = String, Path, description = "Book id")),
    request_body = ReturnRequest,
    responses((status = StatusCode::OK, description = "Returned book", body = BookOutcome),
        (status = StatusCode::BAD_REQUEST, description = "Error", body = crate::error::ErrorBody),
        (status = StatusCode::NOT_FOUND, description = "Error", body = crate::error::ErrorBody),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Error", body = crate::error::ErrorBody))))]
pub async fn return_book(
    Path(id): Path<String>,
    books: BookRepository,
    members: MemberRepository,
    JsonBody(request): JsonBody<ReturnRequest>,
) -> ApiResult<impl IntoResponse> {
    const FAILURE: &str = "Error returning book";
    let mut book = match books.find(&id).await.or_internal(FAILURE)? {
        Some(book) if book.is_available() => book,
        _ => return Err(ApiError::InvalidRequest("Book not issued".to_string())),
    };

    book.status = STATUS_ISSUED.to_string();
    book.borrower = None;
    let book = books.save(&book).await.or_internal(FAILURE)?;

    let member = match request.mobile.as_deref() {
        Some(mobile) => members
            .find_by_book_and_borrower(book.id, mobile)
            .await
            .or_internal(FAILURE)?,
        None => None,
    }
    .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    members
        .set_return_date(member.id, OffsetDateTime::now_utc())
        .await
        .or_internal(FAILURE)?;
    debug!("Book {} returned by member record {}", book.id, member.id);

    Ok((
        StatusCode::OK,
        Json(BookOutcome::new("Book returned successfully", book)),
    ))
}

#[cfg_attr(feature = "openapi", utoipa::path(delete, path = "/delete/{id}", tag = "Book", operation_id = "deleteBook",
    params(("id" = String, Path, description = "Book id or ISBN")),
    responses((status = StatusCode::OK, description = "Deleted", body = Outcome),
        (status = StatusCode::NOT_FOUND, description = "Error", body = crate::error::ErrorBody),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Error", body = crate::error::ErrorBody))))]
pub async fn delete_book(
    Path(id): Path<String>,
    books: BookRepository,
) -> ApiResult<impl IntoResponse> {
    books
        .delete_by_id_or_isbn(&id)
        .await
        .or_api_error("Error deleting book")?;
    Ok((StatusCode::OK, Json(Outcome::new("Book deleted successfully"))))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/available", get(list_available))
        .route("/{isbn}", get(get_by_isbn))
        .route("/issue/{id}", post(issue))
        .route("/return/{id}", post(return_book))
        .route("/delete/{id}", delete(delete_book))
}
