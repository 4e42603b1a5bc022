use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{delete, post, put},
    Json,
};
use garde::Validate;
use http::StatusCode;
use libcat_dal::member::{CreateMember, MemberRepository};
use libcat_types::general::lenient_string;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{ApiContext as _, ApiResult},
    rest_api::{MemberOutcome, Outcome},
    state::AppState,
    validate::{require_valid, JsonBody},
};

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(add_member, update_member, delete_member))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

/// All fields must be present, only `name` is stored (as borrower)
#[derive(Debug, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AddMemberRequest {
    #[garde(required, length(min = 1))]
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub name: Option<String>,
    #[garde(required, length(min = 1))]
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub mobile: Option<String>,
    #[garde(required, length(min = 1))]
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateMemberRequest {
    /// New borrower name, kept as is when missing
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub name: Option<String>,
    /// Accepted, not recorded
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub mobile: Option<String>,
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/add", tag = "Member", operation_id = "addMember",
    request_body = AddMemberRequest,
    responses((status = StatusCode::OK, description = "Added member", body = MemberOutcome),
        (status = StatusCode::BAD_REQUEST, description = "Error", body = crate::error::ErrorBody),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Error", body = crate::error::ErrorBody))))]
pub async fn add_member(
    members: MemberRepository,
    JsonBody(request): JsonBody<AddMemberRequest>,
) -> ApiResult<impl IntoResponse> {
    require_valid(&request, "All fields are required")?;

    let member = members
        .create(CreateMember {
            borrower: request.name,
            ..Default::default()
        })
        .await
        .or_internal("Error adding member")?;
    debug!("Added member {}", member.id);

    Ok((
        StatusCode::OK,
        Json(MemberOutcome::new("Member added successfully", member)),
    ))
}

#[cfg_attr(feature = "openapi", utoipa::path(put, path = "/update/{id}", tag = "Member", operation_id = "updateMember",
    params(("id" = String, Path, description = "Member id")),
    request_body = UpdateMemberRequest,
    responses((status = StatusCode::OK, description = "Updated member", body = MemberOutcome),
        (status = StatusCode::NOT_FOUND, description = "Error", body = crate::error::ErrorBody),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Error", body = crate::error::ErrorBody))))]
pub async fn update_member(
    Path(id): Path<String>,
    members: MemberRepository,
    JsonBody(request): JsonBody<UpdateMemberRequest>,
) -> ApiResult<impl IntoResponse> {
    debug!("Updating member {id}, mobile {:?} ignored", request.mobile);
    let member = members
        .update_borrower(&id, request.name.as_deref())
        .await
        .or_api_error("Error updating member")?;

    Ok((
        StatusCode::OK,
        Json(MemberOutcome::new("Member updated successfully", member)),
    ))
}

#[cfg_attr(feature = "openapi", utoipa::path(delete, path = "/delete/{id}", tag = "Member", operation_id = "deleteMember",
    params(("id" = String, Path, description = "Member id")),
    responses((status = StatusCode::OK, description = "Deleted", body = Outcome),
        (status = StatusCode::NOT_FOUND, description = "Error", body = crate::error::ErrorBody),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Error", body = crate::error::ErrorBody))))]
pub async fn delete_member(
    Path(id): Path<String>,
    members: MemberRepository,
) -> ApiResult<impl IntoResponse> {
    members
        .delete(&id)
        .await
        .or_api_error("Error deleting member")?;
    Ok((
        StatusCode::OK,
        Json(Outcome::new("Member deleted successfully")),
    ))
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/add", post(add_member))
        .route("/update/{id}", put(update_member))
        .route("/delete/{id}", delete(delete_member))
}
