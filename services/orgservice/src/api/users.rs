//! User and identity provider registration.
//!
//! # Purpose
//! Maintains the accounts and identity providers that organization admin
//! bootstrapping resolves against.
use crate::api::error::{ApiError, api_store_error};
use crate::api::types::{AddHumanUserRequest, AddHumanUserResponse, AddIdentityProviderRequest};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use orgplane_object::details_from_domain;

#[utoipa::path(
    post,
    path = "/v2beta/users/human",
    tag = "users",
    request_body = AddHumanUserRequest,
    responses(
        (status = 201, description = "User created", body = AddHumanUserResponse),
        (status = 400, description = "Invalid user", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Organization or identity provider not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Email or identity link already in use", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn add_human_user(
    State(state): State<AppState>,
    Json(body): Json<AddHumanUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let added = state
        .store
        .add_human_user(body.organization_id.as_deref(), body.human)
        .await
        .map_err(|err| api_store_error("failed to add user", err))?;
    Ok((
        StatusCode::CREATED,
        Json(AddHumanUserResponse {
            user_id: added.user_id,
            details: details_from_domain(&added.details),
            email_code: added.email_code,
            phone_code: added.phone_code,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/admin/v1/idps",
    tag = "admin",
    request_body = AddIdentityProviderRequest,
    responses(
        (status = 201, description = "Identity provider registered", body = crate::model::IdentityProvider),
        (status = 400, description = "Invalid name", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn add_identity_provider(
    State(state): State<AppState>,
    Json(body): Json<AddIdentityProviderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let provider = state
        .store
        .add_identity_provider(&body.name)
        .await
        .map_err(|err| api_store_error("failed to add identity provider", err))?;
    Ok((StatusCode::CREATED, Json(provider)))
}
