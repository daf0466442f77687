//! Organization API handlers.
//!
//! # Purpose
//! Implements organization create/update/search/delete, the state
//! transitions, admin listing and the snapshot/changefeed endpoints.
use crate::api::convert::organization_view;
use crate::api::error::{ApiError, api_internal, api_store_error};
use crate::api::types::{
    CreateOrganizationRequest, CreateOrganizationResponse, DetailsResponse,
    ListOrganizationAdminsResponse, ListOrganizationsRequest, ListOrganizationsResponse,
    OrganizationChangesResponse, OrganizationSnapshotResponse, UpdateOrganizationRequest,
};
use crate::app::AppState;
use crate::store::{CreateOrganization, OrganizationSearch};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use orgplane_object::{change_details_from_domain, details_from_domain, to_list_details};
use std::collections::HashMap;

#[utoipa::path(
    post,
    path = "/v2beta/organizations",
    tag = "organizations",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Organization created", body = CreateOrganizationResponse),
        (status = 400, description = "Invalid name or admin", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Referenced user or identity provider not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Organization already exists", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_organization(
    State(state): State<AppState>,
    Json(body): Json<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .store
        .create_organization(CreateOrganization {
            name: body.name,
            org_id: body.organization_id,
            admins: body.admins,
        })
        .await
        .map_err(|err| api_store_error("failed to create organization", err))?;
    tracing::info!(
        org_id = %created.id,
        admins = created.created_admins.len(),
        "organization created"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateOrganizationResponse {
            details: details_from_domain(&created.details),
            organization_id: created.id,
            created_admins: created.created_admins,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/v2beta/organizations/{org_id}",
    tag = "organizations",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    request_body = UpdateOrganizationRequest,
    responses(
        (status = 200, description = "Organization updated", body = DetailsResponse),
        (status = 400, description = "Invalid name", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Organization not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_organization(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<UpdateOrganizationRequest>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let details = state
        .store
        .update_organization(&org_id, &body.name)
        .await
        .map_err(|err| api_store_error("failed to update organization", err))?;
    Ok(Json(DetailsResponse {
        details: change_details_from_domain(&details),
    }))
}

#[utoipa::path(
    post,
    path = "/v2beta/organizations/search",
    tag = "organizations",
    request_body = ListOrganizationsRequest,
    responses(
        (status = 200, description = "Matching organizations", body = ListOrganizationsResponse),
        (status = 400, description = "Invalid filter", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_organizations(
    State(state): State<AppState>,
    Json(body): Json<ListOrganizationsRequest>,
) -> Result<Json<ListOrganizationsResponse>, ApiError> {
    let sorting_column = body.sorting_column;
    let result = state
        .store
        .list_organizations(OrganizationSearch {
            query: body.query,
            sorting_column,
            filters: body.queries,
        })
        .await
        .map_err(|err| api_store_error("failed to list organizations", err))?;
    let details = to_list_details(&result.response());
    Ok(Json(ListOrganizationsResponse {
        details,
        sorting_column,
        result: result.items.into_iter().map(organization_view).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/v2beta/organizations/{org_id}",
    tag = "organizations",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    responses(
        (status = 200, description = "Organization deleted", body = DetailsResponse),
        (status = 404, description = "Organization not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_organization(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let details = state
        .store
        .delete_organization(&org_id)
        .await
        .map_err(|err| api_store_error("failed to delete organization", err))?;
    tracing::info!(%org_id, "organization deleted");
    Ok(Json(DetailsResponse {
        details: change_details_from_domain(&details),
    }))
}

#[utoipa::path(
    post,
    path = "/v2beta/organizations/{org_id}/deactivate",
    tag = "organizations",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    responses(
        (status = 200, description = "Organization deactivated", body = DetailsResponse),
        (status = 404, description = "Organization not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Organization already inactive", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn deactivate_organization(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let details = state
        .store
        .deactivate_organization(&org_id)
        .await
        .map_err(|err| api_store_error("failed to deactivate organization", err))?;
    Ok(Json(DetailsResponse {
        details: change_details_from_domain(&details),
    }))
}

#[utoipa::path(
    post,
    path = "/v2beta/organizations/{org_id}/reactivate",
    tag = "organizations",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    responses(
        (status = 200, description = "Organization reactivated", body = DetailsResponse),
        (status = 404, description = "Organization not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Organization already active", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn reactivate_organization(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let details = state
        .store
        .reactivate_organization(&org_id)
        .await
        .map_err(|err| api_store_error("failed to reactivate organization", err))?;
    Ok(Json(DetailsResponse {
        details: change_details_from_domain(&details),
    }))
}

#[utoipa::path(
    get,
    path = "/v2beta/organizations/{org_id}/admins",
    tag = "organizations",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    responses(
        (status = 200, description = "Admin memberships", body = ListOrganizationAdminsResponse),
        (status = 404, description = "Organization not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_organization_admins(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ListOrganizationAdminsResponse>, ApiError> {
    let admins = state
        .store
        .list_organization_admins(&org_id)
        .await
        .map_err(|err| api_store_error("failed to list organization admins", err))?;
    Ok(Json(ListOrganizationAdminsResponse { admins }))
}

#[utoipa::path(
    get,
    path = "/v2beta/organizations/snapshot",
    tag = "organizations",
    responses(
        (status = 200, description = "Full organization snapshot", body = OrganizationSnapshotResponse)
    )
)]
pub(crate) async fn organization_snapshot(
    State(state): State<AppState>,
) -> Result<Json<OrganizationSnapshotResponse>, ApiError> {
    let snapshot = state
        .store
        .organization_snapshot()
        .await
        .map_err(|err| api_internal("failed to load organization snapshot", &err))?;
    Ok(Json(OrganizationSnapshotResponse {
        items: snapshot.items,
        next_seq: snapshot.next_seq,
    }))
}

#[utoipa::path(
    get,
    path = "/v2beta/organizations/changes",
    tag = "organizations",
    params(
        ("since" = Option<u64>, Query, description = "Last seen sequence")
    ),
    responses(
        (status = 200, description = "Organization change list", body = OrganizationChangesResponse)
    )
)]
pub(crate) async fn organization_changes(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Result<Json<OrganizationChangesResponse>, ApiError> {
    let since = params
        .get("since")
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(0);
    let changes = state
        .store
        .organization_changes(since)
        .await
        .map_err(|err| api_internal("failed to load organization changes", &err))?;
    Ok(Json(OrganizationChangesResponse {
        items: changes.items,
        next_seq: changes.next_seq,
    }))
}
