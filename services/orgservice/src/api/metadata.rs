//! Organization metadata API handlers.
use crate::api::convert::metadata_view;
use crate::api::error::{ApiError, api_store_error};
use crate::api::types::{
    DeleteMetadataRequest, DetailsResponse, ListMetadataRequest, ListMetadataResponse,
    SetMetadataRequest,
};
use crate::app::AppState;
use crate::store::MetadataSearch;
use axum::Json;
use axum::extract::{Path, State};
use orgplane_object::{change_details_from_domain, to_list_details};

#[utoipa::path(
    post,
    path = "/v2beta/organizations/{org_id}/metadata",
    tag = "metadata",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    request_body = SetMetadataRequest,
    responses(
        (status = 200, description = "Metadata stored", body = DetailsResponse),
        (status = 400, description = "Empty metadata or key", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Organization not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn set_metadata(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<SetMetadataRequest>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let details = state
        .store
        .set_metadata(&org_id, body.metadata)
        .await
        .map_err(|err| api_store_error("failed to set metadata", err))?;
    Ok(Json(DetailsResponse {
        details: change_details_from_domain(&details),
    }))
}

#[utoipa::path(
    post,
    path = "/v2beta/organizations/{org_id}/metadata/search",
    tag = "metadata",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    request_body = ListMetadataRequest,
    responses(
        (status = 200, description = "Metadata of the organization", body = ListMetadataResponse),
        (status = 400, description = "Invalid filter", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_metadata(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<ListMetadataRequest>,
) -> Result<Json<ListMetadataResponse>, ApiError> {
    let result = state
        .store
        .list_metadata(
            &org_id,
            MetadataSearch {
                query: body.query,
                key: body.key,
            },
        )
        .await
        .map_err(|err| api_store_error("failed to list metadata", err))?;
    let details = to_list_details(&result.response());
    Ok(Json(ListMetadataResponse {
        details,
        metadata: result
            .items
            .into_iter()
            .map(|entry| metadata_view(entry, &org_id))
            .collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/v2beta/organizations/{org_id}/metadata",
    tag = "metadata",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    request_body = DeleteMetadataRequest,
    responses(
        (status = 200, description = "Metadata removed", body = DetailsResponse),
        (status = 400, description = "No keys given", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Organization or key not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_metadata(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<DeleteMetadataRequest>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let details = state
        .store
        .delete_metadata(&org_id, body.keys)
        .await
        .map_err(|err| api_store_error("failed to delete metadata", err))?;
    Ok(Json(DetailsResponse {
        details: change_details_from_domain(&details),
    }))
}
