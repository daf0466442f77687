//! Instance domain policy handlers.
use crate::api::error::{ApiError, api_internal, api_store_error};
use crate::api::types::{DetailsResponse, DomainPolicyResponse};
use crate::app::AppState;
use crate::model::DomainPolicy;
use axum::Json;
use axum::extract::State;
use orgplane_object::change_details_from_domain;

#[utoipa::path(
    get,
    path = "/admin/v1/policies/domain",
    tag = "admin",
    responses(
        (status = 200, description = "Current domain policy", body = DomainPolicyResponse)
    )
)]
pub(crate) async fn get_domain_policy(
    State(state): State<AppState>,
) -> Result<Json<DomainPolicyResponse>, ApiError> {
    let policy = state
        .store
        .domain_policy()
        .await
        .map_err(|err| api_internal("failed to load domain policy", &err))?;
    Ok(Json(DomainPolicyResponse { policy }))
}

#[utoipa::path(
    put,
    path = "/admin/v1/policies/domain",
    tag = "admin",
    request_body = DomainPolicy,
    responses(
        (status = 200, description = "Domain policy updated", body = DetailsResponse),
        (status = 409, description = "Policy unchanged", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_domain_policy(
    State(state): State<AppState>,
    Json(policy): Json<DomainPolicy>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let details = state
        .store
        .update_domain_policy(policy)
        .await
        .map_err(|err| api_store_error("failed to update domain policy", err))?;
    tracing::info!(
        validate_org_domains = policy.validate_org_domains,
        "domain policy updated"
    );
    Ok(Json(DetailsResponse {
        details: change_details_from_domain(&details),
    }))
}
