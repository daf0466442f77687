//! Organization domain API handlers.
//!
//! # Purpose
//! Adds, removes and lists the domains of an organization, issues ownership
//! validation challenges and promotes verified domains to primary.
use crate::api::convert::domain_view;
use crate::api::error::{ApiError, api_store_error};
use crate::api::types::{
    AddDomainRequest, DetailsResponse, GenerateDomainValidationRequest,
    GenerateDomainValidationResponse, ListDomainsRequest, ListDomainsResponse,
};
use crate::app::AppState;
use crate::store::DomainSearch;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use orgplane_object::{change_details_from_domain, to_list_details};

#[utoipa::path(
    post,
    path = "/v2beta/organizations/{org_id}/domains",
    tag = "domains",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    request_body = AddDomainRequest,
    responses(
        (status = 201, description = "Domain added", body = DetailsResponse),
        (status = 400, description = "Invalid domain", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Organization not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Domain already exists", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn add_domain(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<AddDomainRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state
        .store
        .add_domain(&org_id, &body.domain)
        .await
        .map_err(|err| api_store_error("failed to add domain", err))?;
    Ok((
        StatusCode::CREATED,
        Json(DetailsResponse {
            details: change_details_from_domain(&details),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/v2beta/organizations/{org_id}/domains/{domain}",
    tag = "domains",
    params(
        ("org_id" = String, Path, description = "Organization identifier"),
        ("domain" = String, Path, description = "Domain name")
    ),
    responses(
        (status = 200, description = "Domain removed", body = DetailsResponse),
        (status = 404, description = "Organization or domain not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Primary domain cannot be removed", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_domain(
    Path((org_id, domain)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let details = state
        .store
        .delete_domain(&org_id, &domain)
        .await
        .map_err(|err| api_store_error("failed to delete domain", err))?;
    Ok(Json(DetailsResponse {
        details: change_details_from_domain(&details),
    }))
}

#[utoipa::path(
    post,
    path = "/v2beta/organizations/{org_id}/domains/search",
    tag = "domains",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    request_body = ListDomainsRequest,
    responses(
        (status = 200, description = "Domains of the organization", body = ListDomainsResponse),
        (status = 400, description = "Invalid filter", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_domains(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<ListDomainsRequest>,
) -> Result<Json<ListDomainsResponse>, ApiError> {
    let result = state
        .store
        .list_domains(
            &org_id,
            DomainSearch {
                query: body.query,
                filters: body.filters,
            },
        )
        .await
        .map_err(|err| api_store_error("failed to list domains", err))?;
    let details = to_list_details(&result.response());
    Ok(Json(ListDomainsResponse {
        details,
        domains: result.items.into_iter().map(domain_view).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/v2beta/organizations/{org_id}/domains/validation/generate",
    tag = "domains",
    params(
        ("org_id" = String, Path, description = "Organization identifier")
    ),
    request_body = GenerateDomainValidationRequest,
    responses(
        (status = 200, description = "Validation challenge", body = GenerateDomainValidationResponse),
        (status = 400, description = "Validation type missing", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Organization or domain not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Domain already verified", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn generate_domain_validation(
    Path(org_id): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<GenerateDomainValidationRequest>,
) -> Result<Json<GenerateDomainValidationResponse>, ApiError> {
    let validation = state
        .store
        .generate_domain_validation(&org_id, &body.domain, body.validation_type.into())
        .await
        .map_err(|err| api_store_error("failed to generate domain validation", err))?;
    Ok(Json(GenerateDomainValidationResponse {
        token: validation.token,
        url: validation.url,
    }))
}

#[utoipa::path(
    post,
    path = "/v2beta/organizations/{org_id}/domains/{domain}/primary",
    tag = "domains",
    params(
        ("org_id" = String, Path, description = "Organization identifier"),
        ("domain" = String, Path, description = "Domain name")
    ),
    responses(
        (status = 200, description = "Primary domain set", body = DetailsResponse),
        (status = 404, description = "Organization or domain not found", body = crate::api::types::ErrorResponse),
        (status = 409, description = "Domain not verified", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn set_primary_domain(
    Path((org_id, domain)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<DetailsResponse>, ApiError> {
    let details = state
        .store
        .set_primary_domain(&org_id, &domain)
        .await
        .map_err(|err| api_store_error("failed to set primary domain", err))?;
    Ok(Json(DetailsResponse {
        details: change_details_from_domain(&details),
    }))
}
