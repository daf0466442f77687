//! Organization service HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware and defines the shared
//! application state injected into handlers.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::api::types::FeatureFlags;
use crate::observability;
use crate::store::OrganizationStore;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub instance_id: String,
    pub instance_domain: String,
    pub api_version: String,
    pub features: FeatureFlags,
    pub store: Arc<dyn OrganizationStore>,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route("/v1/system/info", get(api::system::system_info))
        .route("/v1/system/health", get(api::system::system_health))
        .route(
            "/v2beta/organizations",
            post(api::organizations::create_organization),
        )
        .route(
            "/v2beta/organizations/search",
            post(api::organizations::list_organizations),
        )
        .route(
            "/v2beta/organizations/snapshot",
            get(api::organizations::organization_snapshot),
        )
        .route(
            "/v2beta/organizations/changes",
            get(api::organizations::organization_changes),
        )
        .route(
            "/v2beta/organizations/:org_id",
            axum::routing::patch(api::organizations::update_organization)
                .delete(api::organizations::delete_organization),
        )
        .route(
            "/v2beta/organizations/:org_id/deactivate",
            post(api::organizations::deactivate_organization),
        )
        .route(
            "/v2beta/organizations/:org_id/reactivate",
            post(api::organizations::reactivate_organization),
        )
        .route(
            "/v2beta/organizations/:org_id/admins",
            get(api::organizations::list_organization_admins),
        )
        .route(
            "/v2beta/organizations/:org_id/domains",
            post(api::domains::add_domain),
        )
        .route(
            "/v2beta/organizations/:org_id/domains/search",
            post(api::domains::list_domains),
        )
        .route(
            "/v2beta/organizations/:org_id/domains/validation/generate",
            post(api::domains::generate_domain_validation),
        )
        .route(
            "/v2beta/organizations/:org_id/domains/:domain",
            axum::routing::delete(api::domains::delete_domain),
        )
        .route(
            "/v2beta/organizations/:org_id/domains/:domain/primary",
            post(api::domains::set_primary_domain),
        )
        .route(
            "/v2beta/organizations/:org_id/metadata",
            post(api::metadata::set_metadata).delete(api::metadata::delete_metadata),
        )
        .route(
            "/v2beta/organizations/:org_id/metadata/search",
            post(api::metadata::list_metadata),
        )
        .route("/v2beta/users/human", post(api::users::add_human_user))
        .route("/admin/v1/idps", post(api::users::add_identity_provider))
        .route(
            "/admin/v1/policies/domain",
            get(api::policies::get_domain_policy).put(api::policies::update_domain_policy),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
