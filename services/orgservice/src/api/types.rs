//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the payload shapes of the organization REST API and feeds OpenAPI
//! schema generation. Write responses carry [`Details`], list responses
//! carry [`ListDetails`].
use crate::model::{
    AdminSpec, CreatedAdmin, DomainPolicy, HumanAdmin, MetadataEntry, OrgAdmin, Organization,
    OrganizationChange, OrganizationState,
};
use crate::store::{DomainFilter, OrganizationFilter, OrganizationSortingColumn};
use orgplane_object::{Details, ListDetails, ListQuery, TextFilter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct FeatureFlags {
    pub durable_storage: bool,
    pub idempotent_state_transitions: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub instance_id: String,
    pub instance_domain: String,
    pub api_version: String,
    pub features: FeatureFlags,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

/// Response of writes that return nothing but their details.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DetailsResponse {
    pub details: Details,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CreateOrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub admins: Vec<AdminSpec>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CreateOrganizationResponse {
    pub details: Details,
    pub organization_id: String,
    pub created_admins: Vec<CreatedAdmin>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UpdateOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone)]
pub struct ListOrganizationsRequest {
    #[serde(default)]
    pub query: Option<ListQuery>,
    #[serde(default)]
    pub sorting_column: OrganizationSortingColumn,
    /// AND-combined filters.
    #[serde(default)]
    pub queries: Vec<OrganizationFilter>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrganizationView {
    pub id: String,
    pub name: String,
    pub state: OrganizationState,
    pub primary_domain: String,
    pub details: Details,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ListOrganizationsResponse {
    pub details: ListDetails,
    pub sorting_column: OrganizationSortingColumn,
    pub result: Vec<OrganizationView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ListOrganizationAdminsResponse {
    pub admins: Vec<OrgAdmin>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrganizationSnapshotResponse {
    pub items: Vec<Organization>,
    pub next_seq: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrganizationChangesResponse {
    pub items: Vec<OrganizationChange>,
    pub next_seq: u64,
}

/// Wire form of the domain validation type; unknown names decode as
/// unspecified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DomainValidationType {
    #[serde(rename = "DOMAIN_VALIDATION_TYPE_DNS")]
    Dns,
    #[serde(rename = "DOMAIN_VALIDATION_TYPE_HTTP")]
    Http,
    #[default]
    #[serde(rename = "DOMAIN_VALIDATION_TYPE_UNSPECIFIED", other)]
    Unspecified,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AddDomainRequest {
    pub domain: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone)]
pub struct ListDomainsRequest {
    #[serde(default)]
    pub query: Option<ListQuery>,
    #[serde(default)]
    pub filters: Vec<DomainFilter>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DomainView {
    pub organization_id: String,
    pub domain_name: String,
    pub is_verified: bool,
    pub is_primary: bool,
    pub validation_type: DomainValidationType,
    pub details: Details,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ListDomainsResponse {
    pub details: ListDetails,
    pub domains: Vec<DomainView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GenerateDomainValidationRequest {
    pub domain: String,
    #[serde(rename = "type", default)]
    pub validation_type: DomainValidationType,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct GenerateDomainValidationResponse {
    pub token: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SetMetadataRequest {
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Clone)]
pub struct ListMetadataRequest {
    #[serde(default)]
    pub query: Option<ListQuery>,
    #[serde(default)]
    pub key: Option<TextFilter>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct MetadataView {
    pub key: String,
    #[serde(with = "crate::model::base64_bytes")]
    #[schema(value_type = String, format = Byte)]
    pub value: Vec<u8>,
    pub details: Details,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ListMetadataResponse {
    pub details: ListDetails,
    pub metadata: Vec<MetadataView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DeleteMetadataRequest {
    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DomainPolicyResponse {
    pub policy: DomainPolicy,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AddHumanUserRequest {
    #[serde(default)]
    pub organization_id: Option<String>,
    pub human: HumanAdmin,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AddHumanUserResponse {
    pub user_id: String,
    pub details: Details,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AddIdentityProviderRequest {
    pub name: String,
}
