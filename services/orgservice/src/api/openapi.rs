//! OpenAPI schema aggregation for the organization API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for docs
//! and client generation.
use crate::api::{
    domains, metadata, organizations, policies, system,
    types::{
        AddDomainRequest, AddHumanUserRequest, AddHumanUserResponse, AddIdentityProviderRequest,
        CreateOrganizationRequest, CreateOrganizationResponse, DeleteMetadataRequest,
        DetailsResponse, DomainPolicyResponse, DomainValidationType, DomainView, ErrorResponse,
        FeatureFlags, GenerateDomainValidationRequest, GenerateDomainValidationResponse,
        HealthStatus, ListDomainsRequest, ListDomainsResponse, ListMetadataRequest,
        ListMetadataResponse, ListOrganizationAdminsResponse, ListOrganizationsRequest,
        ListOrganizationsResponse, MetadataView, OrganizationChangesResponse,
        OrganizationSnapshotResponse, OrganizationView, SetMetadataRequest, SystemInfo,
        UpdateOrganizationRequest,
    },
    users,
};
use crate::model::{
    AdminSpec, CreatedAdmin, DomainPolicy, EmailVerification, HumanAdmin, IdentityProvider,
    IdpLink, MetadataEntry, OrgAdmin, Organization, OrganizationChange, OrganizationChangeOp,
    OrganizationState, PhoneSpec,
};
use crate::store::{DomainFilter, OrganizationFilter, OrganizationSortingColumn};
use orgplane_object::{Details, ListDetails, ListQuery, TextFilter, TextMethod, TextQueryMethod};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "orgservice",
        version = "v2beta",
        description = "Organization lifecycle HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        organizations::create_organization,
        organizations::update_organization,
        organizations::list_organizations,
        organizations::delete_organization,
        organizations::deactivate_organization,
        organizations::reactivate_organization,
        organizations::list_organization_admins,
        organizations::organization_snapshot,
        organizations::organization_changes,
        domains::add_domain,
        domains::delete_domain,
        domains::list_domains,
        domains::generate_domain_validation,
        domains::set_primary_domain,
        metadata::set_metadata,
        metadata::list_metadata,
        metadata::delete_metadata,
        policies::get_domain_policy,
        policies::update_domain_policy,
        users::add_human_user,
        users::add_identity_provider
    ),
    components(schemas(
        FeatureFlags,
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        Details,
        ListDetails,
        ListQuery,
        TextFilter,
        TextMethod,
        TextQueryMethod,
        DetailsResponse,
        Organization,
        OrganizationState,
        OrganizationChange,
        OrganizationChangeOp,
        OrganizationView,
        OrganizationFilter,
        OrganizationSortingColumn,
        CreateOrganizationRequest,
        CreateOrganizationResponse,
        UpdateOrganizationRequest,
        ListOrganizationsRequest,
        ListOrganizationsResponse,
        ListOrganizationAdminsResponse,
        OrganizationSnapshotResponse,
        OrganizationChangesResponse,
        OrgAdmin,
        AdminSpec,
        HumanAdmin,
        PhoneSpec,
        EmailVerification,
        IdpLink,
        CreatedAdmin,
        DomainFilter,
        DomainValidationType,
        DomainView,
        AddDomainRequest,
        ListDomainsRequest,
        ListDomainsResponse,
        GenerateDomainValidationRequest,
        GenerateDomainValidationResponse,
        MetadataEntry,
        MetadataView,
        SetMetadataRequest,
        ListMetadataRequest,
        ListMetadataResponse,
        DeleteMetadataRequest,
        DomainPolicy,
        DomainPolicyResponse,
        IdentityProvider,
        AddHumanUserRequest,
        AddHumanUserResponse,
        AddIdentityProviderRequest
    )),
    tags(
        (name = "system", description = "System and discovery endpoints"),
        (name = "organizations", description = "Organization lifecycle"),
        (name = "domains", description = "Organization domains"),
        (name = "metadata", description = "Organization metadata"),
        (name = "users", description = "Users available as organization admins"),
        (name = "admin", description = "Instance administration")
    )
)]
pub struct ApiDoc;
