//! Storage abstraction for organizations and everything they own.
//!
//! # Purpose
//! [`OrganizationStore`] is the single seam between the HTTP handlers and the
//! backing state. Every write hands back [`ObjectDetails`] carrying a freshly
//! assigned instance-wide sequence and the time of the write.
//!
//! # Key invariants
//! - Validation happens before any mutation; a failed call leaves no trace.
//! - Unknown organizations are reported as [`StoreError::OrganizationNotFound`],
//!   missing domains as [`StoreError::DomainNotFound`]; everything else that is
//!   missing uses [`StoreError::NotFound`].
use crate::model::{
    AdminSpec, CreatedAdmin, DomainPolicy, DomainValidation, HumanAdmin, IdentityProvider,
    Metadata, MetadataEntry, OrgAdmin, OrgDomain, OrgDomainValidationType, Organization,
    OrganizationChange, OrganizationState, User, ValidationError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgplane_object::{ListQuery, ObjectDetails, SearchResponse, TextFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub mod memory;
mod search;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub changes_limit: u64,
    pub change_retention_max_rows: Option<i64>,
    pub instance_id: String,
    /// Suffix of every generated organization domain.
    pub instance_domain: String,
    /// Treat deactivating an inactive (or reactivating an active) organization
    /// as a successful no-op instead of a conflict.
    pub idempotent_state_transitions: bool,
    pub domain_policy: DomainPolicy,
}

impl StoreConfig {
    /// Entries kept in the change log: at least one page of `changes_limit`,
    /// more when the retention allows it. Negative retention counts as unset.
    pub fn change_window(&self) -> usize {
        let retention = self
            .change_retention_max_rows
            .and_then(|rows| u64::try_from(rows).ok())
            .unwrap_or(0);
        usize::try_from(self.changes_limit.max(retention)).unwrap_or(usize::MAX)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            changes_limit: 1000,
            change_retention_max_rows: None,
            instance_id: "orgservice".to_string(),
            instance_domain: "orgs.localhost".to_string(),
            idempotent_state_transitions: false,
            domain_policy: DomainPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub next_seq: u64,
}

#[derive(Debug, Clone)]
pub struct ChangeSet<T> {
    pub items: Vec<T>,
    pub next_seq: u64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Organisation not found")]
    OrganizationNotFound,
    #[error("domain doesn't exist on organization")]
    DomainNotFound,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err.0)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One page of a search together with the state it was computed against.
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    /// Matches before pagination.
    pub total: u64,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
}

impl<T> SearchResult<T> {
    pub fn response(&self) -> SearchResponse {
        SearchResponse {
            count: self.total,
            sequence: self.sequence,
            event_created_at: self.timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OrganizationSortingColumn {
    #[default]
    #[serde(rename = "ORGANIZATION_FIELD_NAME_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "ORGANIZATION_FIELD_NAME_NAME")]
    Name,
    #[serde(rename = "ORGANIZATION_FIELD_NAME_CREATION_DATE")]
    CreationDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationFilter {
    Id(String),
    Name(TextFilter),
    /// Matched against the primary domain.
    Domain(TextFilter),
    State(OrganizationState),
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationSearch {
    pub query: Option<ListQuery>,
    pub sorting_column: OrganizationSortingColumn,
    pub filters: Vec<OrganizationFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DomainFilter {
    Domain(TextFilter),
    Primary(bool),
    Verified(bool),
}

#[derive(Debug, Clone, Default)]
pub struct DomainSearch {
    pub query: Option<ListQuery>,
    pub filters: Vec<DomainFilter>,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataSearch {
    pub query: Option<ListQuery>,
    pub key: Option<TextFilter>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateOrganization {
    pub name: String,
    /// Caller supplied id; generated when absent.
    pub org_id: Option<String>,
    pub admins: Vec<AdminSpec>,
}

#[derive(Debug, Clone)]
pub struct CreatedOrganization {
    pub id: String,
    pub details: ObjectDetails,
    pub created_admins: Vec<CreatedAdmin>,
}

#[derive(Debug, Clone)]
pub struct AddedUser {
    pub user_id: String,
    pub details: ObjectDetails,
    pub email_code: Option<String>,
    pub phone_code: Option<String>,
}

#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn create_organization(
        &self,
        request: CreateOrganization,
    ) -> StoreResult<CreatedOrganization>;
    async fn update_organization(&self, org_id: &str, name: &str) -> StoreResult<ObjectDetails>;
    async fn get_organization(&self, org_id: &str) -> StoreResult<Organization>;
    async fn list_organizations(
        &self,
        search: OrganizationSearch,
    ) -> StoreResult<SearchResult<Organization>>;
    async fn delete_organization(&self, org_id: &str) -> StoreResult<ObjectDetails>;
    async fn deactivate_organization(&self, org_id: &str) -> StoreResult<ObjectDetails>;
    async fn reactivate_organization(&self, org_id: &str) -> StoreResult<ObjectDetails>;
    async fn list_organization_admins(&self, org_id: &str) -> StoreResult<Vec<OrgAdmin>>;
    async fn organization_snapshot(&self) -> StoreResult<Snapshot<Organization>>;
    async fn organization_changes(&self, since: u64)
    -> StoreResult<ChangeSet<OrganizationChange>>;

    async fn add_domain(&self, org_id: &str, domain: &str) -> StoreResult<ObjectDetails>;
    async fn delete_domain(&self, org_id: &str, domain: &str) -> StoreResult<ObjectDetails>;
    async fn list_domains(
        &self,
        org_id: &str,
        search: DomainSearch,
    ) -> StoreResult<SearchResult<OrgDomain>>;
    async fn generate_domain_validation(
        &self,
        org_id: &str,
        domain: &str,
        validation_type: OrgDomainValidationType,
    ) -> StoreResult<DomainValidation>;
    async fn set_primary_domain(&self, org_id: &str, domain: &str) -> StoreResult<ObjectDetails>;

    async fn set_metadata(
        &self,
        org_id: &str,
        entries: Vec<MetadataEntry>,
    ) -> StoreResult<ObjectDetails>;
    async fn list_metadata(
        &self,
        org_id: &str,
        search: MetadataSearch,
    ) -> StoreResult<SearchResult<Metadata>>;
    async fn delete_metadata(&self, org_id: &str, keys: Vec<String>)
    -> StoreResult<ObjectDetails>;

    async fn domain_policy(&self) -> StoreResult<DomainPolicy>;
    async fn update_domain_policy(&self, policy: DomainPolicy) -> StoreResult<ObjectDetails>;

    async fn add_human_user(
        &self,
        org_id: Option<&str>,
        human: HumanAdmin,
    ) -> StoreResult<AddedUser>;
    async fn get_user(&self, user_id: &str) -> StoreResult<User>;
    async fn add_identity_provider(&self, name: &str) -> StoreResult<IdentityProvider>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_window_covers_limit_and_retention() {
        let config = |changes_limit, change_retention_max_rows| StoreConfig {
            changes_limit,
            change_retention_max_rows,
            ..StoreConfig::default()
        };
        assert_eq!(config(100, None).change_window(), 100);
        assert_eq!(config(100, Some(500)).change_window(), 500);
        assert_eq!(config(100, Some(10)).change_window(), 100);
        assert_eq!(config(100, Some(-1)).change_window(), 100);
        assert_eq!(config(u64::MAX, None).change_window(), usize::MAX);
        assert_eq!(config(0, Some(i64::MAX)).change_window(), i64::MAX as usize);
    }
}
