//! Organization change-feed payloads.
use super::Organization;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct OrganizationChange {
    pub seq: u64,
    pub op: OrganizationChangeOp,
    pub org_id: String,
    /// State of the organization after the change; `None` once deleted.
    pub organization: Option<Organization>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OrganizationChangeOp {
    Created,
    Updated,
    Deactivated,
    Reactivated,
    Deleted,
    DomainAdded,
    DomainRemoved,
    DomainValidationGenerated,
    PrimaryDomainSet,
    MetadataSet,
    MetadataRemoved,
}
