//! Instance-wide domain policy.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DomainPolicy {
    /// Login names must be suffixed with an organization domain.
    #[serde(default)]
    pub user_login_must_be_domain: bool,
    /// Added domains start unverified and have to pass a validation challenge.
    #[serde(default)]
    pub validate_org_domains: bool,
    #[serde(default)]
    pub smtp_sender_address_matches_instance_domain: bool,
}
