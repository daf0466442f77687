//! Organization records and name handling.
//!
//! # Purpose
//! Defines the organization record kept by the store, its lifecycle state and
//! the admin memberships created alongside it.
//!
//! # Key invariants
//! - Organization names are trimmed and never empty.
//! - Every organization owns one generated domain derived from its name; it is
//!   verified from the start and is the primary domain until another verified
//!   domain is promoted.
use super::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MAX_NAME_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum OrganizationState {
    #[serde(rename = "ORG_STATE_ACTIVE")]
    Active,
    #[serde(rename = "ORG_STATE_INACTIVE")]
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub state: OrganizationState,
    pub primary_domain: String,
    pub sequence: u64,
    pub creation_date: DateTime<Utc>,
    pub change_date: DateTime<Utc>,
}

/// Membership of a user in the admin set of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrgAdmin {
    pub user_id: String,
    pub roles: Vec<String>,
}

/// Trim an organization name, rejecting names that end up empty or too long.
pub fn normalize_org_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("organization name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::new(format!(
            "organization name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Derive the generated domain of an organization.
///
/// The name is lowercased, spaces become `-` and anything outside `[a-z0-9-]`
/// is dropped. `fallback` is used when nothing of the name survives.
///
/// ```
/// use orgservice::model::generated_domain;
///
/// assert_eq!(generated_domain("Acme Corp!", "org-1", "example.com"), "acme-corp.example.com");
/// assert_eq!(generated_domain("***", "org-1", "example.com"), "org-1.example.com");
/// ```
pub fn generated_domain(name: &str, fallback: &str, instance_domain: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    let slug = slug.trim_matches('-');
    let label = if slug.is_empty() { fallback } else { slug };
    format!("{label}.{instance_domain}")
}
