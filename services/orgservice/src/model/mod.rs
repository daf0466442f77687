//! Organization service data model.
//!
//! # Purpose
//! Re-exports the organization, domain, metadata, user and policy records used
//! by the store and the HTTP API, plus the input validation shared by both.
mod change;
mod codes;
mod domain;
mod metadata;
mod organization;
mod policy;
mod user;

pub use change::{OrganizationChange, OrganizationChangeOp};
pub use codes::{generate_validation_token, generate_verification_code};
pub use domain::{
    DomainValidation, OrgDomain, OrgDomainValidationType, challenge_url, normalize_domain,
};
pub use metadata::{Metadata, MetadataEntry, normalize_metadata_key};
pub(crate) use metadata::base64_bytes;
pub use organization::{
    OrgAdmin, Organization, OrganizationState, generated_domain, normalize_org_name,
};
pub use policy::DomainPolicy;
pub use user::{
    AdminSpec, CreatedAdmin, EmailVerification, HumanAdmin, IdentityProvider, IdpLink,
    PhoneSpec, User,
};

use thiserror::Error;

/// Rejected caller input, reported as a validation failure.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Role granted to admins bootstrapped with a new organization.
pub const ORG_OWNER_ROLE: &str = "ORG_OWNER";
