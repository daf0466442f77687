//! Organization domain records and validation challenges.
use super::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const MAX_DOMAIN_LEN: usize = 200;

/// How ownership of a domain is being proven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum OrgDomainValidationType {
    #[default]
    Unspecified,
    Http,
    Dns,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrgDomain {
    pub org_id: String,
    pub domain: String,
    pub is_verified: bool,
    pub is_primary: bool,
    /// Set for the domain derived from the organization name.
    pub is_generated: bool,
    pub validation_type: OrgDomainValidationType,
    #[serde(skip)]
    pub validation_token: Option<String>,
    pub sequence: u64,
    pub creation_date: DateTime<Utc>,
    pub change_date: DateTime<Utc>,
}

/// Challenge the domain owner has to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainValidation {
    pub token: String,
    pub url: String,
}

/// Trim and lowercase a domain name, rejecting empty names, whitespace and
/// names longer than 200 characters.
pub fn normalize_domain(domain: &str) -> Result<String, ValidationError> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(ValidationError::new("domain must not be empty"));
    }
    if domain.len() > MAX_DOMAIN_LEN {
        return Err(ValidationError::new(format!(
            "domain exceeds {MAX_DOMAIN_LEN} characters"
        )));
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("domain must not contain whitespace"));
    }
    Ok(domain.to_lowercase())
}

/// Location at which the validation token is expected.
///
/// Returns `None` for [`OrgDomainValidationType::Unspecified`].
pub fn challenge_url(
    domain: &str,
    token: &str,
    validation_type: OrgDomainValidationType,
) -> Option<String> {
    match validation_type {
        OrgDomainValidationType::Http => Some(format!(
            "https://{domain}/.well-known/org-challenge/{token}"
        )),
        OrgDomainValidationType::Dns => Some(format!("_org-challenge.{domain}")),
        OrgDomainValidationType::Unspecified => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domains_are_normalized() {
        assert_eq!(
            normalize_domain(" WWW.Example.com ").expect("domain"),
            "www.example.com"
        );
    }

    #[test]
    fn invalid_domains_are_rejected() {
        assert!(normalize_domain("").is_err());
        assert!(normalize_domain("non existent domain").is_err());
        assert!(normalize_domain(&"a".repeat(MAX_DOMAIN_LEN + 1)).is_err());
    }

    #[test]
    fn challenge_urls_embed_domain() {
        let http = challenge_url("example.com", "tok", OrgDomainValidationType::Http)
            .expect("http");
        assert_eq!(http, "https://example.com/.well-known/org-challenge/tok");
        let dns =
            challenge_url("example.com", "tok", OrgDomainValidationType::Dns).expect("dns");
        assert_eq!(dns, "_org-challenge.example.com");
        assert!(
            challenge_url("example.com", "tok", OrgDomainValidationType::Unspecified).is_none()
        );
    }
}
