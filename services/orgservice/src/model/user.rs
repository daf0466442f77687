//! Users, identity providers and the admin specifications accepted when an
//! organization is created.
use super::ValidationError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityProvider {
    pub id: String,
    pub name: String,
}

/// Link between an account and its identity at an external provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct IdpLink {
    pub idp_id: String,
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub email_verified: bool,
    pub phone: Option<String>,
    pub idp_links: Vec<IdpLink>,
    pub resource_owner: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmailVerification {
    /// A code is generated and would be delivered by mail.
    #[default]
    SendCode,
    /// A code is generated and handed back to the caller.
    ReturnCode,
    IsVerified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PhoneSpec {
    pub phone: String,
    #[serde(default)]
    pub return_code: bool,
    #[serde(default)]
    pub is_verified: bool,
}

/// Inline definition of a new human account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HumanAdmin {
    #[serde(default)]
    pub username: Option<String>,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    #[serde(default)]
    pub email_verification: EmailVerification,
    #[serde(default)]
    pub phone: Option<PhoneSpec>,
    #[serde(default)]
    pub idp_links: Vec<IdpLink>,
}

impl HumanAdmin {
    /// Check required fields and return the normalized email address.
    pub fn validate(&self) -> Result<String, ValidationError> {
        if self.given_name.trim().is_empty() {
            return Err(ValidationError::new("given name must not be empty"));
        }
        if self.family_name.trim().is_empty() {
            return Err(ValidationError::new("family name must not be empty"));
        }
        let email = self.email.trim().to_lowercase();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, host)| !local.is_empty() && !host.is_empty());
        if !valid_email {
            return Err(ValidationError::new("email address is invalid"));
        }
        if let Some(phone) = &self.phone
            && phone.phone.trim().is_empty()
        {
            return Err(ValidationError::new("phone must not be empty"));
        }
        for link in &self.idp_links {
            if link.idp_id.trim().is_empty() || link.user_id.trim().is_empty() {
                return Err(ValidationError::new("idp link requires idp_id and user_id"));
            }
        }
        Ok(email)
    }
}

/// One entry of the admin list of a create-organization request.
///
/// Exactly one of `user_id` and `human` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminSpec {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub human: Option<HumanAdmin>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Admin reported back from organization creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedAdmin {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_code: Option<String>,
}
