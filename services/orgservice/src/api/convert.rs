//! Conversions between store records and wire payloads.
use crate::api::types::{DomainValidationType, DomainView, MetadataView, OrganizationView};
use crate::model::{Metadata, OrgDomain, OrgDomainValidationType, Organization};
use orgplane_object::view_details;

impl From<DomainValidationType> for OrgDomainValidationType {
    fn from(value: DomainValidationType) -> Self {
        match value {
            DomainValidationType::Dns => OrgDomainValidationType::Dns,
            DomainValidationType::Http => OrgDomainValidationType::Http,
            DomainValidationType::Unspecified => OrgDomainValidationType::Unspecified,
        }
    }
}

impl From<OrgDomainValidationType> for DomainValidationType {
    fn from(value: OrgDomainValidationType) -> Self {
        match value {
            OrgDomainValidationType::Dns => DomainValidationType::Dns,
            OrgDomainValidationType::Http => DomainValidationType::Http,
            OrgDomainValidationType::Unspecified => DomainValidationType::Unspecified,
        }
    }
}

pub(crate) fn organization_view(org: Organization) -> OrganizationView {
    let details = view_details(org.sequence, org.creation_date, org.change_date, &org.id);
    OrganizationView {
        id: org.id,
        name: org.name,
        state: org.state,
        primary_domain: org.primary_domain,
        details,
    }
}

pub(crate) fn domain_view(domain: OrgDomain) -> DomainView {
    let details = view_details(
        domain.sequence,
        domain.creation_date,
        domain.change_date,
        &domain.org_id,
    );
    DomainView {
        organization_id: domain.org_id,
        domain_name: domain.domain,
        is_verified: domain.is_verified,
        is_primary: domain.is_primary,
        validation_type: domain.validation_type.into(),
        details,
    }
}

/// Metadata records do not know their organization, so the owner is passed in.
pub(crate) fn metadata_view(metadata: Metadata, org_id: &str) -> MetadataView {
    MetadataView {
        details: view_details(
            metadata.sequence,
            metadata.creation_date,
            metadata.change_date,
            org_id,
        ),
        key: metadata.key,
        value: metadata.value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrganizationState;
    use chrono::{DateTime, TimeZone, Utc};

    #[test]
    fn validation_types_round_trip_between_layers() {
        for wire in [
            DomainValidationType::Unspecified,
            DomainValidationType::Dns,
            DomainValidationType::Http,
        ] {
            let model: OrgDomainValidationType = wire.into();
            assert_eq!(DomainValidationType::from(model), wire);
        }
    }

    #[test]
    fn unknown_wire_types_decode_as_unspecified() {
        let decoded: DomainValidationType =
            serde_json::from_value(serde_json::json!("DOMAIN_VALIDATION_TYPE_SMOKE")).expect("decode");
        assert_eq!(decoded, DomainValidationType::Unspecified);
    }

    #[test]
    fn organization_view_omits_unset_dates() {
        let created = Utc.timestamp_opt(1_700_000_000, 0).single().expect("ts");
        let view = organization_view(Organization {
            id: "org-1".to_string(),
            name: "Acme".to_string(),
            state: OrganizationState::Active,
            primary_domain: "acme.orgs.localhost".to_string(),
            sequence: 7,
            creation_date: created,
            change_date: DateTime::<Utc>::UNIX_EPOCH,
        });
        assert_eq!(view.details.sequence, 7);
        assert_eq!(view.details.resource_owner, "org-1");
        assert_eq!(view.details.creation_date, Some(created));
        assert!(view.details.change_date.is_none());
    }
}
