//! Change and list details attached to responses.
//!
//! Zero-valued timestamps (the Unix epoch, which is also `DateTime::default()`)
//! mean "never set" in the domain model and are left out of [`Details`].
//! [`ListDetails`] always carries its timestamp.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Details of a write as recorded by the domain layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectDetails {
    pub sequence: u64,
    pub event_date: DateTime<Utc>,
    pub creation_date: DateTime<Utc>,
    pub resource_owner: String,
}

/// Details returned for a single object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Details {
    pub sequence: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    pub resource_owner: String,
}

/// Result summary of a search as produced by the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResponse {
    pub count: u64,
    pub sequence: u64,
    pub event_created_at: DateTime<Utc>,
}

/// Summary of a paginated list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListDetails {
    pub total_result: u64,
    pub processed_sequence: u64,
    pub timestamp: DateTime<Utc>,
}

fn non_zero(timestamp: DateTime<Utc>) -> Option<DateTime<Utc>> {
    (timestamp != DateTime::<Utc>::UNIX_EPOCH).then_some(timestamp)
}

pub fn details_from_domain(details: &ObjectDetails) -> Details {
    Details {
        sequence: details.sequence,
        change_date: non_zero(details.event_date),
        creation_date: non_zero(details.creation_date),
        resource_owner: details.resource_owner.clone(),
    }
}

/// Like [`details_from_domain`] but reports only the change date.
pub fn change_details_from_domain(details: &ObjectDetails) -> Details {
    Details {
        sequence: details.sequence,
        change_date: non_zero(details.event_date),
        creation_date: None,
        resource_owner: details.resource_owner.clone(),
    }
}

/// Build details for an object read back from a projection.
pub fn view_details(
    sequence: u64,
    creation_date: DateTime<Utc>,
    change_date: DateTime<Utc>,
    resource_owner: &str,
) -> Details {
    Details {
        sequence,
        change_date: non_zero(change_date),
        creation_date: non_zero(creation_date),
        resource_owner: resource_owner.to_string(),
    }
}

pub fn to_list_details(response: &SearchResponse) -> ListDetails {
    ListDetails {
        total_result: response.count,
        processed_sequence: response.sequence,
        timestamp: response.event_created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("timestamp")
    }

    #[test]
    fn zero_timestamps_are_omitted() {
        let details = details_from_domain(&ObjectDetails {
            sequence: 7,
            event_date: DateTime::default(),
            creation_date: DateTime::default(),
            resource_owner: "org-1".to_string(),
        });
        assert_eq!(details.sequence, 7);
        assert_eq!(details.change_date, None);
        assert_eq!(details.creation_date, None);
        assert_eq!(details.resource_owner, "org-1");

        let json = serde_json::to_value(&details).expect("json");
        assert!(json.get("change_date").is_none());
        assert!(json.get("creation_date").is_none());
    }

    #[test]
    fn set_timestamps_are_kept() {
        let details = details_from_domain(&ObjectDetails {
            sequence: 3,
            event_date: at(1_700_000_100),
            creation_date: at(1_700_000_000),
            resource_owner: "org-1".to_string(),
        });
        assert_eq!(details.change_date, Some(at(1_700_000_100)));
        assert_eq!(details.creation_date, Some(at(1_700_000_000)));
    }

    #[test]
    fn change_details_drop_creation_date() {
        let details = change_details_from_domain(&ObjectDetails {
            sequence: 3,
            event_date: at(1_700_000_100),
            creation_date: at(1_700_000_000),
            resource_owner: "org-1".to_string(),
        });
        assert_eq!(details.change_date, Some(at(1_700_000_100)));
        assert_eq!(details.creation_date, None);
    }

    #[test]
    fn view_details_orders_arguments_by_creation_then_change() {
        let details = view_details(9, at(10), at(20), "org-2");
        assert_eq!(details.creation_date, Some(at(10)));
        assert_eq!(details.change_date, Some(at(20)));
        assert_eq!(details.resource_owner, "org-2");
    }

    #[test]
    fn list_details_always_carry_timestamp() {
        let details = to_list_details(&SearchResponse {
            count: 2,
            sequence: 11,
            event_created_at: DateTime::default(),
        });
        assert_eq!(details.total_result, 2);
        assert_eq!(details.processed_sequence, 11);
        let json = serde_json::to_value(&details).expect("json");
        assert!(json.get("timestamp").is_some());
    }
}
