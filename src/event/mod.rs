//! ICO event data model
//!
//! The serialized field names (camelCase, absent-when-unset optionals) match
//! the persisted crawl file format exactly, so a file written by an earlier
//! run round-trips unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for a raised amount the source lists but cannot be parsed.
pub const PENDING: &str = "pending";

/// Sentinel for an event whose end date is explicitly unannounced.
pub const TBA: &str = "TBA";

/// Listing category of an event; selects which date-parsing rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Ended,
}

impl EventStatus {
    /// The category slug used in listing-page URLs.
    pub fn category_slug(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category_slug())
    }
}

/// Traffic metric attached to an event's project website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traffic {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_visits: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_rank: Option<u64>,
}

impl Traffic {
    /// The `{success: false}` shape attached after the list phase and after
    /// an ordinary lookup failure.
    pub fn failure() -> Self {
        Self {
            success: false,
            monthly_visits: None,
            global_rank: None,
        }
    }
}

/// One row of the crawl: a single ICO event.
///
/// Only `status` is always present; every other field is filled in as the
/// phases progress and stays absent if its extraction failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IcoEvent {
    pub status: EventStatus,

    /// Display name of the offering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// URL of the per-event detail page (source of end date and website).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ico_url: Option<String>,

    /// External project website, discovered from the detail page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Raised amount in millions with two decimals, or `"pending"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raised: Option<String>,

    /// Canonical `YYYY/MM/DD` end date, or `"TBA"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic: Option<Traffic>,
}

impl IcoEvent {
    /// Creates an event with only its listing category known.
    pub fn new(status: EventStatus) -> Self {
        Self {
            status,
            name: None,
            ico_url: None,
            url: None,
            raised: None,
            end_date: None,
            traffic: None,
        }
    }

    /// True when this event already carries a successful traffic metric.
    pub fn traffic_success(&self) -> bool {
        self.traffic.as_ref().map_or(false, |t| t.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_has_only_status() {
        let event = IcoEvent::new(EventStatus::Active);
        assert_eq!(event.status, EventStatus::Active);
        assert!(event.name.is_none());
        assert!(event.traffic.is_none());
        assert!(!event.traffic_success());
    }

    #[test]
    fn test_serialized_field_names_are_camel_case() {
        let mut event = IcoEvent::new(EventStatus::Ended);
        event.name = Some("Dexon".to_string());
        event.ico_url = Some("https://icodrops.com/dexon/".to_string());
        event.raised = Some("3.27".to_string());
        event.end_date = Some("2019/03/02".to_string());
        event.traffic = Some(Traffic::failure());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "ended");
        assert_eq!(json["icoUrl"], "https://icodrops.com/dexon/");
        assert_eq!(json["endDate"], "2019/03/02");
        assert_eq!(json["traffic"]["success"], false);
        // Absent optionals are omitted entirely, not serialized as null.
        assert!(json.get("url").is_none());
    }

    #[test]
    fn test_deserialize_partial_event() {
        let json = r#"{"status": "active"}"#;
        let event: IcoEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.status, EventStatus::Active);
        assert!(event.end_date.is_none());
    }

    #[test]
    fn test_traffic_success_flag() {
        let mut event = IcoEvent::new(EventStatus::Active);
        event.traffic = Some(Traffic {
            success: true,
            monthly_visits: Some(120_000.0),
            global_rank: Some(84_211),
        });
        assert!(event.traffic_success());

        event.traffic = Some(Traffic::failure());
        assert!(!event.traffic_success());
    }

    #[test]
    fn test_category_slug() {
        assert_eq!(EventStatus::Active.category_slug(), "active");
        assert_eq!(EventStatus::Ended.to_string(), "ended");
    }
}
